use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use goto_core::error::Result;
use goto_core::{Key, Redirect, RedirectStore};
use goto_storage::{InMemoryRedirectStore, SqliteRedirectStore};
use goto_worker::{StoreWorker, WorkerConfig, WorkerHandle};
use parking_lot::Mutex;
use tempfile::TempDir;

#[derive(Debug, Clone, Copy)]
enum Op {
    Lookup,
    Save,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    op: Op,
    start: Instant,
    end: Instant,
}

/// Records the start and end of every operation and counts any call that
/// begins while another one is still running.
#[derive(Default)]
struct OpRecorder {
    active: AtomicUsize,
    overlaps: Arc<AtomicUsize>,
    spans: Arc<Mutex<Vec<Span>>>,
}

impl OpRecorder {
    fn record<T>(&self, op: Op, f: impl FnOnce() -> T) -> T {
        if self.active.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let start = Instant::now();
        // Widen the window in which an overlapping call would be caught.
        std::thread::sleep(Duration::from_micros(200));
        let out = f();
        let end = Instant::now();
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.spans.lock().push(Span { op, start, end });
        out
    }
}

struct InstrumentedStore {
    inner: InMemoryRedirectStore,
    recorder: OpRecorder,
}

impl RedirectStore for InstrumentedStore {
    fn initialize(&mut self) -> Result<()> {
        self.inner.initialize()
    }

    fn lookup(&self, key: &Key) -> Result<Option<String>> {
        self.recorder.record(Op::Lookup, || self.inner.lookup(key))
    }

    fn save(&mut self, key: &Key, url: &str) -> Result<()> {
        let inner = &mut self.inner;
        self.recorder.record(Op::Save, || inner.save(key, url))
    }
}

fn key(value: &str) -> Key {
    Key::new_unchecked(value)
}

fn spawn_worker<S: RedirectStore + Send + 'static>(store: S) -> WorkerHandle {
    let (worker, handle) = StoreWorker::new(store, WorkerConfig::default()).expect("start worker");
    worker.spawn().expect("spawn worker thread");
    handle
}

#[tokio::test]
async fn register_resolve_scenario() {
    let handle = spawn_worker(InMemoryRedirectStore::new());

    handle
        .save(Redirect::new(key("abc"), "http://example.com"))
        .await
        .unwrap();
    assert_eq!(
        handle.lookup(&key("abc")).await.unwrap().as_deref(),
        Some("http://example.com")
    );
    assert_eq!(handle.lookup(&key("xyz")).await.unwrap(), None);

    handle
        .save(Redirect::new(key("abc"), "http://other.com"))
        .await
        .unwrap();
    assert_eq!(
        handle.lookup(&key("abc")).await.unwrap().as_deref(),
        Some("http://other.com")
    );
}

#[tokio::test]
async fn later_register_wins() {
    let dir = TempDir::new().unwrap();
    let store = SqliteRedirectStore::open(dir.path().join("goto.db")).unwrap();
    let handle = spawn_worker(store);

    for i in 0..5 {
        handle
            .save(Redirect::new(key("k"), format!("http://v{i}.example")))
            .await
            .unwrap();
    }

    assert_eq!(
        handle.lookup(&key("k")).await.unwrap().as_deref(),
        Some("http://v4.example")
    );
}

#[tokio::test]
async fn unknown_keys_resolve_to_none() {
    let handle = spawn_worker(InMemoryRedirectStore::new());

    for k in ["a", "missing", "never-registered"] {
        assert!(handle.lookup(&key(k)).await.unwrap().is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registers_then_resolves_see_their_own_urls() {
    const N: usize = 64;

    let dir = TempDir::new().unwrap();
    let store = SqliteRedirectStore::open(dir.path().join("goto.db")).unwrap();
    let handle = spawn_worker(store);

    let registers: Vec<_> = (0..N)
        .map(|i| {
            let handle = handle.clone();
            tokio::spawn(async move {
                handle
                    .save(Redirect::new(
                        key(&format!("key-{i:03}")),
                        format!("http://example{i}.com"),
                    ))
                    .await
            })
        })
        .collect();
    for task in registers {
        task.await.unwrap().unwrap();
    }

    let resolves: Vec<_> = (0..N)
        .map(|i| {
            let handle = handle.clone();
            tokio::spawn(async move { (i, handle.lookup(&key(&format!("key-{i:03}"))).await) })
        })
        .collect();
    for task in resolves {
        let (i, url) = task.await.unwrap();
        assert_eq!(url.unwrap(), Some(format!("http://example{i}.com")));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn store_operations_never_overlap() {
    const N: usize = 32;

    let recorder = OpRecorder::default();
    let overlaps = Arc::clone(&recorder.overlaps);
    let spans = Arc::clone(&recorder.spans);
    let handle = spawn_worker(InstrumentedStore {
        inner: InMemoryRedirectStore::new(),
        recorder,
    });

    let tasks: Vec<_> = (0..N)
        .map(|i| {
            let handle = handle.clone();
            tokio::spawn(async move {
                let k = key(&format!("key-{}", i % 4));
                handle
                    .save(Redirect::new(k.clone(), format!("http://example{i}.com")))
                    .await
                    .unwrap();
                handle.lookup(&k).await.unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);

    let mut spans = spans.lock().clone();
    assert_eq!(spans.len(), N * 2);
    assert_eq!(spans.iter().filter(|s| matches!(s.op, Op::Save)).count(), N);

    spans.sort_by_key(|s| s.start);
    for pair in spans.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "{:?} overlaps {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[tokio::test]
async fn restart_keeps_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("goto.db");

    {
        let (worker, handle) =
            StoreWorker::new(SqliteRedirectStore::open(&path).unwrap(), WorkerConfig::default())
                .unwrap();
        let thread = worker.spawn().unwrap();
        handle
            .save(Redirect::new(key("abc"), "http://example.com"))
            .await
            .unwrap();
        drop(handle);
        thread.join().unwrap();
    }

    let handle = spawn_worker(SqliteRedirectStore::open(&path).unwrap());
    assert_eq!(
        handle.lookup(&key("abc")).await.unwrap().as_deref(),
        Some("http://example.com")
    );
}
