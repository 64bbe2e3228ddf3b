use crate::config::WorkerConfig;
use crate::handle::WorkerHandle;
use crate::message::{LookupRequest, SaveRequest};
use goto_core::{RedirectStore, StorageError};
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

const WORKER_THREAD_NAME: &str = "goto-store-worker";

/// The sole owner of a redirect store.
///
/// The worker holds the store and the receiving ends of two queues, one for
/// lookups and one for saves. [`run`](Self::run) services one message at a
/// time to completion, so at most one store operation is ever in flight and
/// all operations are ordered by their arrival at the worker. Nothing else
/// can reach the store: it is moved in by [`new`](Self::new) and never handed
/// out again.
#[derive(Debug)]
pub struct StoreWorker<S> {
    store: S,
    lookups: mpsc::Receiver<LookupRequest>,
    saves: mpsc::Receiver<SaveRequest>,
}

impl<S: RedirectStore> StoreWorker<S> {
    /// Initializes `store` and wires up the worker's queues.
    ///
    /// Returns the worker, which must then be driven by [`run`](Self::run) or
    /// [`spawn`](Self::spawn), and the handle through which callers reach it.
    /// A failure to initialize the store is returned before anything runs.
    pub fn new(mut store: S, config: WorkerConfig) -> Result<(Self, WorkerHandle), StorageError> {
        store.initialize()?;

        let capacity = config.queue_capacity.max(1);
        let (lookup_tx, lookups) = mpsc::channel(capacity);
        let (save_tx, saves) = mpsc::channel(capacity);

        let worker = Self {
            store,
            lookups,
            saves,
        };
        let handle = WorkerHandle::new(lookup_tx, save_tx, config.request_timeout);
        Ok((worker, handle))
    }

    /// Services requests until every [`WorkerHandle`] has been dropped.
    pub async fn run(mut self) {
        info!("store worker started");

        loop {
            tokio::select! {
                Some(request) = self.lookups.recv() => self.handle_lookup(request),
                Some(request) = self.saves.recv() => self.handle_save(request),
                else => break,
            }
        }

        info!("all handles dropped, store worker stopped");
    }

    fn handle_lookup(&mut self, request: LookupRequest) {
        let LookupRequest { key, reply } = request;

        let result = self.store.lookup(&key);
        match &result {
            Ok(Some(_)) => trace!(key = %key, "lookup hit"),
            Ok(None) => trace!(key = %key, "lookup miss"),
            Err(e) => warn!(key = %key, error = %e, "lookup failed"),
        }

        if reply.send(result).is_err() {
            debug!(key = %key, "lookup caller went away before the reply");
        }
    }

    fn handle_save(&mut self, request: SaveRequest) {
        let SaveRequest { key, url, reply } = request;

        let result = self.store.save(&key, &url);
        match &result {
            Ok(()) => debug!(key = %key, url = %url, "saved redirect"),
            Err(e) => warn!(key = %key, error = %e, "save failed"),
        }

        if reply.send(result).is_err() {
            debug!(key = %key, "save caller went away before the reply");
        }
    }
}

impl<S: RedirectStore + Send + 'static> StoreWorker<S> {
    /// Runs the worker on a dedicated thread.
    ///
    /// Store calls block, so they are kept off the request runtime. The
    /// thread exits once every handle has been dropped.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                match tokio::runtime::Builder::new_current_thread().build() {
                    Ok(runtime) => runtime.block_on(self.run()),
                    Err(e) => error!(error = %e, "failed to build store worker runtime"),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goto_core::error::Result;
    use goto_core::{Key, Redirect, RedirectError};
    use goto_storage::InMemoryRedirectStore;

    /// Fails every operation on one key and delegates the rest.
    struct PoisonedKeyStore {
        inner: InMemoryRedirectStore,
        poisoned: Key,
    }

    impl RedirectStore for PoisonedKeyStore {
        fn initialize(&mut self) -> Result<()> {
            self.inner.initialize()
        }

        fn lookup(&self, key: &Key) -> Result<Option<String>> {
            if *key == self.poisoned {
                return Err(StorageError::Query("poisoned lookup".to_string()));
            }
            self.inner.lookup(key)
        }

        fn save(&mut self, key: &Key, url: &str) -> Result<()> {
            if *key == self.poisoned {
                return Err(StorageError::Unavailable("poisoned save".to_string()));
            }
            self.inner.save(key, url)
        }
    }

    #[derive(Debug)]
    struct BrokenSchemaStore;

    impl RedirectStore for BrokenSchemaStore {
        fn initialize(&mut self) -> Result<()> {
            Err(StorageError::Schema("cannot create table".to_string()))
        }

        fn lookup(&self, _key: &Key) -> Result<Option<String>> {
            unreachable!("store was never initialized")
        }

        fn save(&mut self, _key: &Key, _url: &str) -> Result<()> {
            unreachable!("store was never initialized")
        }
    }

    fn key(s: &str) -> Key {
        Key::new_unchecked(s)
    }

    #[test]
    fn initialize_failure_is_returned_before_running() {
        let err = StoreWorker::new(BrokenSchemaStore, WorkerConfig::default()).unwrap_err();
        assert!(matches!(err, StorageError::Schema(_)));
    }

    #[tokio::test]
    async fn storage_errors_are_replied_and_worker_keeps_serving() {
        let store = PoisonedKeyStore {
            inner: InMemoryRedirectStore::new(),
            poisoned: key("bad"),
        };
        let (worker, handle) = StoreWorker::new(store, WorkerConfig::default()).unwrap();
        tokio::spawn(worker.run());

        let err = handle
            .save(Redirect::new(key("bad"), "http://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RedirectError::Storage(StorageError::Unavailable(_))
        ));

        let err = handle.lookup(&key("bad")).await.unwrap_err();
        assert!(matches!(err, RedirectError::Storage(StorageError::Query(_))));

        handle
            .save(Redirect::new(key("good"), "http://example.com"))
            .await
            .unwrap();
        assert_eq!(
            handle.lookup(&key("good")).await.unwrap().as_deref(),
            Some("http://example.com")
        );
    }

    #[tokio::test]
    async fn run_returns_once_all_handles_are_dropped() {
        let (worker, handle) =
            StoreWorker::new(InMemoryRedirectStore::new(), WorkerConfig::default()).unwrap();
        let task = tokio::spawn(worker.run());

        let clone = handle.clone();
        drop(handle);
        clone
            .save(Redirect::new(key("abc"), "http://example.com"))
            .await
            .unwrap();
        drop(clone);

        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .expect("worker should stop")
            .unwrap();
    }

    #[test]
    fn spawned_worker_serves_from_its_own_thread() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (worker, handle) =
            StoreWorker::new(InMemoryRedirectStore::new(), WorkerConfig::default()).unwrap();
        let thread = worker.spawn().unwrap();
        assert_eq!(thread.thread().name(), Some(WORKER_THREAD_NAME));

        runtime.block_on(async {
            handle
                .save(Redirect::new(key("abc"), "http://example.com"))
                .await
                .unwrap();
            assert_eq!(
                handle.lookup(&key("abc")).await.unwrap().as_deref(),
                Some("http://example.com")
            );
        });

        drop(handle);
        thread.join().unwrap();
    }
}
