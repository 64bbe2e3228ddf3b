//! Single-writer access to a redirect store.
//!
//! Storage engines such as SQLite must not be driven from several threads at
//! once, while the HTTP gateway serves many requests concurrently. This crate
//! reconciles the two: a [`StoreWorker`] takes ownership of the store and is
//! the only code that ever calls it. Request tasks talk to it through a
//! cloneable [`WorkerHandle`], which sends a [`LookupRequest`] or
//! [`SaveRequest`] carrying a private one-shot reply channel and waits for
//! exactly one answer.
//!
//! # Example
//!
//! ```rust
//! use goto_core::{Key, Redirect};
//! use goto_storage::InMemoryRedirectStore;
//! use goto_worker::{StoreWorker, WorkerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (worker, handle) = StoreWorker::new(InMemoryRedirectStore::new(), WorkerConfig::default())?;
//! tokio::spawn(worker.run());
//!
//! let key = Key::new("abc")?;
//! handle.save(Redirect::new(key.clone(), "http://example.com")).await?;
//! assert_eq!(handle.lookup(&key).await?.as_deref(), Some("http://example.com"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod handle;
pub mod message;
pub mod worker;

pub use config::WorkerConfig;
pub use handle::WorkerHandle;
pub use message::{LookupRequest, SaveRequest};
pub use worker::StoreWorker;
