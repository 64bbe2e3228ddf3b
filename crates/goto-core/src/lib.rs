//! Core types and traits for the goto redirect service.
//!
//! This crate defines the redirect data model, the synchronous
//! [`RedirectStore`] contract implemented by storage engines, and the async
//! [`Redirector`] contract the HTTP gateway talks to.

pub mod error;
pub mod key;
pub mod redirect;
pub mod redirector;
pub mod store;

pub use error::{CoreError, RedirectError, StorageError};
pub use key::Key;
pub use redirect::Redirect;
pub use redirector::Redirector;
pub use store::RedirectStore;
