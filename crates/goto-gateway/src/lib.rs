//! HTTP front end of the goto redirect service.
//!
//! The router only ever talks to a [`Redirector`](goto_core::Redirector);
//! the binary wires it to a [`WorkerHandle`](goto_worker::WorkerHandle).

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
