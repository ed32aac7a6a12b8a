//! In-memory development backend for the VidMuse gateway.
//!
//! Serves the same `/api` surface the client talks to, with accounts,
//! projects, scenes and export jobs kept in process memory.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::create_router;
pub use state::AppState;
