//! Client gateway for the VidMuse backend.
//!
//! ```no_run
//! use std::sync::Arc;
//! use vidmuse::{Gateway, GatewayMode, Session};
//!
//! # async fn run() -> Result<(), vidmuse::RequestError> {
//! let gateway = Gateway::new("http://localhost:5000/api", Arc::new(Session::in_memory()))
//!     .with_mode(GatewayMode::Fallback);
//!
//! gateway.auth().sign_in("creator@vidmuse.ai", "hunter22").await?;
//! let project = gateway.projects().create("A robot learns to paint", None, None).await?;
//! let story = gateway.story().generate(&project.project_id, "A robot learns to paint").await?;
//! println!("{} scenes", story.scenes.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod demo;
pub mod error;
pub mod gateway;
pub mod project;
pub mod session;
pub mod story;
pub mod storyboard;
pub mod user;
pub mod video;

pub use error::RequestError;
pub use gateway::{Gateway, GatewayMode};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use storyboard::Storyboard;
