mod models;
pub mod story;

pub use models::*;
