//! The `utils` module provides the pieces shared by every other module:
//! the crate's error types and the tracing subscriber setup.

pub mod error;
pub mod logging;

pub use error::{ApiError, ChatError};
