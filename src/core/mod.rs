//! Core types for the release tool
//!
//! Error handling lives here so every module reports failures the same way:
//! - [`ReleaseError`] - strongly-typed failures callers can match on
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - converts any `anyhow::Error` for CLI display

pub mod error;

pub use error::{ErrorContext, ReleaseError, user_friendly_error};
