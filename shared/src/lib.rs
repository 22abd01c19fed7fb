//! Shared types for the Comanda order desk
//!
//! Document shapes (orders, catalog entities, accounts) and the unified
//! error vocabulary used by every crate in the workspace. This crate does
//! no I/O.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
