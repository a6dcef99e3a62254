//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → basic_auth.rs (optional credential check)
//!     → Pass to import handlers
//! ```
//!
//! # Design Decisions
//! - Off unless explicitly enabled in settings
//! - Fail closed: missing or malformed credentials get 401

pub mod basic_auth;

pub use basic_auth::{basic_auth_middleware, BasicAuth};
