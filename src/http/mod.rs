//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing::PathResolver (import path lookup)
//!     → pages.rs (render index or meta-tag page)
//!     → Send to client
//! ```

pub mod pages;
pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, VanityServer};
