//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → server.rs (Axum setup, middleware, handlers)
//!     → request.rs (request ID, gateway path → capsule address)
//!     → [gemini client performs the exchange]
//!     → response.rs (status class → HTTP response)
//!     → pages.rs (HTML shells)
//!     → Send to client
//! ```

pub mod pages;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CapsuleTarget, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
