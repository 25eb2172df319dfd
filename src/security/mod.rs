//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (add hardening headers)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Toggled by `security.enable_headers`
//! - Gateway output is HTML generated from untrusted capsule content, so it
//!   is never framed or sniffed

pub mod headers;

pub use headers::security_headers;
