//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Gemini exchange:
//!     → timeouts.rs (optional deadline around connect + handshake + read)
//!     → on expiry: connection dropped, GeminiError::Timeout
//! ```
//!
//! # Design Decisions
//! - No retries: every failure is terminal for the exchange and surfaces
//!   to the caller
//! - The deadline is opt-in; without it the exchange is unbounded

pub mod timeouts;
