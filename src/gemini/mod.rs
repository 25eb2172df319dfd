//! Gemini protocol client subsystem.
//!
//! # Data Flow
//! ```text
//! GeminiRequest (host, path, port, query)
//!     → request.rs (validate, canonical URL, request line ≤ 1026 bytes)
//!     → tls.rs (TOFU client config)
//!     → client.rs (connect, send, read header + capped body, close)
//!     → response.rs (strict header parsing, Response)
//!     → status.rs (closed StatusClass for exhaustive handling)
//! ```
//!
//! # Design Decisions
//! - One connection per request; no pooling, no reuse
//! - Half-duplex: the request is flushed before any read
//! - Trust-on-first-use TLS: no certificate authority or host name check
//! - Failures are errors, never synthetic responses

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod status;
pub mod tls;

pub use client::GeminiClient;
pub use error::{GeminiError, GeminiResult};
pub use request::{ClientCertificate, GeminiRequest, PreparedRequest, DEFAULT_PORT};
pub use response::Response;
pub use status::{Status, StatusClass};
