//! Error taxonomy for a single protocol exchange.

use std::time::Duration;
use thiserror::Error;

/// Errors that terminate a Gemini exchange.
///
/// None of these are retried by the client. Retry policy, if any, belongs
/// to the caller.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Port outside `1..=65535`.
    #[error("Invalid port {0}: must be in 1..=65535")]
    InvalidPort(u32),

    /// Encoded request line (URL + CRLF) exceeds the protocol limit.
    #[error("Request URL is too long: {len} bytes encoded, limit is {limit}")]
    RequestTooLong { len: usize, limit: usize },

    /// A requested feature that this client does not provide.
    #[error("Not implemented: {0}")]
    Unsupported(&'static str),

    /// Connect, handshake, read or write failure.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// TLS client configuration could not be built.
    #[error("TLS configuration error: {0}")]
    Tls(#[from] rustls::Error),

    /// No line terminator within the header size limit.
    #[error("Server sent a header line longer than {limit} bytes")]
    HeaderTooLong { limit: usize },

    /// Header line does not match `<digit><digit> <meta>\r\n`.
    #[error("Server sent an improperly formatted header line: {0}")]
    HeaderMalformed(&'static str),

    /// The exchange did not finish before the configured deadline.
    #[error("Exchange timed out after {0:?}")]
    Timeout(Duration),
}

impl GeminiError {
    /// Short, stable label for metrics and for messages shown to untrusted
    /// consumers.
    pub fn kind(&self) -> &'static str {
        match self {
            GeminiError::InvalidPort(_) => "invalid_port",
            GeminiError::RequestTooLong { .. } => "request_too_long",
            GeminiError::Unsupported(_) => "unsupported",
            GeminiError::Transport(_) | GeminiError::Tls(_) => "transport_error",
            GeminiError::HeaderTooLong { .. } => "header_too_long",
            GeminiError::HeaderMalformed(_) => "header_malformed",
            GeminiError::Timeout(_) => "timeout",
        }
    }

    /// True when the failure happened before any network I/O.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            GeminiError::InvalidPort(_)
                | GeminiError::RequestTooLong { .. }
                | GeminiError::Unsupported(_)
        )
    }
}

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, GeminiError>;
