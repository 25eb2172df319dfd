//! Gemini protocol client, gemtext renderer and HTTP gateway.

pub mod config;
pub mod gemini;
pub mod gemtext;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::GatewayConfig;
pub use gemini::{GeminiClient, GeminiError, GeminiRequest, Response, Status, StatusClass};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
