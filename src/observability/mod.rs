//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gemini client, http handlers:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into handler logs
//! - Metrics are cheap and no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
