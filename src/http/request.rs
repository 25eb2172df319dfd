//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Map gateway paths (`/<host[:port]>/<path>`) onto capsule addresses
//! - Percent-encode user input before it becomes a protocol query
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The raw (still percent-encoded) URI path is forwarded, never a decoded one
//! - Malformed authorities are rejected before any network I/O

use axum::http::{HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::Url;

use crate::gemini::request::DEFAULT_PORT;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// The request ID of an incoming request, for log fields.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// A capsule resource addressed through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapsuleTarget {
    /// Lower-cased host name.
    pub host: String,
    /// Port as written; range is checked by the client.
    pub port: u32,
    /// Resource path, always starting with '/'.
    pub path: String,
}

impl CapsuleTarget {
    /// Parse a gateway path such as `/example.org/docs/` or
    /// `/example.org:1966/`.
    pub fn from_gateway_path(path: &str) -> Option<Self> {
        let rest = path.strip_prefix('/')?;
        let (authority, resource) = match rest.find('/') {
            Some(i) => rest.split_at(i),
            None => (rest, "/"),
        };
        let (host, port) = parse_authority(authority)?;
        Some(Self {
            host,
            port,
            path: resource.to_string(),
        })
    }

    /// `host` or `host:port`, the port omitted when it is the default.
    pub fn authority(&self) -> String {
        if self.port == u32::from(DEFAULT_PORT) {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Gateway path for this target.
    pub fn gateway_path(&self) -> String {
        format!("/{}{}", self.authority(), self.path)
    }
}

/// Split `host[:port]`, validating the host against
/// `[a-z0-9-]+(\.[a-z0-9-]+)*`.
pub fn parse_authority(authority: &str) -> Option<(String, u32)> {
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u32>().ok()?),
        None => (authority, u32::from(DEFAULT_PORT)),
    };
    let host = host.to_ascii_lowercase();
    is_valid_host(&host).then_some((host, port))
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty() && label.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        })
}

/// Percent-encode user input with the URL query encode set.
pub fn encode_query(raw: &str) -> Option<String> {
    let mut url = Url::parse("gemini://localhost/").ok()?;
    url.set_query(Some(raw));
    url.query().map(str::to_owned)
}

/// Resolve `target` against the URL a response came from and express it as
/// a gateway link when it stays on the protocol; other schemes are returned
/// as absolute URLs.
pub fn gateway_href(base: &str, target: &str) -> String {
    let Some(resolved) = Url::parse(base).and_then(|b| b.join(target)).ok() else {
        return target.to_string();
    };
    if resolved.scheme() != crate::gemini::request::SCHEME {
        return resolved.to_string();
    }
    let Some(host) = resolved.host_str() else {
        return resolved.to_string();
    };
    let mut href = match resolved.port() {
        Some(port) if port != DEFAULT_PORT => format!("/{host}:{port}"),
        _ => format!("/{host}"),
    };
    href.push_str(if resolved.path().is_empty() { "/" } else { resolved.path() });
    if let Some(query) = resolved.query() {
        href.push_str("?q=");
        href.push_str(query);
    }
    href
}
