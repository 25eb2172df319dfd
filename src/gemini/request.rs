//! Request construction and validation.
//!
//! Everything here runs before any network I/O: an invalid port, an
//! oversized URL or a client-certificate request fails fast.

use std::path::PathBuf;

use crate::gemini::error::{GeminiError, GeminiResult};

/// URL scheme of the protocol.
pub const SCHEME: &str = "gemini";

/// Port omitted from canonical URLs.
pub const DEFAULT_PORT: u16 = 1965;

/// Maximum encoded request line, URL plus CRLF.
pub const MAX_REQUEST_LINE: usize = 1026;

/// Client certificate and key for authenticated capsules.
///
/// Accepted by the request builder so callers can express the intent, but
/// always rejected with [`GeminiError::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// A request for one resource on one capsule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiRequest {
    host: String,
    path: String,
    port: u32,
    query: Option<String>,
    client_certificate: Option<ClientCertificate>,
}

impl GeminiRequest {
    /// Request `path` on `host` at the default port.
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            port: u32::from(DEFAULT_PORT),
            query: None,
            client_certificate: None,
        }
    }

    pub fn port(mut self, port: u32) -> Self {
        self.port = port;
        self
    }

    /// Append `?query` to the URL. The value is sent as given.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn client_certificate(mut self, certificate: ClientCertificate) -> Self {
        self.client_certificate = Some(certificate);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Validate the request and encode the request line.
    pub fn prepare(&self) -> GeminiResult<PreparedRequest> {
        let port = u16::try_from(self.port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or(GeminiError::InvalidPort(self.port))?;

        let url = canonical_url(&self.host, port, &self.path, self.query.as_deref());

        let mut line = Vec::with_capacity(url.len() + 2);
        line.extend_from_slice(url.as_bytes());
        line.extend_from_slice(b"\r\n");
        if line.len() > MAX_REQUEST_LINE {
            return Err(GeminiError::RequestTooLong {
                len: line.len(),
                limit: MAX_REQUEST_LINE,
            });
        }

        if self.client_certificate.is_some() {
            return Err(GeminiError::Unsupported("client certificate authentication"));
        }

        Ok(PreparedRequest {
            host: self.host.clone(),
            port,
            url,
            line,
        })
    }
}

/// A validated request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) url: String,
    pub(crate) line: Vec<u8>,
}

impl PreparedRequest {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The URL transmitted on the wire, without the terminator.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The exact bytes written to the connection.
    pub fn line(&self) -> &[u8] {
        &self.line
    }
}

/// `gemini://host[:port]path[?query]`, with the port omitted when it is the
/// default.
pub fn canonical_url(host: &str, port: u16, path: &str, query: Option<&str>) -> String {
    let mut url = format!("{SCHEME}://{host}");
    if port != DEFAULT_PORT {
        url.push(':');
        url.push_str(&port.to_string());
    }
    url.push_str(path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_omitted() {
        let prepared = GeminiRequest::new("example.org", "/docs/").prepare().unwrap();
        assert_eq!(prepared.line(), b"gemini://example.org/docs/\r\n");
        assert_eq!(prepared.port(), 1965);
    }

    #[test]
    fn non_default_port_precedes_path() {
        let prepared = GeminiRequest::new("example.org", "/")
            .port(1966)
            .query("search%20term")
            .prepare()
            .unwrap();
        assert_eq!(prepared.url(), "gemini://example.org:1966/?search%20term");
    }

    #[test]
    fn rejects_ports_outside_range() {
        for port in [0, 65_536, 100_000] {
            let err = GeminiRequest::new("example.org", "/").port(port).prepare().unwrap_err();
            assert!(matches!(err, GeminiError::InvalidPort(p) if p == port));
        }
        assert!(GeminiRequest::new("example.org", "/").port(65_535).prepare().is_ok());
        assert!(GeminiRequest::new("example.org", "/").port(1).prepare().is_ok());
    }

    #[test]
    fn request_line_limit_includes_terminator() {
        // "gemini://h" is 10 bytes; a 1014-byte path makes a 1024-byte URL.
        let fits = format!("/{}", "a".repeat(1013));
        let prepared = GeminiRequest::new("h", fits.clone()).prepare().unwrap();
        assert_eq!(prepared.line().len(), MAX_REQUEST_LINE);

        let too_long = format!("{fits}a");
        let err = GeminiRequest::new("h", too_long).prepare().unwrap_err();
        assert!(matches!(err, GeminiError::RequestTooLong { len: 1027, limit: 1026 }));
    }

    #[test]
    fn multibyte_characters_count_in_bytes() {
        // 'é' is two bytes in UTF-8.
        let path = format!("/{}", "é".repeat(510));
        let err = GeminiRequest::new("h", path).prepare().unwrap_err();
        assert!(matches!(err, GeminiError::RequestTooLong { .. }));
    }

    #[test]
    fn client_certificates_fail_fast() {
        let err = GeminiRequest::new("example.org", "/")
            .client_certificate(ClientCertificate {
                cert_path: "cert.pem".into(),
                key_path: "key.pem".into(),
            })
            .prepare()
            .unwrap_err();
        assert!(matches!(err, GeminiError::Unsupported(_)));
    }
}
