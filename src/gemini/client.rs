//! The protocol client: one encrypted connection per request.
//!
//! # Exchange
//! ```text
//! validate request (no I/O)
//!     → TCP connect → TLS handshake (TOFU)
//!     → write request line, flush
//!     → read header line (≤ 1029 bytes)
//!     → success class: read body until EOF or the size cap
//!     → close (close_notify + shutdown) on every path
//! ```

use std::time::{Duration, Instant};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::config::GeminiConfig;
use crate::gemini::error::{GeminiError, GeminiResult};
use crate::gemini::request::{GeminiRequest, PreparedRequest};
use crate::gemini::response::{parse_header_line, Response, DEFAULT_MAX_BODY, MAX_HEADER_LINE};
use crate::gemini::status::StatusClass;
use crate::gemini::tls::tofu_client_config;
use crate::observability::metrics;
use crate::resilience::timeouts::with_deadline;

/// Gemini client. Cheap to clone; holds no per-exchange state.
#[derive(Clone)]
pub struct GeminiClient {
    connector: TlsConnector,
    max_body_size: usize,
    deadline: Option<Duration>,
}

impl GeminiClient {
    /// Client with the default body cap and no deadline.
    pub fn new() -> GeminiResult<Self> {
        Ok(Self {
            connector: TlsConnector::from(tofu_client_config()?),
            max_body_size: DEFAULT_MAX_BODY,
            deadline: None,
        })
    }

    /// Client configured from the `[gemini]` config section.
    pub fn from_config(config: &GeminiConfig) -> GeminiResult<Self> {
        Ok(Self::new()?
            .with_max_body_size(config.max_body_bytes)
            .with_deadline(config.exchange_timeout()))
    }

    /// Cap on accumulated body bytes.
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Bound the whole exchange. `None` waits indefinitely.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Perform one exchange.
    ///
    /// Request validation happens before any network I/O. Failures are
    /// returned as errors and never turned into a synthetic response.
    pub async fn request(&self, request: &GeminiRequest) -> GeminiResult<Response> {
        let start = Instant::now();
        let prepared = match request.prepare() {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::debug!(host = %request.host(), error = %e, "Gemini request rejected");
                metrics::record_exchange(e.kind(), start);
                return Err(e);
            }
        };

        let result = match with_deadline(self.deadline, self.perform(&prepared)).await {
            Ok(result) => result,
            Err(elapsed) => Err(GeminiError::Timeout(elapsed)),
        };

        match &result {
            Ok(response) => {
                tracing::debug!(
                    url = %prepared.url(),
                    status = %response.status(),
                    body_bytes = response.body().map_or(0, <[u8]>::len),
                    "Gemini exchange complete"
                );
                metrics::record_exchange(response.status_class().as_str(), start);
            }
            Err(e) => {
                tracing::debug!(url = %prepared.url(), error = %e, "Gemini exchange failed");
                metrics::record_exchange(e.kind(), start);
            }
        }
        result
    }

    async fn perform(&self, prepared: &PreparedRequest) -> GeminiResult<Response> {
        let tcp = TcpStream::connect((prepared.host(), prepared.port())).await?;
        let server_name = ServerName::try_from(prepared.host().to_string())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let mut stream = self.connector.connect(server_name, tcp).await?;

        tracing::trace!(host = %prepared.host(), port = prepared.port(), "TLS session established");

        let result = exchange(&mut stream, prepared, self.max_body_size).await;
        if let Err(e) = stream.shutdown().await {
            tracing::debug!(error = %e, "Connection shutdown failed");
        }
        result
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("max_body_size", &self.max_body_size)
            .field("deadline", &self.deadline)
            .finish()
    }
}

/// Run the request/response exchange over an established stream.
///
/// The request line is written and flushed before anything is read.
/// Closing the stream is left to the caller.
pub async fn exchange<S>(stream: &mut S, prepared: &PreparedRequest, max_body_size: usize) -> GeminiResult<Response>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(prepared.line()).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream);

    let mut raw_header = Vec::with_capacity(64);
    (&mut reader)
        .take(MAX_HEADER_LINE as u64 + 1)
        .read_until(b'\n', &mut raw_header)
        .await?;
    if raw_header.len() > MAX_HEADER_LINE {
        return Err(GeminiError::HeaderTooLong { limit: MAX_HEADER_LINE });
    }
    let (status, header) = parse_header_line(&raw_header)?;

    let body = match status.class() {
        StatusClass::Success => Some(read_body(&mut reader, max_body_size).await?),
        StatusClass::Input
        | StatusClass::Redirect
        | StatusClass::TemporaryFailure
        | StatusClass::PermanentFailure
        | StatusClass::ClientCertificateRequired => None,
    };

    Ok(Response::new(prepared.url().to_string(), status, header, body))
}

/// Read until end-of-data or `cap` bytes, whichever comes first. Bytes
/// beyond the cap are never requested.
async fn read_body<R>(reader: &mut R, cap: usize) -> GeminiResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut body = Vec::new();
    match reader.take(cap as u64).read_to_end(&mut body).await {
        Ok(_) => {}
        // Many servers close the TCP connection without a TLS close_notify.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            tracing::debug!(body_bytes = body.len(), "Peer closed without close_notify");
        }
        Err(e) => return Err(e.into()),
    }
    tracing::trace!(body_bytes = body.len(), cap, "Body read");
    Ok(body)
}
