//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a Gemini response into an HTTP response, per status class
//! - Split success meta into media type and parameters
//! - Map client failures to gateway-style HTTP errors
//!
//! # Design Decisions
//! - Gemtext is decoded with its declared charset (UTF-8 if none) and
//!   rendered to HTML; an unknown charset label falls back to pass-through
//! - Other bodies pass through untouched; text without a charset is
//!   labelled UTF-8
//! - Timeouts become 504 Gateway Timeout, other upstream failures 502
//! - Error bodies carry only a short failure kind; details go to the log

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use encoding_rs::Encoding;

use crate::gemini::{GeminiError, Response as GeminiResponse, Status, StatusClass};
use crate::gemtext;
use crate::http::pages;
use crate::http::request::{gateway_href, CapsuleTarget};

/// A parsed `type/subtype; key=value` meta line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// Lower-cased `type/subtype`.
    pub essence: String,
    /// Parameters with lower-cased keys and unquoted values.
    pub params: Vec<(String, String)>,
}

impl MediaType {
    pub fn parse(meta: &str) -> Self {
        let mut parts = meta.split(';');
        let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        let params = parts
            .filter_map(|part| {
                let (key, value) = part.split_once('=')?;
                let value = value.trim().trim_matches('"');
                Some((key.trim().to_ascii_lowercase(), value.to_string()))
            })
            .collect();
        Self { essence, params }
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_text(&self) -> bool {
        self.essence.starts_with("text/")
    }

    /// Declared charset, defaulting to UTF-8 for text types. Non-text types
    /// have none.
    pub fn charset(&self) -> Option<String> {
        if !self.is_text() {
            return None;
        }
        Some(self.param("charset").unwrap_or("utf-8").to_ascii_lowercase())
    }

    pub fn is_gemtext(&self) -> bool {
        self.essence == "text/gemini"
    }
}

/// Content type for a pass-through body. Text without a declared charset
/// is labelled UTF-8 so browsers do not guess.
fn passthrough_content_type(meta: &str, media: &MediaType) -> HeaderValue {
    let value = if media.is_text() && media.param("charset").is_none() {
        format!("{}; charset=utf-8", meta.trim_end().trim_end_matches(';'))
    } else {
        meta.to_string()
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

/// Build the HTTP response for a completed exchange.
pub fn from_gemini(target: &CapsuleTarget, response: GeminiResponse) -> Response {
    let status = response.status();
    match response.status_class() {
        StatusClass::Success => success(target, response),
        StatusClass::Input => {
            let prompt = match response.header() {
                "" => "Enter your query",
                prompt => prompt,
            };
            let sensitive = status == Status::SENSITIVE_INPUT;
            Html(pages::input(target, status, prompt, sensitive)).into_response()
        }
        StatusClass::Redirect => {
            let href = gateway_href(response.url(), response.header());
            Html(pages::redirect(target, status, response.header(), &href)).into_response()
        }
        StatusClass::TemporaryFailure
        | StatusClass::PermanentFailure
        | StatusClass::ClientCertificateRequired => {
            Html(pages::failure(target, status, response.status_class(), response.header())).into_response()
        }
    }
}

fn success(target: &CapsuleTarget, response: GeminiResponse) -> Response {
    let media = MediaType::parse(response.header());
    let encoding = if media.is_gemtext() {
        media
            .charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
    } else {
        None
    };
    let content_type = passthrough_content_type(response.header(), &media);
    let body = response.into_body().unwrap_or_default();

    if let Some(encoding) = encoding {
        let (source, had_errors) = encoding.decode_without_bom_handling(&body);
        if had_errors {
            tracing::debug!(charset = encoding.name(), "Replaced undecodable bytes");
        }
        let html = gemtext::to_html(&source);
        return Html(pages::gemtext(target, &html, &source)).into_response();
    }

    if media.is_gemtext() {
        tracing::debug!(charset = ?media.param("charset"), "Unknown charset, passing gemtext through");
    }
    tracing::debug!(media_type = %media.essence, bytes = body.len(), "Passing body through");
    ([(header::CONTENT_TYPE, content_type)], Body::from(body)).into_response()
}

/// Map a client failure to a gateway error. The detail is logged by the
/// caller, not shown.
pub fn from_error(err: &GeminiError) -> Response {
    let status = if err.is_request_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(err, GeminiError::Timeout(_)) {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Html(pages::gateway_error(status, err.kind()))).into_response()
}
