//! Response entity and header line parsing.
//!
//! # Wire format
//! ```text
//! <digit 1-6><digit> <meta, 1..=1024 bytes>\r\n
//! [body, success class only]
//! ```

use crate::gemini::error::{GeminiError, GeminiResult};
use crate::gemini::status::{Status, StatusClass};

/// Longest header line accepted, terminator included.
pub const MAX_HEADER_LINE: usize = 1029;

/// Longest meta text between the space and the CRLF.
pub const MAX_META: usize = 1024;

/// Default body cap until streaming bodies are supported.
pub const DEFAULT_MAX_BODY: usize = 128 * 1024;

/// Outcome of one exchange. Immutable once built.
///
/// `body` is present exactly when the status class is
/// [`StatusClass::Success`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    url: String,
    status: Status,
    header: String,
    body: Option<Vec<u8>>,
}

impl Response {
    pub(crate) fn new(url: String, status: Status, header: String, body: Option<Vec<u8>>) -> Self {
        debug_assert_eq!(body.is_some(), status.class() == StatusClass::Success);
        Self {
            url,
            status,
            header,
            body,
        }
    }

    /// The URL actually transmitted.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_class(&self) -> StatusClass {
        self.status.class()
    }

    /// Meta text: media type, redirect target, prompt or error message,
    /// depending on the class.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn into_body(self) -> Option<Vec<u8>> {
        self.body
    }
}

/// Parse a raw header line, terminator included.
///
/// Bytes that are not valid UTF-8 are replaced; decoding never fails.
pub fn parse_header_line(raw: &[u8]) -> GeminiResult<(Status, String)> {
    if raw.len() > MAX_HEADER_LINE {
        return Err(GeminiError::HeaderTooLong {
            limit: MAX_HEADER_LINE,
        });
    }
    let Some(without_crlf) = raw.strip_suffix(b"\r\n") else {
        return Err(GeminiError::HeaderMalformed("missing CRLF terminator"));
    };

    let (code, rest) = match without_crlf {
        [tens @ b'1'..=b'6', ones @ b'0'..=b'9', rest @ ..] => ((tens - b'0') * 10 + (ones - b'0'), rest),
        _ => return Err(GeminiError::HeaderMalformed("status must be two digits in 10..=69")),
    };
    let Some(meta) = rest.strip_prefix(b" ") else {
        return Err(GeminiError::HeaderMalformed("missing space after status"));
    };
    if meta.is_empty() || meta.len() > MAX_META {
        return Err(GeminiError::HeaderMalformed("meta must be 1..=1024 bytes"));
    }
    if meta.contains(&b'\n') {
        return Err(GeminiError::HeaderMalformed("line feed inside meta"));
    }

    let status = Status::new(code).ok_or(GeminiError::HeaderMalformed("status out of range"))?;
    Ok((status, String::from_utf8_lossy(meta).into_owned()))
}
