//! Response status codes and their classes.

use serde::Serialize;

/// The tens-digit grouping of a status code.
///
/// Closed set: consumers match on it exhaustively, so adding a class is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Input,
    Success,
    Redirect,
    TemporaryFailure,
    PermanentFailure,
    ClientCertificateRequired,
}

impl StatusClass {
    /// The class as a status code with the ones digit zeroed.
    pub fn base_code(self) -> u8 {
        match self {
            StatusClass::Input => 10,
            StatusClass::Success => 20,
            StatusClass::Redirect => 30,
            StatusClass::TemporaryFailure => 40,
            StatusClass::PermanentFailure => 50,
            StatusClass::ClientCertificateRequired => 60,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusClass::Input => "input",
            StatusClass::Success => "success",
            StatusClass::Redirect => "redirect",
            StatusClass::TemporaryFailure => "temporary_failure",
            StatusClass::PermanentFailure => "permanent_failure",
            StatusClass::ClientCertificateRequired => "client_certificate_required",
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A two-digit status code in `10..=69`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Status(u8);

impl Status {
    /// Status 11: input that should not be echoed.
    pub const SENSITIVE_INPUT: Status = Status(11);

    /// Build a status from its numeric code, rejecting codes outside `10..=69`.
    pub fn new(code: u8) -> Option<Self> {
        (10..=69).contains(&code).then_some(Self(code))
    }

    /// Raw numeric code.
    pub fn code(self) -> u8 {
        self.0
    }

    pub fn class(self) -> StatusClass {
        match self.0 / 10 {
            1 => StatusClass::Input,
            2 => StatusClass::Success,
            3 => StatusClass::Redirect,
            4 => StatusClass::TemporaryFailure,
            5 => StatusClass::PermanentFailure,
            _ => StatusClass::ClientCertificateRequired,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
