use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

const INVALID_LENGTH_MESSAGE: &str = "Content-length is not a valid integer";
const TOO_LARGE_MESSAGE: &str = "request exceeds size limit";
const LENGTH_REQUIRED_MESSAGE: &str = "length required";

/// The reason a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// `Content-Length` is present but is not a base-10 integer.
    InvalidLength,
    /// Neither `Content-Length` nor `Transfer-Encoding` is present.
    LengthRequired,
    /// The declared or streamed length exceeds the limit.
    TooLarge,
}

impl FailureKind {
    /// Stable key the gateway can use to customise the rendered error.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            FailureKind::InvalidLength => "REQUEST_CONTENT_LIMIT_INVALID_LENGTH",
            FailureKind::LengthRequired => "REQUEST_CONTENT_LIMIT_LENGTH_REQUIRED",
            FailureKind::TooLarge => "REQUEST_CONTENT_LIMIT_TOO_LARGE",
        }
    }

    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            FailureKind::InvalidLength => StatusCode::BAD_REQUEST,
            FailureKind::LengthRequired => StatusCode::LENGTH_REQUIRED,
            FailureKind::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A structured rejection: kind, HTTP status, message and diagnostic details.
///
/// All failures are terminal for the request, the pipeline is expected to answer
/// with [`status`](Self::status) and stop processing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct PolicyFailure {
    kind: FailureKind,
    status: StatusCode,
    message: &'static str,
    details: BTreeMap<&'static str, u64>,
}

impl PolicyFailure {
    fn new(kind: FailureKind, message: &'static str) -> Self {
        Self { kind, status: kind.status(), message, details: BTreeMap::new() }
    }

    fn with_detail(mut self, name: &'static str, value: u64) -> Self {
        self.details.insert(name, value);
        self
    }

    #[must_use]
    pub fn invalid_length() -> Self {
        Self::new(FailureKind::InvalidLength, INVALID_LENGTH_MESSAGE)
    }

    #[must_use]
    pub fn length_required(limit: u64) -> Self {
        Self::new(FailureKind::LengthRequired, LENGTH_REQUIRED_MESSAGE).with_detail("limit", limit)
    }

    #[must_use]
    pub fn too_large(length: u64, limit: u64) -> Self {
        Self::new(FailureKind::TooLarge, TOO_LARGE_MESSAGE).with_detail("length", length).with_detail("limit", limit)
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }

    #[must_use]
    pub fn details(&self) -> &BTreeMap<&'static str, u64> {
        &self.details
    }

    #[must_use]
    pub fn detail(&self, name: &str) -> Option<u64> {
        self.details.get(name).copied()
    }

    /// Renders the failure as a JSON response the gateway can send back to the client.
    #[must_use]
    pub fn to_response(&self) -> Response<Full<Bytes>> {
        let rendered = RenderedFailure {
            key: self.kind.key(),
            message: self.message,
            status: self.status.as_u16(),
            parameters: &self.details,
        };

        let body = match serde_json::to_vec(&rendered) {
            Ok(json) => Bytes::from(json),
            Err(e) => {
                error!(cause = %e, "failed to serialize policy failure, fallback to plain message");
                Bytes::from_static(self.message.as_bytes())
            }
        };

        let content_length = HeaderValue::from(body.len());
        let mut response = Response::new(Full::new(body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(http::header::CONTENT_LENGTH, content_length);
        headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        response
    }
}

#[derive(Serialize)]
struct RenderedFailure<'a> {
    key: &'static str,
    message: &'static str,
    status: u16,
    #[serde(skip_serializing_if = "no_parameters")]
    parameters: &'a BTreeMap<&'static str, u64>,
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by serde")]
fn no_parameters(parameters: &&BTreeMap<&'static str, u64>) -> bool {
    parameters.is_empty()
}
