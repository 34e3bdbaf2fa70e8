//! A request content limit policy for HTTP gateways
//!
//! This crate guards an HTTP request pipeline against request bodies larger than a
//! configured number of bytes. It is meant to run as one step of a gateway's request
//! processing, before the body is handed to the upstream service.
//!
//! # Enforcement
//!
//! The limit is enforced in two phases:
//!
//! - **Header phase**: the declared `Content-Length` is checked before any body byte
//!   is read. Oversized requests are refused with `413`, unparseable lengths with `400`,
//!   and requests that neither declare a length nor stream their body with `411`.
//! - **Body phase**: requests carrying a `Transfer-Encoding` header have no declared
//!   length, so a [`LimitFilter`] counts the bytes of every chunk and fails the request
//!   on the first chunk that crosses the limit.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::{Request, StatusCode};
//! use http_body_util::Full;
//! use micro_content_limit::{ContentLimitConfig, ContentLimitPolicy};
//!
//! let config = ContentLimitConfig::from_json_str(r#"{"limit": 10}"#).unwrap();
//! let policy = ContentLimitPolicy::new(config);
//!
//! let request = Request::builder()
//!     .header(http::header::CONTENT_LENGTH, "20")
//!     .body(Full::new(Bytes::from_static(b"01234567890123456789")))
//!     .unwrap();
//!
//! let failure = policy.apply(request).unwrap_err();
//! assert_eq!(failure.status(), StatusCode::PAYLOAD_TOO_LARGE);
//! assert_eq!(failure.detail("length"), Some(20));
//! ```
//!
//! # Architecture
//!
//! - [`ContentLengthGuard`]: the two enforcement entry points,
//!   [`evaluate_headers`](ContentLengthGuard::evaluate_headers) and
//!   [`wrap_body_stream`](ContentLengthGuard::wrap_body_stream)
//! - [`LimitFilter`] and [`StreamCounter`]: per request byte counting
//! - [`chain`]: the push based pipeline contract, [`chain::PolicyChain`] and
//!   [`chain::ReadWriteStream`]
//! - [`body`]: an `http_body::Body` adapter for pull based servers
//! - [`ContentLimitPolicy`]: binds the guard to a pipeline
//!
//! # Error Handling
//!
//! Every rejection is reported as a [`PolicyFailure`] carrying a stable [`FailureKind`],
//! the HTTP status to answer with, a message and diagnostic details (`length`, `limit`).

mod config;
mod counter;
mod error;
mod failure;
mod filter;
mod guard;
mod headers;
mod outcome;
mod policy;

pub mod body;
pub mod chain;

pub use config::ContentLimitConfig;
pub use counter::StreamCounter;
pub use error::BodyError;
pub use error::ConfigError;
pub use failure::FailureKind;
pub use failure::PolicyFailure;
pub use filter::ChunkAction;
pub use filter::LimitFilter;
pub use guard::ContentLengthGuard;
pub use headers::RequestHeaders;
pub use outcome::EvaluationOutcome;
pub use policy::ContentLimitPolicy;

#[cfg(test)]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init();
}
