//! The content length guard.
//!
//! The guard has two entry points, one per pipeline phase:
//!
//! 1. [`ContentLengthGuard::evaluate_headers`] runs before any body byte is read and
//!    checks the declared `Content-Length`.
//! 2. [`ContentLengthGuard::wrap_body_stream`] hands out a [`LimitFilter`] for streamed
//!    bodies, which have no declared length to check up front.
//!
//! Both are pure functions of the headers and the configuration, so a single guard can
//! be shared by every request of a pipeline.

use http::HeaderValue;
use tracing::{debug, warn};

use crate::config::ContentLimitConfig;
use crate::failure::PolicyFailure;
use crate::filter::LimitFilter;
use crate::headers::{RequestHeaders, is_transfer_encoding, non_empty};
use crate::outcome::EvaluationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLengthGuard {
    config: ContentLimitConfig,
}

impl ContentLengthGuard {
    #[must_use]
    pub const fn new(config: ContentLimitConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ContentLimitConfig {
        &self.config
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.config.limit()
    }

    /// Header phase: checks the declared length of the request.
    ///
    /// - a non empty `Content-Length` must parse as a signed 64-bit base-10 integer,
    ///   otherwise the request is rejected with `400`, and must not exceed the limit,
    ///   otherwise `413`
    /// - without a declared length, a non empty `Transfer-Encoding` defers the check to
    ///   the body phase
    /// - with neither header the request is rejected with `411`
    pub fn evaluate_headers<H>(&self, headers: &H) -> EvaluationOutcome
    where
        H: RequestHeaders + ?Sized,
    {
        let limit = self.limit();

        if let Some(value) = non_empty(headers, &http::header::CONTENT_LENGTH) {
            debug!(content_length = ?value, "retrieve content-length from request");

            return match parse_content_length(value) {
                // a negative declared length never exceeds the limit
                Some(length) => match u64::try_from(length) {
                    Ok(length) if length > limit => {
                        warn!(length, limit, "declared request content exceeds limit");
                        PolicyFailure::too_large(length, limit).into()
                    }
                    _ => EvaluationOutcome::Continue,
                },
                None => {
                    warn!(content_length = ?value, "content-length is not a valid integer");
                    PolicyFailure::invalid_length().into()
                }
            };
        }

        if is_transfer_encoding(headers) {
            // no declared length, the body phase will count the chunks
            debug!(limit, "streamed request body, defer content limit to body phase");
            return EvaluationOutcome::Continue;
        }

        warn!(limit, "request did not specify the length of its content");
        PolicyFailure::length_required(limit).into()
    }

    /// Body phase: returns a counting filter when the body is streamed.
    ///
    /// Returns `None` when the request has no `Transfer-Encoding`, its declared length
    /// was already fully validated by [`evaluate_headers`](Self::evaluate_headers).
    pub fn wrap_body_stream<H>(&self, headers: &H) -> Option<LimitFilter>
    where
        H: RequestHeaders + ?Sized,
    {
        is_transfer_encoding(headers).then(|| LimitFilter::new(self.limit()))
    }
}

fn parse_content_length(value: &HeaderValue) -> Option<i64> {
    value.to_str().ok()?.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;
    use http::{HeaderMap, StatusCode};

    fn guard(limit: u64) -> ContentLengthGuard {
        crate::init_test_tracing();
        ContentLengthGuard::new(ContentLimitConfig::new(limit))
    }

    fn headers(content_length: Option<&'static str>, transfer_encoding: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = content_length {
            headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from_static(value));
        }
        if let Some(value) = transfer_encoding {
            headers.insert(http::header::TRANSFER_ENCODING, HeaderValue::from_static(value));
        }
        headers
    }

    fn rejected(outcome: &EvaluationOutcome) -> &PolicyFailure {
        outcome.failure().expect("expected a rejection")
    }

    #[test]
    fn length_required_without_any_header() {
        let outcome = guard(1000).evaluate_headers(&headers(None, None));

        let failure = rejected(&outcome);
        assert_eq!(failure.kind(), FailureKind::LengthRequired);
        assert_eq!(failure.status(), StatusCode::LENGTH_REQUIRED);
        assert_eq!(failure.detail("limit"), Some(1000));
    }

    #[test]
    fn bad_request_for_invalid_length() {
        let outcome = guard(1000).evaluate_headers(&headers(Some("invalid-content-length"), None));

        let failure = rejected(&outcome);
        assert_eq!(failure.kind(), FailureKind::InvalidLength);
        assert_eq!(failure.status(), StatusCode::BAD_REQUEST);
        assert_eq!(failure.message(), "Content-length is not a valid integer");
    }

    #[test]
    fn continue_for_transfer_encoding() {
        let guard = guard(1000);
        let headers = headers(None, Some("chunked"));

        assert_eq!(guard.evaluate_headers(&headers), EvaluationOutcome::Continue);

        let filter = guard.wrap_body_stream(&headers).expect("body filter should be attached");
        assert_eq!(filter.limit(), 1000);
        assert_eq!(filter.bytes_seen(), 0);
    }

    #[test]
    fn entity_too_large() {
        let outcome = guard(10).evaluate_headers(&headers(Some("20"), None));

        let failure = rejected(&outcome);
        assert_eq!(failure.kind(), FailureKind::TooLarge);
        assert_eq!(failure.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(failure.detail("length"), Some(20));
        assert_eq!(failure.detail("limit"), Some(10));
    }

    #[test]
    fn continue_under_limit() {
        let guard = guard(20);
        let headers = headers(Some("10"), None);

        assert!(guard.evaluate_headers(&headers).is_continue());
        assert!(guard.wrap_body_stream(&headers).is_none());
    }

    #[test]
    fn declared_length_against_limit() {
        let largest = u64::try_from(i64::MAX).unwrap() - 1;

        for limit in [0, 1, 10, 1024, largest] {
            let guard = guard(limit);

            for length in [0, limit / 2, limit] {
                let mut headers = HeaderMap::new();
                headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from(length));
                assert!(guard.evaluate_headers(&headers).is_continue(), "length {length} limit {limit}");
            }

            let length = limit + 1;
            let mut headers = HeaderMap::new();
            headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from(length));
            let outcome = guard.evaluate_headers(&headers);
            let failure = rejected(&outcome);
            assert_eq!(failure.kind(), FailureKind::TooLarge);
            assert_eq!(failure.detail("length"), Some(length));
            assert_eq!(failure.detail("limit"), Some(limit));
        }
    }

    #[test]
    fn non_numeric_lengths_are_invalid() {
        let guard = guard(1000);

        for value in ["1.5", "0x10", "ten", "--1", "9223372036854775808", "18446744073709551616"] {
            let outcome = guard.evaluate_headers(&headers(Some(value), None));
            assert_eq!(rejected(&outcome).kind(), FailureKind::InvalidLength, "value {value}");
        }

        let mut headers = HeaderMap::new();
        headers.insert(http::header::CONTENT_LENGTH, HeaderValue::from_bytes(b"1\xff").unwrap());
        let outcome = guard.evaluate_headers(&headers);
        assert_eq!(rejected(&outcome).kind(), FailureKind::InvalidLength);
    }

    #[test]
    fn negative_declared_length_continues() {
        for limit in [0, 1000] {
            let guard = guard(limit);

            for value in ["-1", " -20 ", "-9223372036854775808"] {
                let headers = headers(Some(value), None);
                assert!(guard.evaluate_headers(&headers).is_continue(), "value {value} limit {limit}");
                assert!(guard.wrap_body_stream(&headers).is_none());
            }
        }
    }

    #[test]
    fn largest_declared_length_is_too_large() {
        let outcome = guard(1000).evaluate_headers(&headers(Some("9223372036854775807"), None));

        let failure = rejected(&outcome);
        assert_eq!(failure.kind(), FailureKind::TooLarge);
        assert_eq!(failure.detail("length"), Some(u64::try_from(i64::MAX).unwrap()));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let outcome = guard(20).evaluate_headers(&headers(Some(" 10 "), None));
        assert!(outcome.is_continue());
    }

    #[test]
    fn empty_content_length_falls_back_to_transfer_encoding() {
        let guard = guard(1000);

        assert!(guard.evaluate_headers(&headers(Some(""), Some("chunked"))).is_continue());

        let outcome = guard.evaluate_headers(&headers(Some(""), None));
        assert_eq!(rejected(&outcome).kind(), FailureKind::LengthRequired);
    }

    #[test]
    fn any_transfer_encoding_defers_to_body_phase() {
        let guard = guard(1000);
        let headers = headers(None, Some("gzip"));

        assert!(guard.evaluate_headers(&headers).is_continue());
        assert!(guard.wrap_body_stream(&headers).is_some());
    }

    #[test]
    fn declared_length_wins_over_transfer_encoding() {
        let outcome = guard(10).evaluate_headers(&headers(Some("20"), Some("chunked")));
        assert_eq!(rejected(&outcome).kind(), FailureKind::TooLarge);
    }

    #[test]
    fn evaluation_does_not_mutate_headers() {
        let guard = guard(10);
        let headers = headers(Some("5"), Some("chunked"));
        let before = headers.clone();

        let _ = guard.evaluate_headers(&headers);
        let _ = guard.wrap_body_stream(&headers);

        assert_eq!(headers, before);
    }
}
