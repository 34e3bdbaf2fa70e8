use bytes::Bytes;
use http::Request;
use http_body::Body;
use http_body_util::Either;
use tracing::debug;

use crate::body::{GuardedBody, LimitedBody};
use crate::chain::{LimitedStream, PolicyChain, ReadWriteStream};
use crate::config::ContentLimitConfig;
use crate::failure::PolicyFailure;
use crate::guard::ContentLengthGuard;
use crate::headers::RequestHeaders;
use crate::outcome::EvaluationOutcome;

/// Binds a [`ContentLengthGuard`] to a request pipeline.
///
/// The gateway registers the policy explicitly and calls:
///
/// - [`on_request`](Self::on_request) when the request headers are available
/// - [`on_request_content`](Self::on_request_content) before streaming the body
///
/// or, with `http` types, [`apply`](Self::apply) which runs both phases at once.
#[derive(Debug, Clone, Copy)]
pub struct ContentLimitPolicy {
    guard: ContentLengthGuard,
}

impl ContentLimitPolicy {
    #[must_use]
    pub const fn new(config: ContentLimitConfig) -> Self {
        Self { guard: ContentLengthGuard::new(config) }
    }

    #[must_use]
    pub const fn guard(&self) -> &ContentLengthGuard {
        &self.guard
    }

    pub fn on_request<H, C>(&self, headers: &H, chain: &mut C)
    where
        H: RequestHeaders + ?Sized,
        C: PolicyChain + ?Sized,
    {
        match self.guard.evaluate_headers(headers) {
            EvaluationOutcome::Continue => chain.do_next(),
            EvaluationOutcome::Reject(failure) => chain.fail_with(failure),
        }
    }

    /// Returns the stream the body must be written to, or `None` when the body can be
    /// forwarded to `downstream` unmodified.
    pub fn on_request_content<H, C, S>(&self, headers: &H, chain: C, downstream: S) -> Option<LimitedStream<C, S>>
    where
        H: RequestHeaders + ?Sized,
        C: PolicyChain,
        S: ReadWriteStream,
    {
        let filter = self.guard.wrap_body_stream(headers)?;
        Some(LimitedStream::new(filter, chain, downstream))
    }

    /// Runs both phases over an `http::Request`.
    ///
    /// A header phase rejection is returned as `Err` without touching the body. A streamed
    /// body is wrapped in a [`LimitedBody`], which reports a mid-stream rejection as a body
    /// error.
    pub fn apply<B>(&self, request: Request<B>) -> Result<Request<GuardedBody<B>>, PolicyFailure>
    where
        B: Body<Data = Bytes>,
    {
        self.guard.evaluate_headers(&request).into_result()?;

        let filter = self.guard.wrap_body_stream(&request);
        if filter.is_some() {
            debug!(uri = %request.uri(), "attach content limit filter to request body");
        }

        Ok(request.map(|body| match filter {
            Some(filter) => Either::Left(LimitedBody::new(body, filter)),
            None => Either::Right(body),
        }))
    }
}
