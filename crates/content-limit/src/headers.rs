//! Read-only header views the guard can evaluate.
//!
//! The guard never mutates the request, it only needs the first value of
//! `Content-Length` and `Transfer-Encoding`. Lookups go through [`HeaderName`], so they
//! are case-insensitive.

use http::request::Parts;
use http::{HeaderMap, HeaderName, HeaderValue, Request};

pub trait RequestHeaders {
    /// Returns the first value of the header `name`, if present.
    fn first(&self, name: &HeaderName) -> Option<&HeaderValue>;
}

impl RequestHeaders for HeaderMap {
    #[inline]
    fn first(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.get(name)
    }
}

impl RequestHeaders for Parts {
    #[inline]
    fn first(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }
}

impl<B> RequestHeaders for Request<B> {
    #[inline]
    fn first(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers().get(name)
    }
}

/// Returns the header value only when it is present and not empty.
pub(crate) fn non_empty<'h, H>(headers: &'h H, name: &HeaderName) -> Option<&'h HeaderValue>
where
    H: RequestHeaders + ?Sized,
{
    headers.first(name).filter(|value| !value.is_empty())
}

/// Any non empty `Transfer-Encoding` value means the body is streamed.
pub(crate) fn is_transfer_encoding<H>(headers: &H) -> bool
where
    H: RequestHeaders + ?Sized,
{
    non_empty(headers, &http::header::TRANSFER_ENCODING).is_some()
}
