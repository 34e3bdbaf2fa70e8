//! `http_body::Body` adapter for pull based servers.
//!
//! Servers built on `http_body::Body` pull request frames instead of pushing chunks
//! through a [`ReadWriteStream`](crate::chain::ReadWriteStream). [`LimitedBody`] runs
//! the same [`LimitFilter`] over the data frames of any such body: frames under the limit
//! are yielded unchanged, the frame crossing the limit is replaced by a single
//! [`BodyError::TooLarge`], and the body ends right after.

use std::pin::Pin;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use http_body_util::Either;
use pin_project_lite::pin_project;

use crate::error::BodyError;
use crate::filter::{ChunkAction, LimitFilter};

/// Request body returned by [`ContentLimitPolicy::apply`](crate::ContentLimitPolicy::apply):
/// limited when streamed, untouched when its declared length was already validated.
pub type GuardedBody<B> = Either<LimitedBody<B>, B>;

pin_project! {
    /// A body counting its data frames against a content limit.
    #[derive(Debug)]
    pub struct LimitedBody<B> {
        #[pin]
        inner: B,
        filter: LimitFilter,
        done: bool,
    }
}

impl<B> LimitedBody<B> {
    pub fn new(inner: B, filter: LimitFilter) -> Self {
        Self { inner, filter, done: false }
    }

    pub fn filter(&self) -> &LimitFilter {
        &self.filter
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B> Body for LimitedBody<B>
where
    B: Body<Data = Bytes>,
{
    type Data = Bytes;
    type Error = BodyError<B::Error>;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        let action = match ready!(this.inner.poll_frame(cx)) {
            Some(Ok(frame)) => match frame.into_data() {
                Ok(data) => this.filter.on_chunk(data),
                // trailers carry no body bytes
                Err(frame) => return Poll::Ready(Some(Ok(frame))),
            },
            Some(Err(e)) => return Poll::Ready(Some(Err(BodyError::Upstream(e)))),
            None => ChunkAction::Discard,
        };

        match action {
            ChunkAction::Forward(data) => Poll::Ready(Some(Ok(Frame::data(data)))),
            ChunkAction::Reject(failure) => {
                *this.done = true;
                Poll::Ready(Some(Err(BodyError::TooLarge(failure))))
            }
            ChunkAction::Discard => {
                *this.done = true;
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.done || self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        if self.done { SizeHint::with_exact(0) } else { self.inner.size_hint() }
    }
}
