//! Push based pipeline contract.
//!
//! Gateways that drive request processing through a chain of policies bind the guard
//! through two traits:
//!
//! - [`PolicyChain`]: resumes the pipeline or fails the request. Header phase and
//!   mid-stream failures go through distinct methods because a mid-stream failure
//!   happens after part of the body may already have been forwarded.
//! - [`ReadWriteStream`]: a stream of request body chunks followed by end-of-stream.
//!
//! [`LimitedStream`] is the body phase filter expressed as a [`ReadWriteStream`]
//! sitting in front of the downstream consumer.

use bytes::Bytes;

use crate::failure::PolicyFailure;
use crate::filter::{ChunkAction, LimitFilter};

#[cfg_attr(test, mockall::automock)]
pub trait PolicyChain {
    /// Resumes normal processing of the request.
    fn do_next(&mut self);

    /// Fails the request during the header phase.
    fn fail_with(&mut self, failure: PolicyFailure);

    /// Fails the request while its body is being streamed.
    fn stream_fail_with(&mut self, failure: PolicyFailure);
}

#[cfg_attr(test, mockall::automock)]
pub trait ReadWriteStream {
    fn write(&mut self, chunk: Bytes);

    fn end(&mut self);
}

impl<T: PolicyChain + ?Sized> PolicyChain for &mut T {
    fn do_next(&mut self) {
        (**self).do_next();
    }

    fn fail_with(&mut self, failure: PolicyFailure) {
        (**self).fail_with(failure);
    }

    fn stream_fail_with(&mut self, failure: PolicyFailure) {
        (**self).stream_fail_with(failure);
    }
}

impl<T: ReadWriteStream + ?Sized> ReadWriteStream for &mut T {
    fn write(&mut self, chunk: Bytes) {
        (**self).write(chunk);
    }

    fn end(&mut self) {
        (**self).end();
    }
}

/// A [`ReadWriteStream`] enforcing the content limit in front of `downstream`.
///
/// Chunks are forwarded in arrival order without buffering. The first chunk crossing the
/// limit is dropped and reported once through [`PolicyChain::stream_fail_with`], every
/// later chunk and the end-of-stream are swallowed.
#[derive(Debug)]
pub struct LimitedStream<C, S> {
    filter: LimitFilter,
    chain: C,
    downstream: S,
}

impl<C, S> LimitedStream<C, S>
where
    C: PolicyChain,
    S: ReadWriteStream,
{
    pub fn new(filter: LimitFilter, chain: C, downstream: S) -> Self {
        Self { filter, chain, downstream }
    }

    pub fn filter(&self) -> &LimitFilter {
        &self.filter
    }

    pub fn into_parts(self) -> (LimitFilter, C, S) {
        (self.filter, self.chain, self.downstream)
    }
}

impl<C, S> ReadWriteStream for LimitedStream<C, S>
where
    C: PolicyChain,
    S: ReadWriteStream,
{
    fn write(&mut self, chunk: Bytes) {
        match self.filter.on_chunk(chunk) {
            ChunkAction::Forward(chunk) => self.downstream.write(chunk),
            ChunkAction::Reject(failure) => self.chain.stream_fail_with(failure),
            ChunkAction::Discard => {}
        }
    }

    fn end(&mut self) {
        if self.filter.on_end() {
            self.downstream.end();
        }
    }
}
