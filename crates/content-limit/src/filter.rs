use bytes::Bytes;
use tracing::{trace, warn};

use crate::counter::StreamCounter;
use crate::failure::PolicyFailure;

/// What the pipeline should do with a chunk handed to [`LimitFilter::on_chunk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkAction {
    /// Forward the chunk unchanged to the downstream consumer.
    Forward(Bytes),
    /// The chunk crossed the limit: drop it and fail the request mid-stream.
    Reject(PolicyFailure),
    /// A rejection was already signaled, drop the chunk silently.
    Discard,
}

/// Counting filter attached to a streamed request body.
///
/// The filter is created fresh for every request by
/// [`ContentLengthGuard::wrap_body_stream`](crate::ContentLengthGuard::wrap_body_stream).
/// It rejects on the first chunk that makes the cumulative size exceed the limit and
/// becomes inert afterwards, so a request is rejected at most once.
#[derive(Debug)]
pub struct LimitFilter {
    limit: u64,
    counter: StreamCounter,
    rejected: bool,
}

impl LimitFilter {
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self { limit, counter: StreamCounter::new(), rejected: false }
    }

    pub fn on_chunk(&mut self, chunk: Bytes) -> ChunkAction {
        if self.rejected {
            trace!(chunk_size = chunk.len(), "discard request chunk after rejection");
            return ChunkAction::Discard;
        }

        let bytes_seen = self.counter.record(chunk.len());
        if bytes_seen > self.limit {
            self.rejected = true;
            warn!(length = bytes_seen, limit = self.limit, "request content exceeds limit while streaming");
            return ChunkAction::Reject(PolicyFailure::too_large(bytes_seen, self.limit));
        }

        trace!(chunk_size = chunk.len(), bytes_seen, "forward request chunk");
        ChunkAction::Forward(chunk)
    }

    /// Returns whether end-of-stream should be forwarded downstream.
    #[must_use]
    pub fn on_end(&self) -> bool {
        !self.rejected
    }

    #[must_use]
    pub fn bytes_seen(&self) -> u64 {
        self.counter.bytes_seen()
    }

    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        self.rejected
    }
}
