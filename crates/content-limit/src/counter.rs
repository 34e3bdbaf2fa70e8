/// Number of body bytes observed so far for one request.
///
/// A counter belongs to exactly one request body stream and is dropped with it. It is
/// only ever incremented.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamCounter {
    bytes_seen: u64,
}

impl StreamCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes_seen: 0 }
    }

    /// Adds a chunk of `len` bytes and returns the cumulative count.
    pub fn record(&mut self, len: usize) -> u64 {
        let len = u64::try_from(len).unwrap_or(u64::MAX);
        self.bytes_seen = self.bytes_seen.saturating_add(len);
        self.bytes_seen
    }

    #[must_use]
    pub const fn bytes_seen(&self) -> u64 {
        self.bytes_seen
    }
}
