use http::{HeaderMap, HeaderName, HeaderValue};

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    headers: &'static [(&'static str, &'static str)],
    limit: u64,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, headers: &'static [(&'static str, &'static str)], limit: u64) -> Self {
        Self { name, group, headers, limit }
    }

    pub fn accepted(name: &'static str, headers: &'static [(&'static str, &'static str)], limit: u64) -> Self {
        Self::new(name, TestGroup::Accepted, headers, limit)
    }

    pub fn rejected(name: &'static str, headers: &'static [(&'static str, &'static str)], limit: u64) -> Self {
        Self::new(name, TestGroup::Rejected, headers, limit)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Builds the request headers of the case.
    ///
    /// # Panics
    ///
    /// Panics when a header of the case is not a valid header.
    pub fn header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for &(name, value) in self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).expect("bench header name should be valid");
            headers.append(name, HeaderValue::from_static(value));
        }
        headers
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Accepted,
    Rejected,
}

/// A streamed body made of `chunks` chunks of `chunk_size` bytes.
#[derive(Debug, Copy, Clone)]
pub struct ChunkPlan {
    name: &'static str,
    chunk_size: usize,
    chunks: usize,
}

impl ChunkPlan {
    pub const fn new(name: &'static str, chunk_size: usize, chunks: usize) -> Self {
        Self { name, chunk_size, chunks }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    pub fn total_size(&self) -> usize {
        self.chunk_size * self.chunks
    }
}
