use crate::error::{AgentError, Result};

/// Fixed-capacity accumulator for one response body.
///
/// Holds at most `limit - 1` bytes. Bytes past that are dropped without
/// error; identities and task descriptions are expected to be short.
#[derive(Debug)]
pub struct ResponseBuffer {
    data: Vec<u8>,
    limit: usize,
}

impl ResponseBuffer {
    pub fn new(limit: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(limit)
            .map_err(|e| AgentError::Allocation(format!("response buffer: {e}")))?;
        Ok(Self { data, limit })
    }

    fn max_len(&self) -> usize {
        self.limit.saturating_sub(1)
    }

    /// Append as much of `chunk` as fits. Returns the number of bytes kept.
    pub fn extend(&mut self, chunk: &[u8]) -> usize {
        let room = self.max_len().saturating_sub(self.data.len());
        let take = room.min(chunk.len());
        self.data.extend_from_slice(&chunk[..take]);
        take
    }

    pub fn is_full(&self) -> bool {
        self.data.len() >= self.max_len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Decode the kept bytes. A multi-byte character cut at the limit
    /// becomes U+FFFD.
    pub fn into_string(self) -> String {
        match String::from_utf8(self.data) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}
