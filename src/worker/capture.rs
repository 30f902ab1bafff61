use crate::error::{AgentError, Result};

/// Growable byte buffer for captured process output.
///
/// Capacity starts at the configured size and doubles whenever an
/// incoming chunk would not fit in the remaining room.
#[derive(Debug)]
pub struct CaptureBuffer {
    data: Vec<u8>,
    capacity: usize,
    growths: u32,
}

impl CaptureBuffer {
    pub fn with_capacity(initial: usize) -> Result<Self> {
        let capacity = initial.max(1);
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|e| AgentError::Allocation(format!("capture buffer: {e}")))?;
        Ok(Self {
            data,
            capacity,
            growths: 0,
        })
    }

    pub fn append(&mut self, chunk: &[u8]) -> Result<()> {
        let needed = self
            .data
            .len()
            .checked_add(chunk.len())
            .ok_or_else(|| AgentError::Allocation("capture buffer overflow".to_string()))?;
        if needed > self.capacity {
            let (capacity, doublings) = grown_capacity(self.capacity, needed)?;
            self.data
                .try_reserve_exact(capacity - self.data.len())
                .map_err(|e| AgentError::Allocation(format!("capture buffer growth: {e}")))?;
            self.capacity = capacity;
            self.growths += doublings;
        }
        self.data.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical capacity; the allocation may be larger.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of doublings so far.
    pub fn growths(&self) -> u32 {
        self.growths
    }

    pub fn into_string(self) -> String {
        match String::from_utf8(self.data) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

/// Double `capacity` until it holds `needed` bytes. Returns the new
/// capacity and the number of doublings.
fn grown_capacity(capacity: usize, needed: usize) -> Result<(usize, u32)> {
    let mut capacity = capacity.max(1);
    let mut doublings = 0;
    while needed > capacity {
        capacity = capacity
            .checked_mul(2)
            .ok_or_else(|| AgentError::Allocation("capture buffer overflow".to_string()))?;
        doublings += 1;
    }
    Ok((capacity, doublings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial_capacity() {
        let buf = CaptureBuffer::with_capacity(4096).unwrap();
        assert_eq!(buf.capacity(), 4096);
        assert_eq!(buf.growths(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn no_growth_while_chunks_fit() {
        let mut buf = CaptureBuffer::with_capacity(4096).unwrap();
        for _ in 0..4 {
            buf.append(&[b'a'; 1024]).unwrap();
        }
        assert_eq!(buf.len(), 4096);
        assert_eq!(buf.capacity(), 4096);
        assert_eq!(buf.growths(), 0);
    }

    #[test]
    fn doubles_when_chunk_overflows() {
        let mut buf = CaptureBuffer::with_capacity(4096).unwrap();
        for _ in 0..5 {
            buf.append(&[b'a'; 1024]).unwrap();
        }
        assert_eq!(buf.len(), 5120);
        assert_eq!(buf.capacity(), 8192);
        assert_eq!(buf.growths(), 1);
    }

    #[test]
    fn oversized_chunk_doubles_repeatedly() {
        let mut buf = CaptureBuffer::with_capacity(16).unwrap();
        buf.append(&[b'z'; 100]).unwrap();
        assert_eq!(buf.capacity(), 128);
        assert_eq!(buf.growths(), 3);
        assert_eq!(buf.len(), 100);
    }

    #[test]
    fn zero_initial_capacity_still_grows() {
        let mut buf = CaptureBuffer::with_capacity(0).unwrap();
        buf.append(b"hello").unwrap();
        assert_eq!(buf.into_string(), "hello");
    }

    #[test]
    fn content_is_concatenation_of_chunks() {
        let mut buf = CaptureBuffer::with_capacity(4).unwrap();
        buf.append(b"line1\n").unwrap();
        buf.append(b"").unwrap();
        buf.append(b"line2\n").unwrap();
        assert_eq!(buf.into_string(), "line1\nline2\n");
    }

    #[test]
    fn growth_past_address_space_is_allocation_error() {
        let err = grown_capacity(usize::MAX / 2 + 1, usize::MAX).unwrap_err();
        assert!(matches!(err, AgentError::Allocation(_)));
    }

    #[test]
    fn growth_arithmetic() {
        assert_eq!(grown_capacity(4096, 4097).unwrap(), (8192, 1));
        assert_eq!(grown_capacity(4096, 10000).unwrap(), (16384, 2));
        assert_eq!(grown_capacity(4096, 4096).unwrap(), (4096, 0));
    }

    #[test]
    fn oversized_initial_capacity_is_allocation_error() {
        let err = CaptureBuffer::with_capacity(usize::MAX).unwrap_err();
        assert!(matches!(err, AgentError::Allocation(_)));
    }
}
