//! Storage backend abstraction for network file bytes

/// Trait for backends that expose the raw bytes of one network file
///
/// Implemented for memory-mapped files and in-memory buffers alike,
/// so decoding never depends on where the bytes came from.
pub trait StorageBackend {
    /// Get the underlying bytes
    fn as_slice(&self) -> &[u8];

    /// Get the size of the data in bytes
    fn size(&self) -> usize {
        self.as_slice().len()
    }

    /// Get `len` bytes starting at `offset`, if in range
    fn range(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.as_slice().get(offset..end)
    }
}

impl StorageBackend for [u8] {
    fn as_slice(&self) -> &[u8] {
        self
    }
}

#[cfg(feature = "alloc")]
impl StorageBackend for alloc::vec::Vec<u8> {
    fn as_slice(&self) -> &[u8] {
        self
    }
}
