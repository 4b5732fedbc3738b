//! Fixed-size record trait

use bytemuck::Pod;

/// A fixed-size record stored in native byte layout
///
/// Records are read and written as whole `#[repr(C)]` values with no
/// per-field conversion.
pub trait BinaryRecord: Pod {
    /// Short file kind used in diagnostics, e.g. "station"
    const KIND: &'static str;

    /// Size of one record in bytes
    const SIZE: usize = core::mem::size_of::<Self>();

    /// Decode one record from an unaligned byte slice
    fn read_from(bytes: &[u8]) -> Option<Self> {
        bytes
            .get(..Self::SIZE)
            .map(bytemuck::pod_read_unaligned::<Self>)
    }
}
