//! Record region bounds validation
//!
//! Pure arithmetic checks on declared counts against available bytes,
//! with overflow protection. No I/O.

use crate::format::constants::MAX_RECORD_COUNT;
use crate::RecordError;

/// Validate a declared record count against the bytes that follow it
///
/// Returns the byte length of the record region. Trailing bytes beyond
/// the region are rejected as well, so a count that understates the
/// file is caught just like one that overstates it.
pub fn validate_record_region<T>(available: usize, count: u64) -> Result<usize, RecordError> {
    if count > MAX_RECORD_COUNT {
        return Err(RecordError::TruncatedRecords);
    }

    let needed = (count as usize)
        .checked_mul(core::mem::size_of::<T>())
        .ok_or(RecordError::TruncatedRecords)?;

    if needed > available {
        return Err(RecordError::TruncatedRecords);
    }
    if needed < available {
        return Err(RecordError::CountMismatch);
    }

    Ok(needed)
}

/// Validate a half-open window `[start, start + len)` against `total`
pub const fn validate_window(start: u32, len: u32, total: usize) -> Result<(), RecordError> {
    let end = start as u64 + len as u64;
    if end > total as u64 {
        return Err(RecordError::IndexOutOfBounds);
    }
    Ok(())
}
