//! Field-level validation for station and preamble values

use crate::RecordError;

/// Width of a station constraint code
pub const CONSTRAINT_LEN: usize = 3;

/// Validate a station constraint such as `CCF`
///
/// One character per axis, each `C` (constrained) or `F` (free).
/// Lower case is accepted; callers store the upper-cased form.
pub fn validate_constraint(code: &str) -> Result<(), RecordError> {
    if code.len() != CONSTRAINT_LEN {
        return Err(RecordError::InvalidConstraint);
    }
    if code
        .bytes()
        .all(|b| matches!(b.to_ascii_uppercase(), b'C' | b'F'))
    {
        Ok(())
    } else {
        Err(RecordError::InvalidConstraint)
    }
}

/// Check that a preamble label field carries `expected`
pub fn validate_label(field: &[u8], expected: &str) -> Result<(), RecordError> {
    if super::text::read_padded(field) == expected {
        Ok(())
    } else {
        Err(RecordError::InvalidPreamble)
    }
}
