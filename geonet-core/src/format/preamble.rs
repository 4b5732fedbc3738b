//! Shared 60-byte file preamble
//!
//! Every network file opens with three label/value pairs:
//! `VERSION`, `CREATED ON` and `CREATED BY`. Each label and value is
//! ten bytes wide and space padded.

use super::constants::{PREAMBLE_FIELD_WIDTH, PREAMBLE_LABELS, PREAMBLE_SIZE};
use crate::validation::{fields::validate_label, text};
use crate::{RecordError, Result};

/// Decoded preamble values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePreamble {
    /// Right-justified version value
    pub version: [u8; PREAMBLE_FIELD_WIDTH],
    /// Right-justified creation date value
    pub created_on: [u8; PREAMBLE_FIELD_WIDTH],
    /// Right-justified creator value
    pub created_by: [u8; PREAMBLE_FIELD_WIDTH],
}

impl FilePreamble {
    /// Size of the preamble in bytes
    pub const SIZE: usize = PREAMBLE_SIZE;

    /// Create a preamble, truncating each value to the field width
    pub fn new(version: &str, created_on: &str, created_by: &str) -> Self {
        let mut preamble = Self {
            version: [b' '; PREAMBLE_FIELD_WIDTH],
            created_on: [b' '; PREAMBLE_FIELD_WIDTH],
            created_by: [b' '; PREAMBLE_FIELD_WIDTH],
        };
        text::pad_right_justified(&mut preamble.version, version);
        text::pad_right_justified(&mut preamble.created_on, created_on);
        text::pad_right_justified(&mut preamble.created_by, created_by);
        preamble
    }

    /// Version value without padding
    pub fn version(&self) -> &str {
        text::read_padded(&self.version)
    }

    /// Creation date without padding
    pub fn created_on(&self) -> &str {
        text::read_padded(&self.created_on)
    }

    /// Creator without padding
    pub fn created_by(&self) -> &str {
        text::read_padded(&self.created_by)
    }

    /// Parse the preamble, checking all three labels
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(RecordError::InsufficientBuffer);
        }

        let mut values = [[0u8; PREAMBLE_FIELD_WIDTH]; 3];
        for (i, (label, value)) in PREAMBLE_LABELS.iter().zip(values.iter_mut()).enumerate() {
            let start = i * 2 * PREAMBLE_FIELD_WIDTH;
            let label_field = &bytes[start..start + PREAMBLE_FIELD_WIDTH];
            validate_label(label_field, label)?;
            value.copy_from_slice(
                &bytes[start + PREAMBLE_FIELD_WIDTH..start + 2 * PREAMBLE_FIELD_WIDTH],
            );
        }

        let [version, created_on, created_by] = values;
        Ok(Self {
            version,
            created_on,
            created_by,
        })
    }

    /// Convert preamble to bytes
    pub fn to_bytes(&self) -> [u8; PREAMBLE_SIZE] {
        let mut bytes = [b' '; PREAMBLE_SIZE];
        let values = [&self.version, &self.created_on, &self.created_by];
        for (i, (label, value)) in PREAMBLE_LABELS.iter().zip(values).enumerate() {
            let start = i * 2 * PREAMBLE_FIELD_WIDTH;
            text::pad_left_justified(&mut bytes[start..start + PREAMBLE_FIELD_WIDTH], label);
            bytes[start + PREAMBLE_FIELD_WIDTH..start + 2 * PREAMBLE_FIELD_WIDTH]
                .copy_from_slice(value);
        }
        bytes
    }
}

impl Default for FilePreamble {
    fn default() -> Self {
        Self::new("1.0", "", "")
    }
}
