//! Fixed-width text field encoding
//!
//! Record text fields are NUL padded and always keep one trailing NUL.
//! Preamble fields are space padded, labels left-justified and values
//! right-justified.

/// Largest prefix of `text` that fits in `max` bytes without splitting a char
fn truncate_at_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Write `text` into a NUL padded field, truncating to `dest.len() - 1` bytes
pub fn write_fixed(dest: &mut [u8], text: &str) {
    dest.fill(0);
    if dest.is_empty() {
        return;
    }
    let kept = truncate_at_boundary(text, dest.len() - 1);
    dest[..kept.len()].copy_from_slice(kept.as_bytes());
}

/// Encode `text` into a new NUL padded array
pub fn encode_fixed<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [0u8; N];
    write_fixed(&mut field, text);
    field
}

/// Read a NUL padded field up to its first NUL
///
/// Invalid UTF-8 yields the longest valid prefix.
pub fn read_fixed(src: &[u8]) -> &str {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    let bytes = &src[..end];
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            // valid_up_to is always a char boundary
            core::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default()
        }
    }
}

/// Left-justify `text` in a space padded field
pub fn pad_left_justified(dest: &mut [u8], text: &str) {
    dest.fill(b' ');
    let kept = truncate_at_boundary(text, dest.len());
    dest[..kept.len()].copy_from_slice(kept.as_bytes());
}

/// Right-justify `text` in a space padded field
pub fn pad_right_justified(dest: &mut [u8], text: &str) {
    dest.fill(b' ');
    let kept = truncate_at_boundary(text, dest.len());
    let start = dest.len() - kept.len();
    dest[start..].copy_from_slice(kept.as_bytes());
}

/// Read a space padded field with surrounding blanks removed
pub fn read_padded(src: &[u8]) -> &str {
    read_fixed(src).trim_matches(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_roundtrip() {
        let field: [u8; 8] = encode_fixed("ALBY");
        assert_eq!(&field, b"ALBY\0\0\0\0");
        assert_eq!(read_fixed(&field), "ALBY");
    }

    #[test]
    fn test_fixed_truncation_keeps_terminator() {
        let field: [u8; 4] = encode_fixed("ABCDEFG");
        assert_eq!(&field, b"ABC\0");
        assert_eq!(read_fixed(&field), "ABC");
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 'é' is two bytes; only one byte of room remains after "AB"
        let field: [u8; 4] = encode_fixed("ABé");
        assert_eq!(read_fixed(&field), "AB");
    }

    #[test]
    fn test_read_unterminated_field() {
        assert_eq!(read_fixed(b"FULL"), "FULL");
        assert_eq!(read_fixed(b""), "");
    }

    #[test]
    fn test_invalid_utf8_prefix() {
        assert_eq!(read_fixed(&[b'O', b'K', 0xFF, b'X']), "OK");
    }

    #[test]
    fn test_padded_justification() {
        let mut label = [0u8; 10];
        pad_left_justified(&mut label, "VERSION");
        assert_eq!(&label, b"VERSION   ");

        let mut value = [0u8; 10];
        pad_right_justified(&mut value, "1.0");
        assert_eq!(&value, b"       1.0");
        assert_eq!(read_padded(&value), "1.0");

        pad_right_justified(&mut value, "geonet-core-tools");
        assert_eq!(&value, b"geonet-cor");
    }
}
