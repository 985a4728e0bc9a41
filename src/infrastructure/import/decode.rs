// ============================================================
// UPLOAD DECODER
// ============================================================
// Decode uploaded spreadsheet bytes into text

use encoding_rs::UTF_8;
use tracing::warn;

/// Decode raw uploaded bytes into a string. A BOM redirects decoding to the
/// encoding it announces; otherwise the bytes are read as UTF-8 with
/// malformed sequences replaced rather than rejected, since a handful of
/// bad bytes should not block an entire import.
pub fn decode_text(bytes: &[u8]) -> String {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        warn!(
            encoding = encoding.name(),
            "replaced malformed sequences while decoding uploaded file"
        );
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_utf8_passes_through() {
        assert_eq!(decode_text("John,Doe".as_bytes()), "John,Doe");
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a', b',', b'b'];
        assert_eq!(decode_text(&bytes), "a,b");
    }

    #[test]
    fn test_utf16le_bom_switches_encoding() {
        let bytes = [0xFF, 0xFE, b'a', 0x00, b',', 0x00, b'b', 0x00];
        assert_eq!(decode_text(&bytes), "a,b");
    }

    #[test]
    fn test_malformed_bytes_are_replaced_not_fatal() {
        let bytes = [b'a', 0xFF, b'b'];
        let text = decode_text(&bytes);
        assert!(text.starts_with('a') && text.ends_with('b'));
        assert!(text.contains('\u{FFFD}'));
    }
}
