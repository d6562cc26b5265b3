use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Bytes that Windows-1252 leaves undefined; their presence rules it out.
const CP1252_UNDEFINED: &[u8] = &[0x81, 0x8D, 0x8F, 0x90, 0x9D];

/// Decode a CSV file's bytes, returning the text and the encoding used.
///
/// A byte-order mark wins; then valid UTF-8; then Windows-1252 for the
/// high-byte text that spreadsheet exports produce. Anything else is read as
/// UTF-8 with replacement characters.
pub fn decode(bytes: &[u8]) -> (String, &'static Encoding) {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return (text.into_owned(), encoding);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), UTF_8);
    }

    if looks_like_windows_1252(bytes) {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        return (text.into_owned(), WINDOWS_1252);
    }

    (String::from_utf8_lossy(bytes).into_owned(), UTF_8)
}

fn looks_like_windows_1252(bytes: &[u8]) -> bool {
    let high = bytes.iter().filter(|b| **b >= 0x80).count();
    high > 0 && !bytes.iter().any(|b| CP1252_UNDEFINED.contains(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passes_through() {
        let (text, encoding) = decode("Wašíču".as_bytes());
        assert_eq!(text, "Wašíču");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"Family Name");
        let (text, encoding) = decode(&bytes);
        assert_eq!(text, "Family Name");
        assert_eq!(encoding, UTF_8);
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "café" and a curly apostrophe as written by a Windows export
        let bytes = b"caf\xE9 O\x92Neil";
        let (text, encoding) = decode(bytes);
        assert_eq!(encoding, WINDOWS_1252);
        assert_eq!(text, "café O\u{2019}Neil");
    }

    #[test]
    fn test_undefined_bytes_fall_back_to_lossy_utf8() {
        let (text, encoding) = decode(b"abc\x81def");
        assert_eq!(encoding, UTF_8);
        assert!(text.contains('\u{FFFD}'));
    }
}
