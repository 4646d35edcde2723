//! UTF-8 conversions between strings and byte buffers.

use std::borrow::Cow;

/// The UTF-8 bytes of `s`.
pub fn to_utf8_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Safe [`to_utf8_bytes`]: `None` in, `None` out.
pub fn to_utf8_bytes_opt(s: Option<&str>) -> Option<Vec<u8>> {
    s.map(to_utf8_bytes)
}

/// Decode UTF-8, replacing invalid sequences with U+FFFD.
pub fn from_utf8_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Safe [`from_utf8_lossy`]: `None` in, `None` out.
pub fn from_utf8_lossy_opt(bytes: Option<&[u8]>) -> Option<Cow<'_, str>> {
    bytes.map(from_utf8_lossy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_conversions() {
        let bytes = to_utf8_bytes("Hello\nWorld!");
        assert_eq!(bytes.len(), 12);
        assert_eq!(from_utf8_lossy(&bytes), "Hello\nWorld!");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let decoded = from_utf8_lossy(&[b'o', b'k', 0xff]);
        assert_eq!(decoded, "ok\u{FFFD}");
    }

    #[test]
    fn safe_variants() {
        assert!(to_utf8_bytes_opt(None).is_none());
        assert!(from_utf8_lossy_opt(None).is_none());
        assert_eq!(from_utf8_lossy_opt(Some(&b"abc"[..])).as_deref(), Some("abc"));
    }
}
