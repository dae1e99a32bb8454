//! Text decoding and encoding repair.
//!
//! DATASUS tables are written in a Latin-1 family code page. When a tool reads
//! them as UTF-8 (or writes UTF-8 bytes that are later read as Latin-1) the
//! accented characters come out as mojibake such as `PermanÃªncia`. [`repair_text`]
//! reverses that exact mistake and leaves any other string untouched.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Code page used for DBF payloads when none is configured.
///
/// The WHATWG encoding standard maps the `latin1` label to Windows-1252.
pub const DEFAULT_SOURCE_ENCODING: &Encoding = WINDOWS_1252;

/// Resolves an encoding label such as `latin1`, `cp1252` or `utf-8`.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decodes bytes with the given encoding, replacing malformed sequences.
pub fn decode_single_byte(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encodes text with the given encoding. Unmappable characters become
/// numeric character references, which is what `encoding_rs` produces.
pub fn encode_single_byte(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _used, _had_errors) = encoding.encode(text);
    bytes.into_owned()
}

/// Returns the slice with trailing spaces and NUL padding removed.
pub fn trim_field_bytes(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |idx| idx + 1);
    &bytes[..end]
}

/// True when the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Re-interprets mis-decoded text: the string is encoded back to single-byte
/// Latin-1 bytes and those bytes are decoded as UTF-8.
///
/// Characters above U+00FF are accepted when Windows-1252 maps them to one
/// byte, so text decoded with either code page is repaired. The input is
/// returned unchanged when any character has no single-byte form
/// or when the bytes are not valid UTF-8, so applying the repair to correct
/// text is a no-op.
pub fn repair_text(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }
    let mut bytes = Vec::with_capacity(value.len());
    for ch in value.chars() {
        match latin1_byte(ch) {
            Some(byte) => bytes.push(byte),
            None => return Cow::Borrowed(value),
        }
    }
    match UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
        Some(repaired) => Cow::Owned(repaired.into_owned()),
        None => Cow::Borrowed(value),
    }
}

fn latin1_byte(ch: char) -> Option<u8> {
    if let Ok(byte) = u8::try_from(u32::from(ch)) {
        return Some(byte);
    }
    let mut buf = [0u8; 4];
    let (bytes, _used, had_errors) = WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
    match (had_errors, bytes.as_ref()) {
        (false, [byte]) => Some(*byte),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_mojibake() {
        assert_eq!(repair_text("Ã\u{93}bito"), "Óbito");
        assert_eq!(repair_text("IndÃ\u{AD}gena"), "Indígena");
    }

    #[test]
    fn test_repair_windows_1252_mojibake() {
        // 0x93 decodes to a curly quote under Windows-1252.
        assert_eq!(repair_text("Ã“bito"), "Óbito");
    }

    #[test]
    fn test_repair_is_noop_on_correct_text() {
        assert_eq!(repair_text("Óbito com DO"), "Óbito com DO");
        assert_eq!(repair_text("Alta curado"), "Alta curado");
        assert!(matches!(repair_text("plain"), Cow::Borrowed(_)));
        // No single-byte form for these characters.
        assert_eq!(repair_text("Łódź"), "Łódź");
    }

    #[test]
    fn test_repair_is_idempotent() {
        let fixed = repair_text("PermanÃªncia").into_owned();
        assert_eq!(fixed, "Permanência");
        assert_eq!(repair_text(&fixed), fixed);
    }

    #[test]
    fn test_decode_latin1_bytes() {
        let bytes = [0x49, 0x6e, 0x64, 0xed, 0x67, 0x65, 0x6e, 0x61];
        assert_eq!(decode_single_byte(&bytes, DEFAULT_SOURCE_ENCODING), "Indígena");
    }

    #[test]
    fn test_encode_roundtrip() {
        let bytes = encode_single_byte("São Paulo", DEFAULT_SOURCE_ENCODING);
        assert_eq!(bytes.len(), 9);
        assert_eq!(decode_single_byte(&bytes, DEFAULT_SOURCE_ENCODING), "São Paulo");
    }

    #[test]
    fn test_trim_field_bytes() {
        assert_eq!(trim_field_bytes(b"ABC  \0\0"), b"ABC");
        assert_eq!(trim_field_bytes(b"  A "), b"  A");
        assert_eq!(trim_field_bytes(b"    "), b"");
    }

    #[test]
    fn test_resolve_encoding() {
        assert_eq!(resolve_encoding("latin1"), Some(WINDOWS_1252));
        assert_eq!(resolve_encoding(" UTF-8 "), Some(UTF_8));
        assert!(resolve_encoding("no-such-encoding").is_none());
    }
}
