const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Quotes nothing, escapes everything outside printable ASCII, plus `"` and `\`, as `\xx`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'"' | b'\\' => push_hex(&mut out, byte),
            0x20..=0x7E => out.push(char::from(byte)),
            _ => push_hex(&mut out, byte),
        }
    }
    out
}

pub fn escape_str(s: &str) -> String {
    escape_bytes(s.as_bytes())
}

fn push_hex(out: &mut String, byte: u8) {
    out.push('\\');
    out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
    out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0F)]));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_backslashes_and_non_printables() {
        assert_eq!(escape_str("plain text_1"), "plain text_1");
        assert_eq!(escape_str("a\"b\\c"), "a\\22b\\5cc");
        assert_eq!(escape_bytes(&[0x00, b'\n', 0x7F, 0xFF]), "\\00\\0a\\7f\\ff");
        assert_eq!(escape_str("é"), "\\c3\\a9");
    }
}
