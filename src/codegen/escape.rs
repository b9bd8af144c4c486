/// Escapes `bytes` for an LLVM `c"..."` constant. Printable ASCII passes
/// through except `\` and `"`; every other byte becomes `\XX`.
pub fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\\' | b'"' => out.push_str(&hex(byte)),
            32..=126 => out.push(byte as char),
            _ => out.push_str(&hex(byte)),
        }
    }
    out
}

fn hex(byte: u8) -> String {
    format!("\\{:02X}", byte)
}

/// Inverse of [`escape`]. `None` if a `\` is not followed by two hex digits.
pub fn unescape(escaped: &str) -> Option<Vec<u8>> {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            let digits = escaped.get(i + 1..i + 3)?;
            if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(digits, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Some(out)
}
