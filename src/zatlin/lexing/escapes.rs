//! Quote literal body decoding.
//!
//! Supported escapes are `\"`, `\\` and `\uXXXX` (exactly four hex digits, one UTF-16 code unit).
//! The body is decoded into UTF-16 code units so that consecutive `\u` escapes forming a
//! surrogate pair combine into one character. An unpaired surrogate becomes U+FFFD.

/// An invalid escape found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the backslash within the decoded body.
    pub offset: usize,
    /// The part of the escape that was read: `\` or `\u` plus the hex digits seen so far.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub value: String,
    pub errors: Vec<EscapeError>,
}

impl Decoded {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode a literal body (the text between the quotes).
///
/// Decoding never stops at an error, so every bad escape in the body is reported.
pub fn decode(body: &str) -> Decoded {
    let mut units: Vec<u16> = Vec::with_capacity(body.len());
    let mut errors = Vec::new();
    let mut chars = body.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u16; 2];
            units.extend_from_slice(ch.encode_utf16(&mut buf));
            continue;
        }

        match chars.peek().map(|&(_, c)| c) {
            Some(c @ ('"' | '\\')) => {
                chars.next();
                units.push(c as u16);
            }
            Some('u') => {
                chars.next();
                let mut digits = String::with_capacity(4);
                let mut unit: u16 = 0;
                while digits.len() < 4 {
                    let Some(&(_, c)) = chars.peek() else { break };
                    let Some(digit) = c.to_digit(16) else { break };
                    digits.push(c);
                    unit = unit * 16 + digit as u16;
                    chars.next();
                }
                if digits.len() == 4 {
                    units.push(unit);
                } else {
                    errors.push(EscapeError {
                        offset,
                        text: format!("\\u{}", digits),
                    });
                }
            }
            _ => errors.push(EscapeError {
                offset,
                text: "\\".to_string(),
            }),
        }
    }

    Decoded {
        value: String::from_utf16_lossy(&units),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_body() {
        let decoded = decode("abc é");
        assert!(decoded.is_valid());
        assert_eq!(decoded.value, "abc é");
    }

    #[test]
    fn test_simple_escapes() {
        let decoded = decode(r#"a\"b\\c"#);
        assert!(decoded.is_valid());
        assert_eq!(decoded.value, r#"a"b\c"#);
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(decode(r"\u0041").value, "A");
        assert_eq!(decode(r"\u00e9x").value, "éx");
    }

    #[test]
    fn test_surrogate_pair_combines() {
        assert_eq!(decode(r"\uD83D\uDE00").value, "😀");
        assert_eq!(decode(r"\uD83D").value, "\u{FFFD}");
    }

    #[test]
    fn test_short_unicode_escape() {
        let decoded = decode(r"x\u12g");
        assert_eq!(
            decoded.errors,
            vec![EscapeError {
                offset: 1,
                text: r"\u12".to_string(),
            }]
        );
        // the non-hex character is still part of the value
        assert_eq!(decoded.value, "xg");
    }

    #[test]
    fn test_every_error_is_reported() {
        let decoded = decode(r"\n ok \t \");
        let offsets: Vec<usize> = decoded.errors.iter().map(|e| e.offset).collect();
        assert_eq!(offsets, vec![0, 6, 9]);
        assert!(decoded.errors.iter().all(|e| e.text == "\\"));
    }
}
