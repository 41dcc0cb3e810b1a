//! Control character stripping for decoded token payloads.

/// Removes every ASCII control character (0x00-0x1F and 0x7F).
///
/// Decoded tokens carry their block padding as trailing control bytes, and a
/// hostile payload could smuggle CR/LF into headers or markup. Both are
/// dropped here; all other characters pass through untouched.
pub fn strip_control_chars(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(*c, '\u{00}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_embedded_controls() {
        assert_eq!(strip_control_chars("http://x\x00y\x1Fz"), "http://xyz");
    }

    #[test]
    fn test_strips_delete_and_newlines() {
        assert_eq!(
            strip_control_chars("https://a.b/c\r\nX-Injected: 1\x7F"),
            "https://a.b/cX-Injected: 1"
        );
    }

    #[test]
    fn test_keeps_non_ascii() {
        assert_eq!(strip_control_chars("https://exämple.org/ü"), "https://exämple.org/ü");
    }

    #[test]
    fn test_strips_block_padding() {
        let padded = format!("https://cdn.test/a.png{}", "\x0a".repeat(10));
        assert_eq!(strip_control_chars(&padded), "https://cdn.test/a.png");
    }
}
