//! Display name of the connected user

/// Longest display name, in characters
pub const MAX_USERNAME_CHARS: usize = 32;

pub const GUEST: &str = "guest";

/// Make a transport-supplied user name safe to print.
///
/// ANSI CSI sequences (`ESC [ params letter`) are removed, then every other
/// control character. Spaces survive but the result is trimmed, cut to
/// [`MAX_USERNAME_CHARS`] characters and replaced by `guest` when nothing is
/// left.
pub fn sanitize_username(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            // Copy of the iterator: an unterminated sequence is not a sequence
            let mut ahead = chars.clone();
            ahead.next();
            while matches!(ahead.peek(), Some(p) if p.is_ascii_digit() || *p == ';') {
                ahead.next();
            }
            if matches!(ahead.peek(), Some(p) if p.is_ascii_alphabetic()) {
                ahead.next();
                chars = ahead;
                continue;
            }
        }
        if !c.is_control() {
            cleaned.push(c);
        }
    }

    let name: String = cleaned.trim().chars().take(MAX_USERNAME_CHARS).collect();
    let name = name.trim_end();
    if name.is_empty() {
        GUEST.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(sanitize_username("neo"), "neo");
        assert_eq!(sanitize_username("  trinity  "), "trinity");
        assert_eq!(sanitize_username("the one"), "the one");
    }

    #[test]
    fn test_strips_escape_sequences() {
        assert_eq!(sanitize_username("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(sanitize_username("\x1b[1;32mbold"), "bold");
        assert_eq!(sanitize_username("a\x1b[2Jb"), "ab");
    }

    #[test]
    fn test_drops_control_characters() {
        assert_eq!(sanitize_username("ne\to\n"), "neo");
        assert_eq!(sanitize_username("\x07beep\x00"), "beep");
        // An unterminated sequence loses only the escape itself
        assert_eq!(sanitize_username("\x1b[5~"), "[5~");
    }

    #[test]
    fn test_empty_becomes_guest() {
        assert_eq!(sanitize_username(""), "guest");
        assert_eq!(sanitize_username("   "), "guest");
        assert_eq!(sanitize_username("\x1b[0m\r\n"), "guest");
    }

    #[test]
    fn test_truncates_by_character() {
        let name = "é".repeat(40);
        let clean = sanitize_username(&name);
        assert_eq!(clean.chars().count(), 32);
        assert_eq!(clean, "é".repeat(32));
    }

    proptest! {
        #[test]
        fn prop_output_is_printable(raw in ".{0,80}") {
            let clean = sanitize_username(&raw);
            prop_assert!(!clean.is_empty());
            prop_assert!(clean.chars().count() <= MAX_USERNAME_CHARS);
            prop_assert!(!clean.chars().any(char::is_control));
            prop_assert_eq!(clean.trim(), clean.as_str());
        }
    }
}
