/// Characters the index query language reads as operators or delimiters.
pub const RESERVED: &[char] = &[
    '+', '-', '=', '&', '|', '>', '<', ';', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*',
    '?', ':', '\\', '/',
];

pub fn is_reserved(c: char) -> bool {
    RESERVED.contains(&c)
}

/// Backslash-escape every reserved character so the text is read as plain
/// terms. All other characters, and their order, are kept verbatim.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    for c in raw.chars() {
        if is_reserved(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Undo [`sanitize`], asserting every backslash introduces exactly one
    /// reserved character and no reserved character appears bare.
    fn unescape_strict(escaped: &str) -> String {
        let mut out = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let next = chars.next().expect("dangling backslash");
                assert!(is_reserved(next), "escaped non-reserved {:?}", next);
                out.push(next);
            } else {
                assert!(!is_reserved(c), "bare reserved {:?}", c);
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_escapes_query_operators() {
        assert_eq!(sanitize("Copyright (c)"), r"Copyright \(c\)");
        assert_eq!(sanitize("MIT|Apache-2.0"), r"MIT\|Apache\-2.0");
        assert_eq!(sanitize(r"a\b"), r"a\\b");
        assert_eq!(sanitize("http://x"), r"http\:\/\/x");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Permission is hereby granted, free of charge.\n\tDone";
        assert_eq!(sanitize(text), text);
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_multibyte_text_preserved() {
        assert_eq!(sanitize("Lizenz (ä) ©"), r"Lizenz \(ä\) ©");
    }

    proptest! {
        #[test]
        fn prop_each_reserved_char_gets_one_backslash(raw in any::<String>()) {
            let escaped = sanitize(&raw);
            prop_assert_eq!(unescape_strict(&escaped), raw);
        }

        #[test]
        fn prop_escaping_only_adds_backslashes(raw in "[ -~]{0,64}") {
            let escaped = sanitize(&raw);
            let reserved = raw.chars().filter(|c| is_reserved(*c)).count();
            prop_assert_eq!(escaped.len(), raw.len() + reserved);
        }
    }
}
