/// Takes a set of sets of byte characters, return a 2^8 array with non-zero
/// values at the indices corresponding to the character byte values.
const fn char_table(sets: &[&[u8]]) -> [u8; 256] {
    let mut table = [0u8; 256];

    let mut i = 0;
    while i < sets.len() {
        let set: &[u8] = sets[i];

        let mut j = 0;
        while j < set.len() {
            let c: u8 = set[j];
            table[c as usize] = c;
            j += 1;
        }

        i += 1;
    }

    table
}

const ALPHA: &[u8] = &[
    b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L',
    b'M', b'N', b'O', b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X',
    b'Y', b'Z', b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j',
    b'k', b'l', b'm', b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v',
    b'w', b'x', b'y', b'z'
];

const DIGIT: &[u8] = &[
    b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9'
];

const TAG_NAME_CHARS: [u8; 256] = char_table(&[
    ALPHA, DIGIT, &[b'-', b':']
]);

// `.` and `#` are selector delimiters, so they can't appear in a token.
const TOKEN_CHARS: [u8; 256] = char_table(&[
    ALPHA, DIGIT, &[b'-', b'_', b':']
]);

const ATTR_NAME_CHARS: [u8; 256] = char_table(&[
    &TOKEN_CHARS, &[b'.', b'@']
]);

/// Bytes that must be replaced when escaping text or attribute values.
pub(crate) const ESCAPE_CHARS: [u8; 256] = char_table(&[
    &[b'&', b'<', b'>', b'"', b'\'']
]);

#[inline(always)]
const fn all_in(table: &[u8; 256], bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if table[bytes[i] as usize] == 0 {
            return false;
        }

        i += 1;
    }

    true
}

/// A tag name starts with a letter and continues with letters, digits, `-`
/// or `:` (custom elements and namespaced SVG names).
pub const fn is_tag_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty() && bytes[0].is_ascii_alphabetic() && all_in(&TAG_NAME_CHARS, bytes)
}

/// A class or id token from a selector.
pub const fn is_token(token: &str) -> bool {
    !token.is_empty() && all_in(&TOKEN_CHARS, token.as_bytes())
}

/// An attribute name, e.g. `href`, `data-foo`, `xlink:href` or `@click`.
pub const fn is_attribute_name(name: &str) -> bool {
    !name.is_empty() && all_in(&ATTR_NAME_CHARS, name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_char_table(table: &[u8]) {
        for (i, &v) in table.iter().enumerate() {
            if v != 0 {
                assert_eq!(i, v as usize);
            }
        }
    }

    #[test]
    fn check_tables() {
        test_char_table(&super::TAG_NAME_CHARS[..]);
        test_char_table(&super::ATTR_NAME_CHARS[..]);
        test_char_table(&super::ESCAPE_CHARS[..]);
    }

    #[test]
    fn test_names() {
        assert!(is_tag_name("span"));
        assert!(is_tag_name("h1"));
        assert!(is_tag_name("my-widget"));
        assert!(!is_tag_name("1h"));
        assert!(!is_tag_name(""));
        assert!(!is_tag_name("sp an"));
        assert!(!is_tag_name("span.list"));

        assert!(is_attribute_name("data-foo"));
        assert!(is_attribute_name("xlink:href"));
        assert!(!is_attribute_name("on\"click"));
        assert!(!is_attribute_name("a b"));
        assert!(!is_attribute_name("a=b"));
        assert!(!is_attribute_name(""));

        assert!(is_token("list_item-2"));
        assert!(!is_token("a.b"));
        assert!(!is_token("a#b"));
    }
}
