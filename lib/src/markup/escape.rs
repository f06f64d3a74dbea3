use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::util::ESCAPE_CHARS;

/// Escapes the HTML metacharacters `&`, `<`, `>`, `"` and `'`.
///
/// Returns the input unchanged, without allocating, when there is nothing to
/// escape.
///
/// ```rust
/// use tagged::markup::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("<a href='x'>&</a>"), "&lt;a href=&#039;x&#039;&gt;&amp;&lt;/a&gt;");
/// ```
pub fn escape(input: &str) -> Cow<'_, str> {
    let bytes = input.as_bytes();
    let Some(first) = bytes.iter().position(|&b| ESCAPE_CHARS[b as usize] != 0) else {
        return Cow::Borrowed(input);
    };

    let mut output = String::with_capacity(input.len() + 16);
    output.push_str(&input[..first]);
    for ch in input[first..].chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#039;"),
            _ => output.push(ch),
        }
    }

    Cow::Owned(output)
}

/// Escapes raw bytes as UTF-8 text.
///
/// Input that isn't valid UTF-8 is reported and returned _unescaped_ (with
/// invalid sequences replaced) rather than failing the render. Never rely on
/// this fallback where the input may be attacker controlled.
pub fn escape_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => escape(text).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, len = bytes.len(), "failed to escape non UTF-8 input");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Formats and escapes `value`.
///
/// A `Display` implementation that fails is reported and whatever it wrote
/// before failing is returned _unescaped_, as with [`escape_bytes()`].
pub fn escape_display<V: fmt::Display + ?Sized>(value: &V) -> String {
    let mut text = String::new();
    if let Err(e) = write!(text, "{value}") {
        tracing::warn!(error = %e, partial = %text, "failed to format value for escaping");
        return text;
    }

    escape(&text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert!(matches!(escape("nothing to do"), Cow::Borrowed(_)));
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape("ünï<cödé>"), "ünï&lt;cödé&gt;");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_output_has_no_metacharacters() {
        for input in ["<script>", "\"'", "&&&", "<<>>", "a'b\"c<d>e&f"] {
            let output = escape(input);
            assert!(!output.contains(['<', '>', '"', '\'']));
            assert_eq!(output.matches('&').count(), output.matches(';').count());
        }
    }

    #[test]
    fn test_escape_display() {
        struct Broken;

        impl fmt::Display for Broken {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("<partial>")?;
                Err(fmt::Error)
            }
        }

        assert_eq!(escape_display(&3.5), "3.5");
        assert_eq!(escape_display("a&b"), "a&amp;b");
        assert_eq!(escape_display(&Broken), "<partial>");
    }

    #[test]
    fn test_escape_bytes() {
        assert_eq!(escape_bytes(b"<ok>"), "&lt;ok&gt;");
        assert_eq!(escape_bytes(b"bad \xff <b>"), "bad \u{FFFD} <b>");
    }
}
