use std::str::FromStr;

use crate::error::{Error, Result};
use crate::util::{is_tag_name, is_token};

/// A parsed tag selector such as `?span.list#main`.
///
/// ```text
/// selector := "?"? name ( "." class | "#" id )*
/// ```
///
/// A leading `?` disables rendering of the element when its content is
/// empty. When several ids are given, the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub render_empty: bool,
}

impl Selector {
    /// Parses a selector.
    ///
    /// ```rust
    /// use tagged::markup::Selector;
    ///
    /// let selector = Selector::parse("?span.list.inline#x").unwrap();
    /// assert_eq!(selector.name, "span");
    /// assert_eq!(selector.id.as_deref(), Some("x"));
    /// assert_eq!(selector.classes, ["list", "inline"]);
    /// assert!(!selector.render_empty);
    ///
    /// assert!(Selector::parse("span.").is_err());
    /// ```
    pub fn parse(spec: &str) -> Result<Selector> {
        let (render_empty, rest) = match spec.strip_prefix('?') {
            Some(rest) => (false, rest),
            None => (true, spec),
        };

        let end = memchr::memchr2(b'.', b'#', rest.as_bytes()).unwrap_or(rest.len());
        let (name, mut rest) = rest.split_at(end);
        if !is_tag_name(name) {
            return err!(InvalidArgument: "malformed tag name", "selector" => spec);
        }

        let mut selector = Selector {
            name: name.to_ascii_lowercase(),
            id: None,
            classes: vec![],
            render_empty,
        };

        while let Some(sigil) = rest.as_bytes().first().copied() {
            rest = &rest[1..];
            let end = memchr::memchr2(b'.', b'#', rest.as_bytes()).unwrap_or(rest.len());
            let (token, tail) = rest.split_at(end);
            if !is_token(token) {
                return err! {
                    InvalidArgument: "malformed selector token",
                    "selector" => spec,
                    "token" => token,
                };
            }

            match sigil {
                b'.' if !selector.classes.iter().any(|c| c == token) => {
                    selector.classes.push(token.to_string());
                }
                b'.' => {},
                _ => selector.id = Some(token.to_string()),
            }

            rest = tail;
        }

        Ok(selector)
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}
