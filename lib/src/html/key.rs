use std::fmt;
use std::sync::Arc;

use derive_more::From;

use crate::markup::Content;

/// The key of an item passed to a list renderer: its position in a sequence
/// or its name in a map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, From)]
pub enum Key {
    Index(usize),
    Name(Arc<str>),
}

impl Key {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(name) => Some(name),
            Key::Index(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.into())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name.into())
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.as_str().into())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => i.fmt(f),
            Key::Name(name) => name.fmt(f),
        }
    }
}

impl From<Key> for Content {
    fn from(key: Key) -> Self {
        Content::Text(key.to_string())
    }
}

impl From<&Key> for Content {
    fn from(key: &Key) -> Self {
        Content::Text(key.to_string())
    }
}
