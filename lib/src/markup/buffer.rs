use std::fmt;
use std::sync::Arc;

use derive_more::Deref;

use crate::error::Result;
use crate::markup::Markup;

/// A string of markup that is already safe to emit. Never escaped again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deref)]
#[deref(forward)]
pub struct Buffer(Arc<str>);

impl Buffer {
    #[inline(always)]
    pub fn new<S: Into<Arc<str>>>(html: S) -> Self {
        Buffer(html.into())
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> Arc<str> {
        self.0
    }
}

impl Markup for Buffer {
    #[inline]
    fn render_into(&mut self, out: &mut String) -> Result<()> {
        out.push_str(&self.0);
        Ok(())
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Buffer {
    fn from(value: String) -> Self {
        Buffer(value.into())
    }
}

impl From<&str> for Buffer {
    fn from(value: &str) -> Self {
        Buffer(value.into())
    }
}

impl From<Arc<str>> for Buffer {
    fn from(value: Arc<str>) -> Self {
        Buffer(value)
    }
}

impl PartialEq<str> for Buffer {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Buffer {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
