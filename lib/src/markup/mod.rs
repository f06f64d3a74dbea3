//! The composition model: raw buffers, tags, elements, content and its
//! normalization into renderable nodes.

mod buffer;
mod escape;
mod content;
mod collection;
mod selector;
mod tag;
mod element;

pub use buffer::*;
pub use escape::*;
pub use content::*;
pub use collection::*;
pub use selector::*;
pub use tag::*;
pub use element::*;

use crate::error::Result;

/// A value that renders to an HTML fragment.
///
/// Rendering takes `&mut self` because lazily produced content is evaluated
/// and memoized on first render.
pub trait Markup {
    fn render_into(&mut self, out: &mut String) -> Result<()>;

    fn render(&mut self) -> Result<String> {
        let mut out = String::new();
        self.render_into(&mut out)?;
        Ok(out)
    }

    /// Renders `self` and freezes the output as a [`Buffer`].
    fn into_buffer(mut self) -> Result<Buffer> where Self: Sized {
        self.render().map(Buffer::from)
    }
}

/// A normalized, renderable piece of content.
#[derive(Debug)]
pub enum Node {
    /// Text, escaped when rendered.
    Text(String),
    Raw(Buffer),
    Tag(Tag),
    Element(Element),
    Collection(ContentCollection),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::Raw(_) => "raw",
            Node::Tag(_) => "tag",
            Node::Element(_) => "element",
            Node::Collection(_) => "collection",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None
        }
    }
}

impl Markup for Node {
    fn render_into(&mut self, out: &mut String) -> Result<()> {
        match self {
            Node::Text(text) => {
                out.push_str(&escape(text));
                Ok(())
            }
            Node::Raw(buffer) => buffer.render_into(out),
            Node::Tag(tag) => tag.render_into(out),
            Node::Element(element) => element.render_into(out),
            Node::Collection(collection) => collection.render_into(out),
        }
    }
}
