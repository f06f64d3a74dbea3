use std::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{Result, Chainable};
use crate::markup::{Buffer, ContentCollection, Element, Node, Tag};

type Stream = Box<dyn Iterator<Item = Result<Content>>>;
type Producer = Box<dyn FnOnce() -> Result<Content>>;

/// Anything that can be placed inside an element.
///
/// Content is normalized into a flat list of [`Node`]s by [`normalize()`]:
/// lists, streams and producers are expanded recursively, in order, and
/// `Empty` disappears. Text is kept verbatim and escaped only when rendered.
pub enum Content {
    Empty,
    Text(String),
    Raw(Buffer),
    Tag(Tag),
    Element(Element),
    Collection(ContentCollection),
    List(Vec<Content>),
    /// A lazy sequence, consumed once during normalization.
    Stream(Stream),
    /// A lazy value, invoked once during normalization.
    Producer(Producer),
}

impl Content {
    /// Lazily produced content from an iterator of anything convertible into
    /// `Content`. The iterator is only advanced when the content is
    /// normalized.
    pub fn stream<I>(items: I) -> Content
        where I: IntoIterator + 'static, I::Item: Into<Content>
    {
        Content::Stream(Box::new(items.into_iter().map(|item| Ok(item.into()))))
    }

    /// Like [`Content::stream()`] for fallible iterators: the first error
    /// aborts normalization.
    pub fn try_stream<I, C>(items: I) -> Content
        where I: IntoIterator<Item = Result<C>> + 'static, C: Into<Content>
    {
        Content::Stream(Box::new(items.into_iter().map(|item| item.map(C::into))))
    }

    /// Content computed on first use.
    pub fn lazy<F, C>(producer: F) -> Content
        where F: FnOnce() -> Result<C> + 'static, C: Into<Content>
    {
        Content::Producer(Box::new(move || producer().map(C::into)))
    }

    /// Converts any serializable value: `null` is empty, scalars become
    /// text, sequences and maps become lists of their (converted) values.
    ///
    /// ```rust
    /// use tagged::markup::{Content, normalize};
    ///
    /// let content = Content::from_serializable(&["a", "b"]).unwrap();
    /// assert_eq!(normalize(content).unwrap().len(), 2);
    /// ```
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Content> {
        serde_json::to_value(value)
            .map(Content::from)
            .chain_with(|| error! {
                InvalidContent: "value cannot be used as markup content",
                "type" => std::any::type_name::<T>(),
            })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::List(list) => list.iter().all(Content::is_empty),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Content::Empty => "empty",
            Content::Text(_) => "text",
            Content::Raw(_) => "raw",
            Content::Tag(_) => "tag",
            Content::Element(_) => "element",
            Content::Collection(_) => "collection",
            Content::List(_) => "list",
            Content::Stream(_) => "stream",
            Content::Producer(_) => "producer",
        }
    }

    pub(crate) fn normalize_into(self, nodes: &mut Vec<Node>) -> Result<()> {
        match self {
            Content::Empty => {},
            Content::Text(text) => nodes.push(Node::Text(text)),
            Content::Raw(buffer) => nodes.push(Node::Raw(buffer)),
            Content::Tag(tag) => nodes.push(Node::Tag(tag)),
            Content::Element(element) => nodes.push(Node::Element(element)),
            Content::Collection(collection) => nodes.push(Node::Collection(collection)),
            Content::List(list) => {
                for content in list {
                    content.normalize_into(nodes)?;
                }
            }
            Content::Stream(stream) => {
                for content in stream {
                    content?.normalize_into(nodes)?;
                }
            }
            Content::Producer(producer) => producer()?.normalize_into(nodes)?,
        }

        Ok(())
    }
}

/// Flattens `content` into the ordered list of nodes it renders as.
///
/// ```rust
/// use tagged::markup::{Content, normalize};
///
/// let nested = vec![
///     Content::from("a"),
///     Content::from(vec![Content::Empty, Content::lazy(|| Ok(vec!["b", "c"]))]),
/// ];
///
/// let nodes = normalize(nested).unwrap();
/// let text: Vec<_> = nodes.iter().filter_map(|n| n.as_text()).collect();
/// assert_eq!(text, ["a", "b", "c"]);
/// ```
pub fn normalize<C: Into<Content>>(content: C) -> Result<Vec<Node>> {
    let mut nodes = vec![];
    content.into().normalize_into(&mut nodes)?;
    Ok(nodes)
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Empty => f.write_str("Empty"),
            Content::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Content::Raw(v) => f.debug_tuple("Raw").field(v).finish(),
            Content::Tag(v) => f.debug_tuple("Tag").field(v).finish(),
            Content::Element(v) => f.debug_tuple("Element").field(v).finish(),
            Content::Collection(v) => f.debug_tuple("Collection").field(v).finish(),
            Content::List(v) => f.debug_tuple("List").field(v).finish(),
            Content::Stream(_) => f.write_str("Stream(..)"),
            Content::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Empty
    }
}

macro_rules! impl_from_display {
    ($($T:ty),+ => $E:ident::$kind:ident) => {
        $(
            impl From<$T> for $E {
                fn from(value: $T) -> Self {
                    $E::$kind(value.to_string())
                }
            }
        )+
    };
}

impl_from_display!(&str, &String, Cow<'_, str>, Arc<str>, char, bool => Content::Text);
impl_from_display!(u8, u16, u32, u64, u128, usize => Content::Text);
impl_from_display!(i8, i16, i32, i64, i128, isize => Content::Text);
impl_from_display!(f32, f64 => Content::Text);

impl From<String> for Content {
    fn from(value: String) -> Self {
        Content::Text(value)
    }
}

impl From<()> for Content {
    fn from(_: ()) -> Self {
        Content::Empty
    }
}

impl From<Buffer> for Content {
    fn from(value: Buffer) -> Self {
        Content::Raw(value)
    }
}

impl From<Tag> for Content {
    fn from(value: Tag) -> Self {
        Content::Tag(value)
    }
}

impl From<Element> for Content {
    fn from(value: Element) -> Self {
        Content::Element(value)
    }
}

impl From<ContentCollection> for Content {
    fn from(value: ContentCollection) -> Self {
        Content::Collection(value)
    }
}

impl<T: Into<Content>> From<Option<T>> for Content {
    fn from(value: Option<T>) -> Self {
        value.map(T::into).unwrap_or(Content::Empty)
    }
}

impl<T: Into<Content>> From<Vec<T>> for Content {
    fn from(value: Vec<T>) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Into<Content>, const N: usize> From<[T; N]> for Content {
    fn from(value: [T; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<T: Into<Content>> FromIterator<T> for Content {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Content::List(iter.into_iter().map(T::into).collect())
    }
}

impl From<serde_json::Value> for Content {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Content::Empty,
            Value::Bool(b) => b.into(),
            Value::Number(n) => n.to_string().into(),
            Value::String(s) => s.into(),
            Value::Array(array) => array.into_iter().collect(),
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::collections::HashMap;

    use crate::error::ErrorKind;
    use crate::markup::{Markup, Node};
    use super::*;

    fn render_nodes(nodes: Vec<Node>) -> String {
        let mut out = String::new();
        for mut node in nodes {
            node.render_into(&mut out).unwrap();
        }

        out
    }

    #[test]
    fn test_scalars_and_empty() {
        assert!(normalize(()).unwrap().is_empty());
        assert!(normalize(None::<&str>).unwrap().is_empty());
        assert_eq!(render_nodes(normalize(42).unwrap()), "42");
        assert_eq!(render_nodes(normalize(-1.5).unwrap()), "-1.5");
        assert_eq!(render_nodes(normalize(true).unwrap()), "true");
        assert_eq!(render_nodes(normalize('<').unwrap()), "&lt;");
    }

    #[test]
    fn test_text_is_escaped_at_render_time_only() {
        let nodes = normalize("<b>").unwrap();
        assert_eq!(nodes[0].as_text(), Some("<b>"));
        assert_eq!(render_nodes(nodes), "&lt;b&gt;");
    }

    #[test]
    fn test_flattening_is_depth_independent() {
        let nested = || Content::from(vec![
            Content::from("a"),
            Content::from(vec![
                Content::from(vec![Content::from("b"), Content::Empty]),
                Content::lazy(|| Ok(Content::stream(vec![
                    Content::from("c"),
                    Content::lazy(|| Ok(vec!["d"])),
                ]))),
            ]),
            Content::stream(std::iter::once(Buffer::new("<e/>"))),
        ]);

        let flat = || Content::from(vec![
            Content::from("a"),
            Content::from("b"),
            Content::from("c"),
            Content::from("d"),
            Content::from(Buffer::new("<e/>")),
        ]);

        let nested_nodes = normalize(nested()).unwrap();
        let flat_nodes = normalize(flat()).unwrap();
        let kinds = |nodes: &[Node]| nodes.iter().map(Node::kind).collect::<Vec<_>>();
        assert_eq!(kinds(&nested_nodes), kinds(&flat_nodes));
        assert_eq!(render_nodes(nested_nodes), render_nodes(flat_nodes));
    }

    #[test]
    fn test_producer_runs_once_and_lazily() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let content = Content::lazy(move || {
            counter.set(counter.get() + 1);
            Ok("x")
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(normalize(content).unwrap().len(), 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stream_errors_propagate() {
        let content = Content::try_stream(vec![
            Ok("fine"),
            Err(error!(InvalidContent: "broken item")),
            Ok("never reached"),
        ]);

        let e = normalize(content).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn test_from_serializable() {
        #[derive(Serialize)]
        struct Post { title: &'static str, draft: bool, tags: Vec<&'static str> }

        let post = Post { title: "Hi & bye", draft: false, tags: vec!["a", "b"] };
        let nodes = normalize(Content::from_serializable(&post).unwrap()).unwrap();
        assert_eq!(render_nodes(nodes), "Hi &amp; byefalseab");

        let unit = Content::from_serializable(&()).unwrap();
        assert!(unit.is_empty());

        let mut bad = HashMap::new();
        bad.insert((1, 2), "tuple keys can't be represented");
        let e = Content::from_serializable(&bad).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidContent);
    }
}
