use std::fmt;

use crate::error::{Result, Chainable};
use crate::markup::{Attributes, AttrValue, Content, ContentCollection, Markup, Node, Tag};

type Producer = Box<dyn FnOnce(&mut Element) -> Result<Content>>;

/// A [`Tag`] with content.
///
/// Content is normalized lazily, on first render or first call to
/// [`Element::is_empty()`] or [`Element::children()`]. An element built with
/// a producer runs it exactly once, at that point, with the element itself
/// as argument so the producer can adjust attributes or the render-empty
/// policy before the element is rendered.
///
/// ```rust
/// use tagged::{attrs, markup::{Element, Markup}};
///
/// let mut el = Element::create("span.list#x", "hi", attrs! { "data-foo" => true }).unwrap();
/// assert_eq!(el.render().unwrap(), r#"<span id="x" class="list" data-foo>hi</span>"#);
/// ```
pub struct Element {
    tag: Tag,
    producer: Option<Producer>,
    body: ContentCollection,
    render_empty: bool,
}

impl Element {
    pub fn new<C: Into<Content>>(spec: &str, content: C) -> Result<Element> {
        Element::create(spec, content, Attributes::new())
    }

    pub fn create<C>(spec: &str, content: C, attributes: Attributes) -> Result<Element>
        where C: Into<Content>
    {
        Ok(Element::from_tag(Tag::new(spec, attributes)?, content))
    }

    /// Creates an element whose content is computed by `producer` when the
    /// element is first rendered or inspected.
    ///
    /// ```rust
    /// use tagged::{attrs, markup::{Element, Markup}};
    ///
    /// let mut el = Element::build("p", attrs! {}, |el| {
    ///     el.add_class("lead");
    ///     Ok("produced")
    /// }).unwrap();
    ///
    /// assert_eq!(el.render().unwrap(), r#"<p class="lead">produced</p>"#);
    /// ```
    pub fn build<F, C>(spec: &str, attributes: Attributes, producer: F) -> Result<Element>
        where F: FnOnce(&mut Element) -> Result<C> + 'static, C: Into<Content>
    {
        let mut element = Element::from_tag(Tag::new(spec, attributes)?, Content::Empty);
        element.producer = Some(Box::new(move |el| producer(el).map(C::into)));
        Ok(element)
    }

    pub fn from_tag<C: Into<Content>>(tag: Tag, content: C) -> Element {
        Element {
            render_empty: tag.render_empty(),
            producer: None,
            body: ContentCollection::new(content),
            tag,
        }
    }

    #[inline(always)]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[inline(always)]
    pub fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        self.tag.name()
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.tag.attribute(name)
    }

    pub fn set_attribute<V: Into<AttrValue>>(&mut self, name: &str, value: V) -> Result<&mut Self> {
        self.tag.set_attribute(name, value)?;
        Ok(self)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        self.tag.remove_attribute(name)
    }

    pub fn set_id<V: Into<AttrValue>>(&mut self, id: V) -> &mut Self {
        self.tag.set_id(id);
        self
    }

    pub fn set_title<V: Into<AttrValue>>(&mut self, title: V) -> &mut Self {
        self.tag.set_title(title);
        self
    }

    pub fn set_data<V: Into<AttrValue>>(&mut self, key: &str, value: V) -> Result<&mut Self> {
        self.tag.set_data(key, value)?;
        Ok(self)
    }

    pub fn add_class(&mut self, classes: &str) -> &mut Self {
        self.tag.add_class(classes);
        self
    }

    pub fn remove_class(&mut self, classes: &str) -> &mut Self {
        self.tag.remove_class(classes);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.tag.has_class(class)
    }

    #[inline(always)]
    pub fn render_empty(&self) -> bool {
        self.render_empty
    }

    /// When `false`, the element renders as nothing at all (no tags either)
    /// if its content renders as an empty string.
    pub fn set_render_empty(&mut self, render_empty: bool) -> &mut Self {
        self.render_empty = render_empty;
        self
    }

    /// Appends content after any existing or produced content.
    pub fn append<C: Into<Content>>(&mut self, content: C) -> &mut Self {
        self.body.push(content);
        self
    }

    /// Runs the producer, if any, and returns the normalized content.
    ///
    /// A producer or normalization failure is remembered and returned again
    /// on every later call.
    pub fn children(&mut self) -> Result<&mut [Node]> {
        if let Some(producer) = self.producer.take() {
            tracing::trace!(tag = self.tag.name(), "producing element content");
            let produced = producer(self).chain_with(|| error! {
                "failed to produce element content",
                "tag" => self.tag.name(),
            });

            match produced {
                Ok(content) => self.body.prepend(content),
                Err(e) => {
                    self.body.fail(e.clone());
                    return Err(e);
                }
            }
        }

        self.body.nodes()
    }

    /// Whether the content renders as nothing. This is the same test that
    /// suppresses elements that do not render when empty.
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.render_body()?.is_empty())
    }

    fn render_body(&mut self) -> Result<String> {
        let mut body = String::new();
        for node in self.children()? {
            node.render_into(&mut body)?;
        }

        Ok(body)
    }
}

impl Markup for Element {
    fn render_into(&mut self, out: &mut String) -> Result<()> {
        if self.tag.is_void() {
            out.push_str(&self.tag.render_open());
            return Ok(());
        }

        let body = self.render_body()?;
        if body.is_empty() && !self.render_empty {
            return Ok(());
        }

        out.reserve(body.len() + 2 * self.tag.name().len() + 5);
        out.push_str(&self.tag.render_open());
        out.push_str(&body);
        out.push_str(&self.tag.render_close());
        Ok(())
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("producer", &self.producer.as_ref().map(|_| ".."))
            .field("body", &self.body)
            .field("render_empty", &self.render_empty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::attrs;
    use crate::error::ErrorKind;
    use crate::markup::{Buffer, VOID_ELEMENTS};

    #[test]
    fn test_scenario() {
        let mut el = Element::create("span.list#x", "hi", attrs! { "data-foo" => true }).unwrap();
        assert_eq!(el.render().unwrap(), r#"<span id="x" class="list" data-foo>hi</span>"#);
    }

    #[test]
    fn test_text_is_escaped_once_per_leaf() {
        let inner = Element::new("b", "<&>").unwrap();
        let mut outer = Element::new("div", vec![
            Content::from("1 < 2 "),
            Content::from(inner),
            Content::from(Buffer::new("<i>&amp;</i>")),
        ]).unwrap();

        assert_eq!(
            outer.render().unwrap(),
            "<div>1 &lt; 2 <b>&lt;&amp;&gt;</b><i>&amp;</i></div>"
        );
    }

    #[test]
    fn test_text_never_leaks_metacharacters() {
        for text in ["<script>alert('x')</script>", "\"quoted\"", "a & b", "'"] {
            let html = Element::new("div", text).unwrap().render().unwrap();
            let body = &html["<div>".len()..html.len() - "</div>".len()];
            assert!(!body.contains(['<', '>', '"', '\'']), "{body}");
        }
    }

    #[test]
    fn test_empty_suppression() {
        for name in ["div", "span", "li", "p", "my-widget"] {
            let mut el = Element::new(name, Content::List(vec![])).unwrap();
            el.set_render_empty(false);
            assert_eq!(el.render().unwrap(), "");

            let mut el = Element::new(&format!("?{name}"), ()).unwrap();
            assert_eq!(el.render().unwrap(), "");

            let mut el = Element::new(name, ()).unwrap();
            assert_eq!(el.render().unwrap(), format!("<{name}></{name}>"));
        }
    }

    #[test]
    fn test_empty_suppression_uses_rendered_body() {
        let mut el = Element::new("?li", vec![Element::new("?em", "").unwrap()]).unwrap();
        assert_eq!(el.children().unwrap().len(), 1);
        assert!(el.is_empty().unwrap());
        assert_eq!(el.render().unwrap(), "");

        let mut el = Element::new("li", "").unwrap();
        assert!(el.is_empty().unwrap());
        assert_eq!(el.render().unwrap(), "<li></li>");
    }

    #[test]
    fn test_void_elements_ignore_content() {
        for name in VOID_ELEMENTS {
            let mut el = Element::new(name, "ignored").unwrap();
            assert_eq!(el.render().unwrap(), format!("<{name} />"));
        }

        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let mut el = Element::build("br", attrs! {}, move |_| {
            flag.set(true);
            Ok("ignored")
        }).unwrap();

        assert_eq!(el.render().unwrap(), "<br />");
        assert!(!ran.get());
    }

    #[test]
    fn test_producer_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut el = Element::build("ul", attrs! {}, move |el| {
            counter.set(counter.get() + 1);
            el.set_attribute("role", "list")?;
            Ok(Content::stream(vec!["a", "b"]))
        }).unwrap();

        assert_eq!(calls.get(), 0);
        assert!(!el.is_empty().unwrap());
        assert_eq!(el.render().unwrap(), r#"<ul role="list">ab</ul>"#);
        assert_eq!(el.render().unwrap(), r#"<ul role="list">ab</ul>"#);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_producer_can_disable_empty_rendering() {
        let mut el = Element::build("span", attrs! {}, |el| {
            el.set_render_empty(false);
            Ok(())
        }).unwrap();

        assert!(el.render_empty());
        assert_eq!(el.render().unwrap(), "");
        assert!(!el.render_empty());
    }

    #[test]
    fn test_append_after_produced_content() {
        let mut el = Element::build("dt", attrs! {}, |_| Ok("first")).unwrap();
        el.append(", second");
        assert_eq!(el.render().unwrap(), "<dt>first, second</dt>");

        let mut el = Element::new("dt", ()).unwrap();
        assert!(el.is_empty().unwrap());
        el.append("key");
        assert!(!el.is_empty().unwrap());
        assert_eq!(el.render().unwrap(), "<dt>key</dt>");
    }

    #[test]
    fn test_errors_propagate() {
        assert_eq!(Element::new("bad name", "x").unwrap_err().kind(), ErrorKind::InvalidArgument);

        let mut el = Element::build("div", attrs! {}, |_| -> Result<&str> {
            err!(InvalidContent: "cannot use value")
        }).unwrap();

        let e = el.render().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidContent);
        assert!(e.to_string().contains("tag: div"));
    }

    #[test]
    fn test_failures_are_remembered() {
        let mut el = Element::build("div", attrs! {}, |_| -> Result<&str> {
            err!(InvalidContent: "cannot use value")
        }).unwrap();

        for _ in 0..2 {
            assert_eq!(el.render().unwrap_err().kind(), ErrorKind::InvalidContent);
        }

        assert!(el.is_empty().is_err());

        let items = vec![Ok("a"), err!(InvalidContent: "unusable item"), Ok("c")];
        let mut el = Element::new("ul", Content::try_stream(items)).unwrap();
        for _ in 0..2 {
            assert_eq!(el.render().unwrap_err().kind(), ErrorKind::InvalidContent);
        }
    }
}
