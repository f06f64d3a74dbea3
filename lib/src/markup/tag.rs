use std::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::error::Result;
use crate::markup::{escape, Markup, Selector};
use crate::util::is_attribute_name;

/// Elements that have no content and no closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Attribute name to value, in insertion order.
pub type Attributes = IndexMap<Arc<str>, AttrValue>;

/// The value of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// Not rendered at all. Setting an attribute to `Absent` removes it.
    Absent,
    /// A boolean attribute, rendered as its name only.
    Present,
    /// A value, escaped when rendered.
    Text(Arc<str>),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AttrValue::Absent)
    }
}

macro_rules! impl_from_display_for_attr {
    ($($T:ty),+) => {
        $(
            impl From<$T> for AttrValue {
                fn from(value: $T) -> Self {
                    AttrValue::Text(value.to_string().into())
                }
            }
        )+
    };
}

impl_from_display_for_attr!(&String, String, Cow<'_, str>, char);
impl_from_display_for_attr!(u8, u16, u32, u64, u128, usize);
impl_from_display_for_attr!(i8, i16, i32, i64, i128, isize);
impl_from_display_for_attr!(f32, f64);

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.into())
    }
}

impl From<Arc<str>> for AttrValue {
    fn from(value: Arc<str>) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        match value {
            true => AttrValue::Present,
            false => AttrValue::Absent,
        }
    }
}

impl From<()> for AttrValue {
    fn from(_: ()) -> Self {
        AttrValue::Present
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(T::into).unwrap_or(AttrValue::Absent)
    }
}

/// The opening and closing markup of one element, without its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: Arc<str>,
    attributes: Attributes,
    classes: IndexSet<Arc<str>>,
    render_empty: bool,
}

impl Tag {
    /// Creates a tag from a [`Selector`] string, merging `attributes`. An
    /// explicit `id` overrides the selector's; classes are merged.
    ///
    /// ```rust
    /// use tagged::{attrs, markup::Tag};
    ///
    /// let tag = Tag::new("a.nav#home", attrs! { "href" => "/?a=1&b=2", "hidden" => true }).unwrap();
    /// assert_eq!(tag.render_open(), r#"<a id="home" class="nav" href="/?a=1&amp;b=2" hidden>"#);
    /// assert_eq!(tag.render_close(), "</a>");
    /// ```
    pub fn new(spec: &str, attributes: Attributes) -> Result<Tag> {
        let selector = Selector::parse(spec)?;
        let mut tag = Tag::from(selector);
        for (name, value) in attributes {
            match (&*name, value) {
                ("class", AttrValue::Text(classes)) => { tag.add_class(&classes); },
                (name, value) => { tag.set_attribute(name, value)?; },
            }
        }

        Ok(tag)
    }

    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    /// Whether an element wrapping this tag renders when its content is
    /// empty. `false` for `?`-prefixed selectors.
    #[inline(always)]
    pub fn render_empty(&self) -> bool {
        self.render_empty
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "class" => !self.classes.is_empty(),
            _ => self.attributes.contains_key(name),
        }
    }

    /// Sets, or with [`AttrValue::Absent`] removes, an attribute. Setting
    /// `class` replaces the class list.
    pub fn set_attribute<V: Into<AttrValue>>(&mut self, name: &str, value: V) -> Result<&mut Self> {
        if !is_attribute_name(name) {
            return err!(InvalidArgument: "malformed attribute name", "tag" => self.name, "name" => name);
        }

        let value: AttrValue = value.into();
        match (name, value) {
            ("class", AttrValue::Text(classes)) => {
                self.classes.clear();
                self.add_class(&classes);
            }
            ("class", AttrValue::Present) => {},
            ("class", AttrValue::Absent) => self.classes.clear(),
            (name, AttrValue::Absent) => { self.attributes.shift_remove(name); },
            (name, value) => { self.attributes.insert(name.into(), value); },
        }

        Ok(self)
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttrValue> {
        match name {
            "class" => {
                let classes = self.class_list();
                self.classes.clear();
                classes.map(|list| AttrValue::Text(list.into()))
            }
            _ => self.attributes.shift_remove(name),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id").and_then(AttrValue::as_str)
    }

    pub fn set_id<V: Into<AttrValue>>(&mut self, id: V) -> &mut Self {
        let id: AttrValue = id.into();
        match id {
            AttrValue::Text(id) => { self.attributes.insert("id".into(), AttrValue::Text(id)); },
            _ => { self.attributes.shift_remove("id"); },
        }

        self
    }

    pub fn set_title<V: Into<AttrValue>>(&mut self, title: V) -> &mut Self {
        let title: AttrValue = title.into();
        match title {
            AttrValue::Absent => { self.attributes.shift_remove("title"); },
            title => { self.attributes.insert("title".into(), title); },
        }

        self
    }

    /// Sets a `data-{key}` attribute.
    pub fn set_data<V: Into<AttrValue>>(&mut self, key: &str, value: V) -> Result<&mut Self> {
        self.set_attribute(&format!("data-{key}"), value)
    }

    /// Adds one or more space-separated classes. Duplicates are ignored.
    pub fn add_class(&mut self, classes: &str) -> &mut Self {
        for class in classes.split_ascii_whitespace() {
            if !self.classes.contains(class) {
                self.classes.insert(class.into());
            }
        }

        self
    }

    pub fn remove_class(&mut self, classes: &str) -> &mut Self {
        for class in classes.split_ascii_whitespace() {
            self.classes.shift_remove(class);
        }

        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.iter().map(|c| &**c)
    }

    fn class_list(&self) -> Option<String> {
        if self.classes.is_empty() {
            return None;
        }

        let list = self.classes.iter().fold(String::new(), |mut list, class| {
            if !list.is_empty() {
                list.push(' ');
            }

            list.push_str(class);
            list
        });

        Some(list)
    }

    /// Renders the opening tag: `id` first, then `class`, then the rest of
    /// the attributes in insertion order. Void tags are self-closed.
    pub fn render_open(&self) -> String {
        fn push_attr(out: &mut String, name: &str, value: &AttrValue) {
            match value {
                AttrValue::Absent => {},
                AttrValue::Present => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Text(text) => {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(text));
                    out.push('"');
                }
            }
        }

        let mut out = String::with_capacity(self.name.len() + 2 + self.attributes.len() * 16);
        out.push('<');
        out.push_str(&self.name);

        if let Some(id) = self.attributes.get("id") {
            push_attr(&mut out, "id", id);
        }

        if let Some(classes) = self.class_list() {
            push_attr(&mut out, "class", &AttrValue::Text(classes.into()));
        }

        for (name, value) in self.attributes.iter().filter(|(name, _)| &***name != "id") {
            push_attr(&mut out, name, value);
        }

        match self.is_void() {
            true => out.push_str(" />"),
            false => out.push('>'),
        }

        out
    }

    /// Renders the closing tag, or nothing for void tags.
    pub fn render_close(&self) -> Cow<'static, str> {
        match self.is_void() {
            true => Cow::Borrowed(""),
            false => Cow::Owned(format!("</{}>", self.name)),
        }
    }
}

impl From<Selector> for Tag {
    fn from(selector: Selector) -> Self {
        let mut tag = Tag {
            name: selector.name.into(),
            attributes: Attributes::new(),
            classes: selector.classes.into_iter().map(Arc::from).collect(),
            render_empty: selector.render_empty,
        };

        if let Some(id) = selector.id {
            tag.set_id(id);
        }

        tag
    }
}

impl Markup for Tag {
    fn render_into(&mut self, out: &mut String) -> Result<()> {
        out.push_str(&self.render_open());
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_open())
    }
}
