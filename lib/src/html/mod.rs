//! The [`Factory`] façade and the list helpers built on top of it.

mod key;
mod list;

pub use key::*;
pub use list::*;

use std::fmt;

use crate::attrs;
use crate::config::Config;
use crate::error::Result;
use crate::markup::{self, Attributes, AttrValue, Buffer, Content, ContentCollection, Element, Tag};
use crate::plugins::{Plugin, PluginCache, PluginName, Time};

/// Constructs markup.
///
/// A factory owns its [`Config`] and a cache of the plugins it has handed
/// out. It holds no other state: everything it builds is independent of it.
///
/// ```rust
/// use tagged::{attrs, Factory, Markup};
///
/// let html = Factory::new();
/// let mut el = html.el_with("span.list#x", "hi", attrs! { "data-foo" => true }).unwrap();
/// assert_eq!(el.render().unwrap(), r#"<span id="x" class="list" data-foo>hi</span>"#);
/// ```
#[derive(Default)]
pub struct Factory {
    config: Config,
    plugins: PluginCache,
}

impl Factory {
    pub fn new() -> Self {
        Factory::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.zone()?;
        Ok(Factory { config, plugins: PluginCache::default() })
    }

    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A standalone tag.
    pub fn tag(&self, spec: &str, attributes: Attributes) -> Result<Tag> {
        Tag::new(spec, attributes)
    }

    /// An element with no attributes besides those in `spec`.
    pub fn el<C: Into<Content>>(&self, spec: &str, content: C) -> Result<Element> {
        Element::new(spec, content)
    }

    pub fn el_with<C>(&self, spec: &str, content: C, attributes: Attributes) -> Result<Element>
        where C: Into<Content>
    {
        Element::create(spec, content, attributes)
    }

    /// Marks `html` as safe: it is never escaped.
    pub fn raw<S: Into<Buffer>>(&self, html: S) -> Buffer {
        html.into()
    }

    /// Normalizes and renders `content` right away.
    pub fn wrap<C: Into<Content>>(&self, content: C) -> Result<Buffer> {
        ContentCollection::normalize(content)
    }

    /// Collects `content` without rendering it.
    pub fn content<C: Into<Content>>(&self, content: C) -> ContentCollection {
        ContentCollection::new(content)
    }

    /// An `img` element. A `None` alt text is written as a bare `alt`;
    /// `width` and `height` are omitted when they convert to
    /// [`AttrValue::Absent`].
    ///
    /// ```rust
    /// use tagged::{Factory, Markup};
    ///
    /// let html = Factory::new();
    /// let mut img = html.image("/cat.png", Some("A cat"), 120, None::<u32>).unwrap();
    /// assert_eq!(img.render().unwrap(), r#"<img src="/cat.png" alt="A cat" width="120" />"#);
    /// ```
    pub fn image<U, W, H>(&self, url: U, alt: Option<&str>, width: W, height: H) -> Result<Element>
        where U: Into<AttrValue>, W: Into<AttrValue>, H: Into<AttrValue>
    {
        let src: AttrValue = url.into();
        let alt = alt.map_or(AttrValue::Present, AttrValue::from);
        let mut img = Element::create("img", (), attrs! { "src" => src, "alt" => alt })?;
        img.set_attribute("width", width)?;
        img.set_attribute("height", height)?;
        Ok(img)
    }

    /// Escapes the display form of `value`. `None` stays `None`.
    ///
    /// A value whose `Display` implementation fails is logged and returned
    /// unescaped. Never rely on this in security-sensitive contexts.
    pub fn esc<V: fmt::Display>(&self, value: Option<V>) -> Option<String> {
        value.map(|v| markup::escape_display(&v))
    }

    /// Resolves a plugin by name. Instances are created on first use and
    /// cached in the factory.
    ///
    /// ```rust
    /// use tagged::Factory;
    ///
    /// let html = Factory::new();
    /// assert!(html.plugin("time").is_ok());
    /// assert!(html.plugin("icon").is_err());
    /// ```
    pub fn plugin(&self, name: &str) -> Result<Plugin<'_>> {
        self.plugins.get(name.parse::<PluginName>()?, &self.config)
    }

    /// The date and time formatter.
    pub fn time(&self) -> Result<&Time> {
        self.plugins.time(&self.config)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("config", &self.config)
            .field("plugins", &self.plugins)
            .finish()
    }
}
