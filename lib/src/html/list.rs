use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::html::{Factory, Key};
use crate::markup::{Attributes, Buffer, Content, ContentCollection, Element, Markup, Selector};

/// The identity item renderer: uses each item as its own content.
///
/// ```rust
/// use tagged::{Factory, Markup, html::verbatim};
///
/// let html = Factory::new();
/// let mut list = html.u_list(["a", "b"].into_iter().enumerate(), verbatim, Default::default()).unwrap();
/// assert_eq!(list.render().unwrap(), "<ul><li>a</li><li>b</li></ul>");
/// ```
pub fn verbatim<T>(item: T, _: Option<&mut Element>, _: &Key, _: usize) -> Result<Content>
    where T: Into<Content>
{
    Ok(item.into())
}

/// Options for [`Factory::i_list()`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineList {
    /// Separates items. Defaults to the configured delimiter.
    pub delimiter: Option<String>,
    /// Separates the last two items. Defaults to `delimiter`.
    pub final_delimiter: Option<String>,
    /// Items past the limit are summarized as `… +N`.
    pub limit: Option<usize>,
}

impl InlineList {
    pub fn delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    pub fn final_delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.final_delimiter = Some(delimiter.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Lazily renders `items`, each either as a `name` element holding the
/// renderer's output or, without a `name`, as the output itself.
fn iterate<I, K, T, F, C>(
    items: I,
    name: Option<&str>,
    renderer: F,
    attributes: Attributes,
) -> Result<Content>
    where I: IntoIterator<Item = (K, T)> + 'static,
          K: Into<Key> + 'static,
          T: 'static,
          F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
          C: Into<Content> + 'static,
{
    if let Some(name) = name {
        Selector::parse(name)?;
    }

    let name = name.map(String::from);
    let renderer = Rc::new(RefCell::new(renderer));
    let stream = items.into_iter().enumerate().map(move |(i, (key, item))| -> Result<Content> {
        let (key, index) = (key.into(), i + 1);
        let Some(name) = &name else {
            let mut render = renderer.borrow_mut();
            return (&mut *render)(item, None, &key, index).map(C::into);
        };

        let renderer = renderer.clone();
        let child = Element::build(name, attributes.clone(), move |el| {
            let mut render = renderer.borrow_mut();
            (&mut *render)(item, Some(el), &key, index)
        })?;

        Ok(child.into())
    });

    Ok(Content::try_stream(stream))
}

impl Factory {
    /// A `container` element with one child per item.
    ///
    /// With a `name`, each child is a `name` element whose content is the
    /// renderer's output; the renderer is invoked when the child is
    /// rendered and receives the child as its handle. Without a `name`, the
    /// renderer's output is used directly. Keys and 1-based indices are
    /// passed along with each item.
    ///
    /// The container renders as nothing at all when its content does.
    pub fn list<I, K, T, F, C>(
        &self,
        items: I,
        container: &str,
        name: Option<&str>,
        renderer: F,
        attributes: Attributes,
    ) -> Result<Element>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        let content = iterate(items, name, renderer, Attributes::new())?;
        let mut list = Element::create(container, content, attributes)?;
        list.set_render_empty(false);
        Ok(list)
    }

    /// Like [`Factory::list()`] without a container: `attributes` go to
    /// every child. Renders right away.
    pub fn elements<I, K, T, F, C>(
        &self,
        items: I,
        name: Option<&str>,
        renderer: F,
        attributes: Attributes,
    ) -> Result<Buffer>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        ContentCollection::normalize(iterate(items, name, renderer, attributes)?)
    }

    /// Renders each item through `renderer` and concatenates the results.
    pub fn each<I, K, T, F, C>(&self, items: I, renderer: F) -> Result<Buffer>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        self.elements(items, None, renderer, Attributes::new())
    }

    /// `ul > li`. Items that render as nothing get no `li`.
    pub fn u_list<I, K, T, F, C>(&self, items: I, renderer: F, attributes: Attributes) -> Result<Element>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        self.list(items, "ul", Some("?li"), renderer, attributes)
    }

    /// `ol > li`. Items that render as nothing get no `li`.
    pub fn o_list<I, K, T, F, C>(&self, items: I, renderer: F, attributes: Attributes) -> Result<Element>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        self.list(items, "ol", Some("?li"), renderer, attributes)
    }

    /// `dl > (dt, dd)*`.
    ///
    /// The renderer receives both the `dt` and the `dd` and returns the
    /// body of the `dd`. The `dd` is rendered first, so the renderer may
    /// fill in the `dt`; a `dt` that renders as nothing is labelled with
    /// the key.
    ///
    /// ```rust
    /// use tagged::{attrs, Factory, Markup};
    ///
    /// let html = Factory::new();
    /// let mut dl = html.d_list([("a", 1), ("b", 2)], |n, _, _, _, _| Ok(n), attrs! {}).unwrap();
    /// assert_eq!(dl.render().unwrap(), "<dl><dt>a</dt><dd>1</dd><dt>b</dt><dd>2</dd></dl>");
    /// ```
    pub fn d_list<I, K, T, F, C>(&self, items: I, renderer: F, attributes: Attributes) -> Result<Element>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, &mut Element, &mut Element, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        let mut renderer = renderer;
        let stream = items.into_iter().enumerate().map(move |(i, (key, item))| -> Result<Content> {
            let key: Key = key.into();
            let mut dt = Element::new("dt", ())?;
            let mut dd = Element::new("dd", ())?;

            let body = renderer(item, &mut dt, &mut dd, &key, i + 1)?;
            let dd = dd.append(body).render()?;
            if dt.is_empty()? {
                dt.append(&key);
            }

            Ok(Content::from(vec![Content::from(dt), Content::from(Buffer::from(dd))]))
        });

        let mut list = Element::create("dl", Content::try_stream(stream), attributes)?;
        list.set_render_empty(false);
        Ok(list)
    }

    /// An inline, delimited `span.list`.
    ///
    /// Each item is rendered through a `?span` cell; cells that render as
    /// nothing are dropped and do not count toward the limit. Cells past
    /// the limit are replaced by a single `em.more` summary.
    ///
    /// ```rust
    /// use tagged::{Factory, Markup, html::{verbatim, InlineList}};
    ///
    /// let html = Factory::new();
    /// let items = ["a", "", "b", "c", "d"].into_iter().enumerate();
    /// let mut list = html.i_list(items, verbatim, InlineList::default().limit(2)).unwrap();
    /// assert_eq!(
    ///     list.render().unwrap(),
    ///     r#"<span class="list"><span>a</span>, <span>b</span><em class="more">… +2</em></span>"#
    /// );
    /// ```
    pub fn i_list<I, K, T, F, C>(&self, items: I, renderer: F, options: InlineList) -> Result<Element>
        where I: IntoIterator<Item = (K, T)> + 'static,
              K: Into<Key> + 'static,
              T: 'static,
              F: FnMut(T, Option<&mut Element>, &Key, usize) -> Result<C> + 'static,
              C: Into<Content> + 'static,
    {
        let delimiter = options.delimiter.unwrap_or_else(|| self.config().delimiter.clone());
        let final_delimiter = options.final_delimiter.unwrap_or_else(|| delimiter.clone());
        let limit = options.limit;
        let mut renderer = renderer;

        Element::build("span.list", Attributes::new(), move |el| {
            el.set_render_empty(false);

            let (mut index, mut more) = (0, 0);
            let mut cells = vec![];
            for (key, item) in items {
                let key: Key = key.into();
                index += 1;

                let mut cell = Element::new("?span", ())?;
                let body = renderer(item, Some(&mut cell), &key, index)?;
                let html = cell.append(body).render()?;
                if html.is_empty() {
                    index -= 1;
                    continue;
                }

                if limit.map_or(false, |limit| index > limit) {
                    more += 1;
                    continue;
                }

                cells.push(Buffer::from(html));
            }

            let total = cells.len();
            let mut content = Vec::with_capacity(2 * total + 1);
            for (i, cell) in cells.into_iter().enumerate() {
                match i {
                    0 => {},
                    i if i + 1 == total => content.push(Content::from(&final_delimiter)),
                    _ => content.push(Content::from(&delimiter)),
                }

                content.push(cell.into());
            }

            if more > 0 {
                content.push(Element::new("em.more", format!("… +{more}"))?.into());
            }

            Ok(content)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::attrs;
    use crate::config::Config;
    use crate::error::ErrorKind;

    #[test]
    fn test_u_list() {
        let html = Factory::new();
        let items = vec!["a", "", "<b>"].into_iter().enumerate();
        let mut ul = html.u_list(items, verbatim, attrs! { "class" => "menu" }).unwrap();
        assert_eq!(ul.render().unwrap(), r#"<ul class="menu"><li>a</li><li>&lt;b&gt;</li></ul>"#);

        let mut ul = html.u_list(Vec::<(usize, &str)>::new(), verbatim, attrs! {}).unwrap();
        assert_eq!(ul.render().unwrap(), "");
    }

    #[test]
    fn test_o_list_renderer_arguments() {
        let html = Factory::new();
        let items = vec![("x", 10), ("y", 20)];
        let mut ol = html.o_list(items, |n, li, key, i| {
            li.expect("wrapped").set_data("key", key.to_string())?;
            Ok(format!("{i}: {n}"))
        }, attrs! {}).unwrap();

        assert_eq!(
            ol.render().unwrap(),
            r#"<ol><li data-key="x">1: 10</li><li data-key="y">2: 20</li></ol>"#
        );
    }

    #[test]
    fn test_list_is_lazy() {
        let html = Factory::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut list = html.list(vec!["a", "b"].into_iter().enumerate(), "div", None, move |s, el, _, _| {
            assert!(el.is_none());
            counter.set(counter.get() + 1);
            Ok(Buffer::from(format!("<{s}/>")))
        }, attrs! { "id" => "l" }).unwrap();

        assert_eq!(calls.get(), 0);
        assert_eq!(list.render().unwrap(), r#"<div id="l"><a/><b/></div>"#);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_list_rejects_bad_child_names() {
        let html = Factory::new();
        let e = html.list(Vec::<(usize, u8)>::new(), "ul", Some("li..x"), verbatim, attrs! {}).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_renderer_errors_propagate() {
        let html = Factory::new();
        let mut ul = html.u_list(vec![(0, 1)], |_, _, _, _| -> Result<()> {
            err!(InvalidContent: "nope")
        }, attrs! {}).unwrap();

        assert_eq!(ul.render().unwrap_err().kind(), ErrorKind::InvalidContent);
    }

    #[test]
    fn test_elements_and_each() {
        let html = Factory::new();
        let items = vec![1, 2].into_iter().enumerate();
        let buffer = html.elements(items, Some("span.n"), verbatim, attrs! { "title" => "t" }).unwrap();
        assert_eq!(buffer, r#"<span class="n" title="t">1</span><span class="n" title="t">2</span>"#);

        let items = vec!["a", "b"].into_iter().enumerate();
        let buffer = html.each(items, |s, _, key, i| Ok(format!("{key}:{s}:{i};"))).unwrap();
        assert_eq!(buffer, "0:a:1;1:b:2;");

        assert_eq!(html.each(Vec::<(usize, u8)>::new(), verbatim).unwrap(), "");
    }

    #[test]
    fn test_d_list() {
        let html = Factory::new();
        let mut dl = html.d_list(vec![("a", "1"), ("b", "2")], |v, _, _, _, _| Ok(v), attrs! {}).unwrap();
        assert_eq!(dl.render().unwrap(), "<dl><dt>a</dt><dd>1</dd><dt>b</dt><dd>2</dd></dl>");

        let mut dl = html.d_list(vec![("k", "v")], |v, dt, dd, key, i| {
            dt.append(format!("{key} #{i}"));
            dd.add_class("value");
            Ok(v)
        }, attrs! {}).unwrap();
        assert_eq!(dl.render().unwrap(), r#"<dl><dt>k #1</dt><dd class="value">v</dd></dl>"#);

        let mut dl = html.d_list(vec![("k", "v")], |v, dt, _, _, _| {
            dt.append("");
            dt.append(None::<&str>);
            Ok(v)
        }, attrs! {}).unwrap();
        assert_eq!(dl.render().unwrap(), "<dl><dt>k</dt><dd>v</dd></dl>");

        let mut dl = html.d_list(Vec::<(&str, &str)>::new(), |v, _, _, _, _| Ok(v), attrs! {}).unwrap();
        assert_eq!(dl.render().unwrap(), "");
    }

    #[test]
    fn test_i_list() {
        let html = Factory::new();
        let items = vec!["a", "b", "c", "d"].into_iter().enumerate();
        let mut list = html.i_list(items, verbatim, InlineList::default().limit(2)).unwrap();
        assert_eq!(
            list.render().unwrap(),
            r#"<span class="list"><span>a</span>, <span>b</span><em class="more">… +2</em></span>"#
        );

        let items = vec![Some("a"), None, Some("b"), Some("c")].into_iter().enumerate();
        let options = InlineList::default().final_delimiter(" & ");
        let mut list = html.i_list(items, verbatim, options).unwrap();
        assert_eq!(
            list.render().unwrap(),
            r#"<span class="list"><span>a</span>, <span>b</span> &amp; <span>c</span></span>"#
        );

        let items = vec!["", ""].into_iter().enumerate();
        let mut list = html.i_list(items, verbatim, InlineList::default()).unwrap();
        assert_eq!(list.render().unwrap(), "");
    }

    #[test]
    fn test_i_list_counts_survivors_only() {
        let html = Factory::new();
        let seen = Rc::new(RefCell::new(vec![]));
        let log = seen.clone();
        let items = vec!["a", "", "b", "c"].into_iter().enumerate();
        let mut list = html.i_list(items, move |s, _, _, i| {
            log.borrow_mut().push(i);
            Ok(s)
        }, InlineList::default().limit(3)).unwrap();

        assert_eq!(
            list.render().unwrap(),
            r#"<span class="list"><span>a</span>, <span>b</span>, <span>c</span></span>"#
        );
        assert_eq!(*seen.borrow(), [1, 2, 2, 3]);
    }

    #[test]
    fn test_i_list_configured_delimiter() {
        let config = Config { delimiter: " | ".into(), ..Config::default() };
        let html = Factory::with_config(config).unwrap();
        let items = vec!["a", "b"].into_iter().enumerate();
        let mut list = html.i_list(items, verbatim, InlineList::default()).unwrap();
        assert_eq!(
            list.render().unwrap(),
            r#"<span class="list"><span>a</span> | <span>b</span></span>"#
        );
    }
}
