use crate::error::{Error, Result};
use crate::markup::{Buffer, Content, Markup, Node};

/// An ordered sequence of content rendered as the concatenation of its
/// parts, with no wrapping tag.
///
/// Content is pushed as-is and normalized on first render or inspection.
/// Content pushed afterwards is normalized on the next one. A failed
/// normalization is final: every later inspection returns the same error.
#[derive(Debug, Default)]
pub struct ContentCollection {
    pending: Vec<Content>,
    nodes: Vec<Node>,
    failure: Option<Error>,
}

impl ContentCollection {
    pub fn new<C: Into<Content>>(content: C) -> Self {
        let mut collection = ContentCollection::default();
        collection.push(content);
        collection
    }

    /// Normalizes and renders `content` immediately.
    ///
    /// ```rust
    /// use tagged::markup::ContentCollection;
    ///
    /// let html = ContentCollection::normalize(vec!["<", ">"]).unwrap();
    /// assert_eq!(html, "&lt;&gt;");
    /// ```
    pub fn normalize<C: Into<Content>>(content: C) -> Result<Buffer> {
        ContentCollection::new(content).into_buffer()
    }

    pub fn push<C: Into<Content>>(&mut self, content: C) -> &mut Self {
        let content = content.into();
        if !matches!(content, Content::Empty) {
            self.pending.push(content);
        }

        self
    }

    pub(crate) fn prepend(&mut self, content: Content) {
        if !matches!(content, Content::Empty) {
            self.pending.insert(0, content);
        }
    }

    pub(crate) fn fail(&mut self, error: Error) {
        self.pending.clear();
        self.failure = Some(error);
    }

    /// Normalizes any pending content and returns the resulting nodes.
    pub fn nodes(&mut self) -> Result<&mut [Node]> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }

        for content in std::mem::take(&mut self.pending) {
            if let Err(e) = content.normalize_into(&mut self.nodes) {
                self.fail(e.clone());
                return Err(e);
            }
        }

        Ok(&mut self.nodes)
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.nodes()?.is_empty())
    }

    pub fn len(&mut self) -> Result<usize> {
        Ok(self.nodes()?.len())
    }
}

impl Markup for ContentCollection {
    fn render_into(&mut self, out: &mut String) -> Result<()> {
        for node in self.nodes()? {
            node.render_into(out)?;
        }

        Ok(())
    }
}

impl<C: Into<Content>> FromIterator<C> for ContentCollection {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut collection = ContentCollection::default();
        for content in iter {
            collection.push(content);
        }

        collection
    }
}
