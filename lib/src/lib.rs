#![doc = svgbobdoc::transform!(
//! Programmatic HTML markup construction.
//!
//! # Overview
//!
//! Tagged builds HTML fragments out of tags, elements and arbitrary,
//! possibly lazy, content, and renders them to strings. Text is escaped when
//! rendered, never before, so nested markup is escaped exactly once.
//!
//! Content is organized as follows:
//!
//! ```svgbob
//!                         +---------+
//!                         | Element |
//!                         +----+----+
//!                              |
//!              +---------------+----------------+
//!              |                                |
//!          +---+---+                   +--------+---------+
//!          |  Tag  |                   | ContentCollection|
//!          +-------+                   +--------+---------+
//!                                               |
//!       +-----------+-----------+---------------+------------+
//!       |           |           |               |            |
//!   +---+---+   +---+----+  +---+---+     +-----+-----+  +---+---+
//!   | Text  |   | Buffer |  |  Tag  |     | Element.. |  |  ...  |
//!   +-------+   +--------+  +-------+     +-----------+  +-------+
//! ```
//!
//! In words:
//!
//!   * A **tag** is a name, an ordered set of attributes and a set of
//!     classes. Tags are created from selectors like `?span.list#main`.
//!
//!   * An **element** is a tag plus content. Content is anything convertible
//!     into [`Content`](markup::Content): text, numbers, [`Buffer`]s of
//!     already-safe HTML, tags, other elements, lists, iterators and
//!     closures. It is normalized into a flat list of nodes when the element
//!     is first rendered or inspected.
//!
//!   * A **buffer** is rendered HTML. It is never escaped again.
//!
//! ## Rendering
//!
//! Every markup value implements [`Markup`]. Rendering walks the node tree
//! depth first: text is escaped, buffers are copied as-is, and elements
//! render their open tag, children and close tag. An element whose content
//! renders as nothing and that does not render when empty disappears, tags
//! included.
//!
//! The [`Factory`] is the entry point for most uses. It builds elements,
//! lists of all kinds and images, escapes values and hands out plugins such
//! as the [`Time`](plugins::Time) formatter.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod markup;
pub mod html;
pub mod plugins;
pub mod config;

pub use error::{Error, Result};
pub use config::Config;
pub use html::Factory;
pub use markup::{Buffer, Content, ContentCollection, Element, Markup, Tag};
