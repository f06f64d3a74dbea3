/// Builds an [`Attributes`](crate::markup::Attributes) map, keeping the
/// insertion order.
///
/// ```rust
/// use tagged::attrs;
///
/// let attributes = attrs! { "href" => "/", "hidden" => true, "tabindex" => 0 };
/// assert_eq!(attributes.len(), 3);
/// ```
#[doc(hidden)]
#[macro_export]
macro_rules! attrs {
    ($($key:expr => $value:expr),* $(,)?) => ({
        #[allow(unused_mut)]
        let mut map = $crate::markup::Attributes::new();
        $(map.insert(std::sync::Arc::<str>::from($key), $crate::markup::AttrValue::from($value));)*
        map
    });
}

pub use attrs;
