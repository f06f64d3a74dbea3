mod macros;
mod validate;

pub use macros::*;
pub use validate::*;
