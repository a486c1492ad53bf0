pub mod builtin;
pub mod creators;
#[cfg(test)]
pub mod test_utils;
pub mod traits;

pub use builtin::{BuiltinView, EMBEDDED_WEB_VIEW_TYPE, ROOT_VIEW_TYPE};
pub use creators::{ViewCreator, ViewCreators};
pub use traits::{MethodCallback, RenderView};
