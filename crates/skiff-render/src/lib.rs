//! Native-side view tree engine for a script-driven widget toolkit.
//!
//! An upstream layout/script layer produces ordered batches of tree-edit
//! commands ([`Mutation`]); the [`ViewManager`] applies them against a
//! registry of live view objects, resolving each view type to a built-in,
//! host-registered, or cross-boundary implementation.

pub mod bridge;
pub mod context;
pub mod error;
pub mod tree;
pub mod value;
pub mod view;
pub mod wire;

pub use bridge::{ForeignDelegate, NativeHandle, SurfaceBinder, SurfaceHandle};
pub use context::RenderContext;
pub use error::{RenderError, Result};
pub use tree::{
    EndBatchCallback, Mutation, MutationQueue, MoveEntry, Padding, Rect, Tag, ViewManager,
    ViewRegistry,
};
pub use value::{PropKey, PropMap, PropValue};
pub use view::{MethodCallback, RenderView, ViewCreator, ViewCreators};
