mod manager;
mod mutation;
mod node;
mod registry;

pub use manager::{EndBatchCallback, ViewManager};
pub use mutation::{Mutation, MutationQueue, MoveEntry, Padding, Rect};
pub use node::{ForeignState, Tag, ViewBackend, ViewNode};
pub use registry::ViewRegistry;
