use crate::tree::Tag;
use thiserror::Error;

/// Failures contained inside the batch applier. None of these escape
/// `flush_batch`; the manager logs and skips the offending mutation.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Tag or parent tag not found in the registry. Expected during normal
    /// operation (late updates racing a delete), never fatal.
    #[error("view {0:?} not in registry")]
    LookupMiss(Tag),

    /// No factory tier matched the view type.
    #[error("no view factory for type \"{0}\"")]
    UnresolvedViewType(String),

    /// The cross-boundary delegate returned no handle or refused the call.
    #[error("boundary call failed for view {tag:?} (\"{view_type}\")")]
    BoundaryCallFailure { tag: Tag, view_type: String },

    /// Duplicate tag insertion or a structural operation that would corrupt
    /// the tree. The registry is left unchanged.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
