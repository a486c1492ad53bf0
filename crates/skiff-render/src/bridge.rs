use crate::tree::{Rect, Tag};
use crate::value::PropKey;

/// Opaque handle to a platform widget object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Opaque handle to a platform surface slot (where a root view attaches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Synchronous capability into the script runtime, injected at manager
/// construction. Calls block until the far side answers; the engine never
/// issues two concurrently from one batch application pass.
///
/// Prop buffers are encoded with [`crate::wire`].
pub trait ForeignDelegate {
    /// Ask the script layer to construct a widget for `view_type`.
    /// `None` means construction failed; no registry entry will be created.
    fn create_view(&self, root_tag: Tag, tag: Tag, view_type: &str) -> Option<NativeHandle>;

    fn update_props(&self, root_tag: Tag, tag: Tag, props_buffer: &[u8], deleted_keys: &[PropKey]);

    fn update_event_listeners(&self, root_tag: Tag, tag: Tag, props_buffer: &[u8]);

    fn set_frame(&self, root_tag: Tag, tag: Tag, frame: Rect);
}

/// Platform surface attach/detach, the other half of root binding.
pub trait SurfaceBinder {
    fn attach(&self, surface: SurfaceHandle, widget: NativeHandle);

    fn detach(&self, surface: SurfaceHandle, widget: NativeHandle);
}
