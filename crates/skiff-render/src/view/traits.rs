use crate::bridge::NativeHandle;
use crate::tree::{Padding, Rect};
use crate::value::{PropMap, PropValue};

/// Completion callback for [`RenderView::invoke_method`].
pub type MethodCallback = Box<dyn FnOnce(PropValue)>;

/// Capability contract implemented by every concrete native view.
///
/// The engine owns the tree structure (parent/child links live on the node,
/// not here); this trait covers what a widget does with props, layout,
/// events, and method calls. Concrete widget sets (list, pager, modal, ...)
/// live outside the engine and plug in through this trait.
pub trait RenderView {
    /// Apply one prop. Returns whether the view recognized the key.
    /// Falsy values (empty string, `false`, `0`) are real values and must
    /// be applied; a deleted prop arrives as an explicit [`PropValue::Null`].
    fn set_prop(&mut self, key: &str, value: &PropValue) -> bool;

    /// Called once after a full prop delta has been applied.
    fn on_props_applied(&mut self) {}

    fn set_frame(&mut self, frame: Rect, padding: Padding);

    /// Register/unregister native event callbacks. Keys are event names;
    /// truthy values register, falsy values unregister.
    fn update_event_listeners(&mut self, props: &PropMap);

    fn is_event_registered(&self, event: &str) -> bool {
        let _ = event;
        false
    }

    /// Invoke a view method by name. Implementations that complete
    /// synchronously call `callback` before returning.
    fn invoke_method(&mut self, method: &str, args: &[PropValue], callback: Option<MethodCallback>) {
        let _ = (method, args);
        if let Some(callback) = callback {
            callback(PropValue::Null);
        }
    }

    /// The underlying platform widget handle, used for surface attachment.
    fn native_handle(&self) -> NativeHandle;
}
