use super::traits::{MethodCallback, RenderView};
use crate::bridge::NativeHandle;
use crate::context::RenderContext;
use crate::tree::{Padding, Rect, Tag};
use crate::value::{PropKey, PropMap, PropValue};
use std::collections::HashSet;

/// View type of the root view seeded into the registry at construction.
pub const ROOT_VIEW_TYPE: &str = "RootView";

/// The embedded web view has no native-side factory; it always resolves
/// through the script boundary even when not explicitly registered.
pub const EMBEDDED_WEB_VIEW_TYPE: &str = "WebView";

const BUILTIN_TYPES: &[&str] = &[
    ROOT_VIEW_TYPE,
    "View",
    "Text",
    "Image",
    "ScrollView",
    "TextInput",
    "ListView",
    "ListItemView",
    "ViewPager",
    "ViewPagerItem",
    "WaterfallView",
    "WaterfallItemView",
    "PullHeaderView",
    "PullFooterView",
    "RefreshWrapper",
    "Modal",
];

/// Instantiate a built-in view, or `None` if the type name is unknown.
/// Alias resolution happens before this is called.
pub fn create_view(
    view_type: &str,
    tag: Tag,
    is_parent_text: bool,
    _ctx: &RenderContext,
) -> Option<Box<dyn RenderView>> {
    if !BUILTIN_TYPES.contains(&view_type) {
        return None;
    }
    Some(Box::new(BuiltinView::new(tag, is_parent_text)))
}

/// Stock built-in view: retains the props, frame, and listener state the
/// engine hands it. Platform backends replace this per widget type through
/// the host creator map; the retained state is what the engine itself needs
/// to stay queryable and testable.
pub struct BuiltinView {
    handle: NativeHandle,
    is_parent_text: bool,
    props: PropMap,
    frame: Rect,
    padding: Padding,
    events: HashSet<PropKey>,
    props_applied_count: u32,
}

impl BuiltinView {
    pub fn new(tag: Tag, is_parent_text: bool) -> Self {
        Self {
            handle: NativeHandle(u64::from(tag.0)),
            is_parent_text,
            props: PropMap::new(),
            frame: Rect::default(),
            padding: Padding::default(),
            events: HashSet::new(),
            props_applied_count: 0,
        }
    }

    pub fn is_parent_text(&self) -> bool {
        self.is_parent_text
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn props_applied_count(&self) -> u32 {
        self.props_applied_count
    }
}

impl RenderView for BuiltinView {
    fn set_prop(&mut self, key: &str, value: &PropValue) -> bool {
        self.props.insert(key.into(), value.clone());
        true
    }

    fn on_props_applied(&mut self) {
        self.props_applied_count += 1;
    }

    fn set_frame(&mut self, frame: Rect, padding: Padding) {
        self.frame = frame;
        self.padding = padding;
    }

    fn update_event_listeners(&mut self, props: &PropMap) {
        for (event, value) in props {
            if value.is_truthy() {
                self.events.insert(event.clone());
            } else {
                self.events.remove(event);
            }
        }
    }

    fn is_event_registered(&self, event: &str) -> bool {
        self.events.contains(event)
    }

    fn invoke_method(&mut self, _method: &str, _args: &[PropValue], callback: Option<MethodCallback>) {
        if let Some(callback) = callback {
            callback(PropValue::Null);
        }
    }

    fn native_handle(&self) -> NativeHandle {
        self.handle
    }
}
