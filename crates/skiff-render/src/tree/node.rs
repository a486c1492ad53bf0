use super::mutation::{Padding, Rect};
use crate::bridge::NativeHandle;
use crate::value::PropKey;
use crate::view::RenderView;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Process-unique view identity, assigned by the upstream layer. Never
/// reused while the view is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag(pub u32);

impl Tag {
    /// Sentinel content id that resolves to the manager's own root tag in
    /// root binding calls.
    pub const ROOT: Tag = Tag(0);
}

/// Which implementation strategy a node resolved to. Decided once at
/// creation, never re-decided per operation.
pub enum ViewBackend {
    /// Built-in or host-registered custom view, driven through the
    /// capability trait.
    Native(Box<dyn RenderView>),
    /// Script-provided view; prop/layout/event updates are marshaled across
    /// the boundary. Local shadow state keeps the container geometry
    /// consistent on this side.
    Foreign(ForeignState),
}

pub struct ForeignState {
    pub handle: NativeHandle,
    pub frame: Rect,
    pub padding: Padding,
}

impl ForeignState {
    pub fn new(handle: NativeHandle) -> Self {
        Self {
            handle,
            frame: Rect::default(),
            padding: Padding::default(),
        }
    }
}

/// One live view node. The registry owns it; parent/child links are tag
/// references, so a node detached from its parent but not yet deleted
/// stays valid.
pub struct ViewNode {
    tag: Tag,
    view_type: PropKey,
    parent: Option<Tag>,
    children: SmallVec<[Tag; 8]>,
    backend: ViewBackend,
}

impl ViewNode {
    pub fn new(tag: Tag, view_type: PropKey, backend: ViewBackend) -> Self {
        Self {
            tag,
            view_type,
            parent: None,
            children: SmallVec::new(),
            backend,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn view_type(&self) -> &str {
        &self.view_type
    }

    pub fn parent(&self) -> Option<Tag> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<Tag>) {
        self.parent = parent;
    }

    /// Children in render order.
    pub fn children(&self) -> &[Tag] {
        &self.children
    }

    /// Insert a child tag; out-of-range indices clamp to append.
    pub fn insert_child(&mut self, index: usize, child: Tag) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Remove a child tag, returning the position it held.
    pub fn remove_child(&mut self, child: Tag) -> Option<usize> {
        let index = self.children.iter().position(|&c| c == child)?;
        self.children.remove(index);
        Some(index)
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self.backend, ViewBackend::Foreign(_))
    }

    pub fn backend(&self) -> &ViewBackend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut ViewBackend {
        &mut self.backend
    }

    pub fn native_handle(&self) -> NativeHandle {
        match &self.backend {
            ViewBackend::Native(view) => view.native_handle(),
            ViewBackend::Foreign(state) => state.handle,
        }
    }
}
