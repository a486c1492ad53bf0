use crate::tree::Tag;

/// Construction-time configuration threaded through the manager and into
/// every view creator. No process-wide state: hosts that need density for
/// pixel conversion read it from here.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    root_tag: Tag,
    density: f32,
}

impl RenderContext {
    pub fn new(root_tag: Tag, density: f32) -> Self {
        Self { root_tag, density }
    }

    /// The tag of the manager's own root view.
    pub fn root_tag(&self) -> Tag {
        self.root_tag
    }

    /// Screen density (device pixels per logical unit).
    pub fn density(&self) -> f32 {
        self.density
    }
}
