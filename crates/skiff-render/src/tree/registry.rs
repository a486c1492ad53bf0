use super::node::{Tag, ViewNode};
use crate::error::{RenderError, Result};
use std::collections::HashMap;

/// The single source of truth for what currently exists: tag → owned view
/// node. A node is reachable here even while structurally detached from
/// the tree; registry removal is what ends its lifetime.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<Tag, ViewNode>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Register a newly created node. Tags are assumed externally unique;
    /// a duplicate is refused and the registry left unchanged.
    pub fn insert(&mut self, node: ViewNode) -> Result<()> {
        let tag = node.tag();
        if self.views.contains_key(&tag) {
            return Err(RenderError::InvariantViolation(format!(
                "duplicate tag {} in registry",
                tag.0
            )));
        }
        self.views.insert(tag, node);
        Ok(())
    }

    /// Absence is a normal outcome (not yet created, or already deleted).
    pub fn get(&self, tag: Tag) -> Option<&ViewNode> {
        self.views.get(&tag)
    }

    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut ViewNode> {
        self.views.get_mut(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.views.contains_key(&tag)
    }

    /// Remove `tag` and every descendant currently held in its child
    /// sequence. Does not touch the parent's child list; structural detach
    /// is the caller's job before deletion.
    pub fn remove_subtree(&mut self, tag: Tag) {
        if let Some(node) = self.views.remove(&tag) {
            for &child in node.children() {
                self.remove_subtree(child);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
