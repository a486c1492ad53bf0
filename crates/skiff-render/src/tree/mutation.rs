use super::node::Tag;
use crate::value::{PropKey, PropMap};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Layout frame in the parent's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// One child reorder within a `Move`: `tag` lands at `index` in the final
/// child sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub tag: Tag,
    pub index: usize,
}

/// One tree-edit command from the upstream layout layer.
///
/// Mutations are immutable once constructed and consumed exactly once by
/// the applier, strictly in batch order: a `Create` must precede any other
/// mutation referencing the same tag within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Create {
        tag: Tag,
        view_type: PropKey,
        parent_tag: Tag,
        index: usize,
        #[serde(default)]
        parent_is_text: bool,
        #[serde(default)]
        props: PropMap,
    },
    Update {
        tag: Tag,
        #[serde(default)]
        props: PropMap,
        #[serde(default)]
        deleted_keys: Vec<PropKey>,
    },
    /// Reorder children within one parent.
    Move {
        entries: Vec<MoveEntry>,
        parent_tag: Tag,
    },
    /// Move `tags` (in list order) from one parent to another; the i-th tag
    /// lands at `base_index + i`.
    MoveAcrossParents {
        tags: Vec<Tag>,
        new_parent_tag: Tag,
        old_parent_tag: Tag,
        base_index: usize,
    },
    Delete {
        tag: Tag,
    },
    UpdateLayout {
        tag: Tag,
        frame: Rect,
        padding: Padding,
    },
    /// Carries an ordinary prop delta plus event registration changes.
    UpdateEventListener {
        tag: Tag,
        #[serde(default)]
        props: PropMap,
    },
}

/// Cross-thread handoff for mutation records: the upstream layer pushes
/// from its own thread, the manager drains on the UI thread at flush.
/// The only synchronization point in the engine.
#[derive(Clone, Default)]
pub struct MutationQueue {
    inner: Arc<Mutex<Vec<Mutation>>>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, mutation: Mutation) {
        self.inner.lock().push(mutation);
    }

    /// Take everything queued so far, in arrival order.
    pub fn drain(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
