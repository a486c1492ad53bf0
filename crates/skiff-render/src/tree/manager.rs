use super::mutation::{Mutation, MutationQueue, MoveEntry, Padding, Rect};
use super::node::{ForeignState, Tag, ViewBackend, ViewNode};
use super::registry::ViewRegistry;
use crate::bridge::{ForeignDelegate, SurfaceBinder, SurfaceHandle};
use crate::context::RenderContext;
use crate::error::{RenderError, Result};
use crate::value::{PropKey, PropMap, PropValue};
use crate::view::{builtin, MethodCallback, ViewCreators};
use crate::wire;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Fired once per flushed batch, in subscription order. Callbacks must not
/// subscribe or unsubscribe end-batch callbacks while being invoked.
pub type EndBatchCallback = Box<dyn Fn()>;

/// The view tree mutation engine: owns the registry, drains the mutation
/// queue on flush, resolves view types through the three factory tiers
/// (foreign, host creator map, built-in), and keeps root bindings and
/// end-batch subscriptions.
///
/// Single-threaded: all mutation application, callback firing, and root
/// binding happen on the UI thread. The upstream layer hands mutations
/// over through [`MutationQueue`], the one cross-thread point.
pub struct ViewManager {
    ctx: RenderContext,
    registry: ViewRegistry,
    queue: MutationQueue,
    creators: ViewCreators,
    aliases: HashMap<PropKey, PropKey>,
    foreign_types: HashSet<PropKey>,
    delegate: Rc<dyn ForeignDelegate>,
    surfaces: Rc<dyn SurfaceBinder>,
    end_batch: BTreeMap<u64, EndBatchCallback>,
    next_end_batch_id: u64,
    bindings: HashMap<Tag, SurfaceHandle>,
}

impl ViewManager {
    /// Builds the manager and seeds the registry with its own root view
    /// (type `"RootView"`, tag from `ctx`).
    pub fn new(
        ctx: RenderContext,
        creators: ViewCreators,
        aliases: HashMap<PropKey, PropKey>,
        foreign_types: HashSet<PropKey>,
        delegate: Rc<dyn ForeignDelegate>,
        surfaces: Rc<dyn SurfaceBinder>,
    ) -> Self {
        let mut registry = ViewRegistry::new();
        let root_tag = ctx.root_tag();
        let root = ViewNode::new(
            root_tag,
            builtin::ROOT_VIEW_TYPE.into(),
            ViewBackend::Native(Box::new(builtin::BuiltinView::new(root_tag, false))),
        );
        // The root tag is ours; the registry is empty at this point.
        registry
            .insert(root)
            .unwrap_or_else(|_| unreachable!("fresh registry cannot hold the root tag"));

        Self {
            ctx,
            registry,
            queue: MutationQueue::new(),
            creators,
            aliases,
            foreign_types,
            delegate,
            surfaces,
            end_batch: BTreeMap::new(),
            next_end_batch_id: 0,
            bindings: HashMap::new(),
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Clone of the handoff queue, for the producer side.
    pub fn queue(&self) -> MutationQueue {
        self.queue.clone()
    }

    pub fn enqueue_mutation(&self, mutation: Mutation) {
        self.queue.push(mutation);
    }

    /// Drain the queue and apply every mutation in arrival order, then fire
    /// end-batch callbacks. Per-mutation failures are logged and skipped;
    /// the batch is not transactional and nothing propagates out of here.
    pub fn flush_batch(&mut self) {
        let batch = self.queue.drain();
        debug!("applying batch of {} mutations", batch.len());
        for mutation in batch {
            self.apply_mutation(mutation);
        }
        self.notify_end_batch();
    }

    fn apply_mutation(&mut self, mutation: Mutation) {
        if let Err(err) = self.try_apply(mutation) {
            match err {
                RenderError::LookupMiss(_) => debug!("mutation skipped: {}", err),
                _ => error!("mutation skipped: {}", err),
            }
        }
    }

    fn try_apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::Create {
                tag,
                view_type,
                parent_tag,
                index,
                parent_is_text,
                props,
            } => {
                self.create_view(tag, &view_type, parent_is_text)?;
                self.insert_child(parent_tag, tag, index);
                self.update_props(tag, &props, &[])
            }
            Mutation::Update {
                tag,
                props,
                deleted_keys,
            } => self.update_props(tag, &props, &deleted_keys),
            Mutation::Move {
                entries,
                parent_tag,
            } => self.move_children(entries, parent_tag),
            Mutation::MoveAcrossParents {
                tags,
                new_parent_tag,
                old_parent_tag,
                base_index,
            } => self.move_across_parents(&tags, new_parent_tag, old_parent_tag, base_index),
            Mutation::Delete { tag } => self.delete_view(tag),
            Mutation::UpdateLayout {
                tag,
                frame,
                padding,
            } => self.set_view_frame(tag, frame, padding),
            Mutation::UpdateEventListener { tag, props } => {
                self.update_props(tag, &props, &[])?;
                self.update_event_listeners(tag, &props)
            }
        }
    }

    /// Resolution order is fixed: foreign types first (the script layer may
    /// redefine anything), then the host creator map, then the built-in
    /// factory after alias resolution.
    fn create_view(&mut self, tag: Tag, view_type: &str, parent_is_text: bool) -> Result<()> {
        if self.is_foreign_type(view_type) {
            return self.create_foreign_view(tag, view_type);
        }

        if let Some(creator) = self.creators.get(view_type) {
            let view = creator(&self.ctx);
            let node = ViewNode::new(tag, view_type.into(), ViewBackend::Native(view));
            return self.registry.insert(node);
        }

        let real_type = self
            .aliases
            .get(view_type)
            .map(|t| t.as_str())
            .unwrap_or(view_type);
        match builtin::create_view(real_type, tag, parent_is_text, &self.ctx) {
            Some(view) => {
                let node = ViewNode::new(tag, real_type.into(), ViewBackend::Native(view));
                self.registry.insert(node)
            }
            None => Err(RenderError::UnresolvedViewType(view_type.to_string())),
        }
    }

    fn is_foreign_type(&self, view_type: &str) -> bool {
        self.foreign_types.contains(view_type) || view_type == builtin::EMBEDDED_WEB_VIEW_TYPE
    }

    fn create_foreign_view(&mut self, tag: Tag, view_type: &str) -> Result<()> {
        match self.delegate.create_view(self.ctx.root_tag(), tag, view_type) {
            Some(handle) => {
                let node = ViewNode::new(
                    tag,
                    view_type.into(),
                    ViewBackend::Foreign(ForeignState::new(handle)),
                );
                self.registry.insert(node)
            }
            None => Err(RenderError::BoundaryCallFailure {
                tag,
                view_type: view_type.to_string(),
            }),
        }
    }

    /// Structural insert with dangling-parent tolerance: a missing parent
    /// skips the insert but keeps the child registered, so an out-of-order
    /// batch can attach it with a later move.
    fn insert_child(&mut self, parent_tag: Tag, child_tag: Tag, index: usize) {
        if !self.registry.contains(parent_tag) {
            warn!(
                "insert skipped: parent {} missing for child {}",
                parent_tag.0, child_tag.0
            );
            return;
        }
        if let Some(parent) = self.registry.get_mut(parent_tag) {
            parent.insert_child(index, child_tag);
        }
        if let Some(child) = self.registry.get_mut(child_tag) {
            child.set_parent(Some(parent_tag));
        }
    }

    fn detach_from_parent(&mut self, tag: Tag) {
        let parent_tag = match self.registry.get(tag).and_then(|node| node.parent()) {
            Some(parent_tag) => parent_tag,
            None => return,
        };
        if let Some(parent) = self.registry.get_mut(parent_tag) {
            parent.remove_child(tag);
        }
        if let Some(node) = self.registry.get_mut(tag) {
            node.set_parent(None);
        }
    }

    /// Entries are sorted ascending by target index before execution, so
    /// indices are interpreted against the final sequence. Applying the
    /// same move twice is idempotent.
    fn move_children(&mut self, mut entries: Vec<MoveEntry>, parent_tag: Tag) -> Result<()> {
        if !self.registry.contains(parent_tag) {
            warn!("move skipped: parent {} not in registry", parent_tag.0);
            return Ok(());
        }
        entries.sort_by_key(|entry| entry.index);
        for entry in entries {
            if !self.registry.contains(entry.tag) {
                continue;
            }
            self.detach_from_parent(entry.tag);
            self.insert_child(parent_tag, entry.tag, entry.index);
        }
        Ok(())
    }

    fn move_across_parents(
        &mut self,
        tags: &[Tag],
        new_parent_tag: Tag,
        old_parent_tag: Tag,
        base_index: usize,
    ) -> Result<()> {
        if !self.registry.contains(old_parent_tag) || !self.registry.contains(new_parent_tag) {
            warn!(
                "cross-parent move skipped: old={} new={}",
                old_parent_tag.0, new_parent_tag.0
            );
            return Ok(());
        }
        for (i, &tag) in tags.iter().enumerate() {
            if !self.registry.contains(tag) {
                continue;
            }
            self.detach_from_parent(tag);
            self.insert_child(new_parent_tag, tag, base_index + i);
        }
        Ok(())
    }

    /// Structural detach first, then registry removal of the whole subtree.
    /// Deleting an absent tag is a no-op.
    fn delete_view(&mut self, tag: Tag) -> Result<()> {
        if !self.registry.contains(tag) {
            return Ok(());
        }
        self.detach_from_parent(tag);
        self.registry.remove_subtree(tag);
        Ok(())
    }

    fn update_props(&mut self, tag: Tag, props: &PropMap, deleted_keys: &[PropKey]) -> Result<()> {
        let node = self
            .registry
            .get_mut(tag)
            .ok_or(RenderError::LookupMiss(tag))?;
        match node.backend_mut() {
            ViewBackend::Foreign(_) => {
                let buffer = wire::encode_map(props);
                self.delegate
                    .update_props(self.ctx.root_tag(), tag, &buffer, deleted_keys);
            }
            ViewBackend::Native(view) => {
                for (key, value) in props {
                    // Falsy values (empty string, false, zero) are real.
                    if !key.is_empty() {
                        view.set_prop(key, value);
                    }
                }
                for key in deleted_keys {
                    if !key.is_empty() {
                        view.set_prop(key, &PropValue::Null);
                    }
                }
                view.on_props_applied();
            }
        }
        Ok(())
    }

    fn set_view_frame(&mut self, tag: Tag, frame: Rect, padding: Padding) -> Result<()> {
        let node = self
            .registry
            .get_mut(tag)
            .ok_or(RenderError::LookupMiss(tag))?;
        match node.backend_mut() {
            ViewBackend::Foreign(state) => {
                // Both paths run: the shadow state keeps container geometry
                // consistent on this side while rendering is delegated.
                state.frame = frame;
                state.padding = padding;
                self.delegate.set_frame(self.ctx.root_tag(), tag, frame);
            }
            ViewBackend::Native(view) => view.set_frame(frame, padding),
        }
        Ok(())
    }

    fn update_event_listeners(&mut self, tag: Tag, props: &PropMap) -> Result<()> {
        let node = self
            .registry
            .get_mut(tag)
            .ok_or(RenderError::LookupMiss(tag))?;
        match node.backend_mut() {
            ViewBackend::Foreign(_) => {
                let buffer = wire::encode_map(props);
                self.delegate
                    .update_event_listeners(self.ctx.root_tag(), tag, &buffer);
            }
            ViewBackend::Native(view) => view.update_event_listeners(props),
        }
        Ok(())
    }

    /// Forward a method call to the resolved view. Missing tags are a
    /// logged no-op; the delegate interface has no method channel, so
    /// foreign views complete the callback with null.
    pub fn invoke_method(
        &mut self,
        tag: Tag,
        method: &str,
        args: &[PropValue],
        callback: Option<MethodCallback>,
    ) {
        match self.registry.get_mut(tag) {
            Some(node) => match node.backend_mut() {
                ViewBackend::Native(view) => view.invoke_method(method, args, callback),
                ViewBackend::Foreign(_) => {
                    debug!("method \"{}\" on foreign view {} answers null", method, tag.0);
                    if let Some(callback) = callback {
                        callback(PropValue::Null);
                    }
                }
            },
            None => debug!("method \"{}\" on missing view {}", method, tag.0),
        }
    }

    pub fn is_event_registered(&self, tag: Tag, event: &str) -> bool {
        match self.registry.get(tag).map(|node| node.backend()) {
            Some(ViewBackend::Native(view)) => view.is_event_registered(event),
            _ => false,
        }
    }

    pub fn get_parent_of(&self, tag: Tag) -> Option<(Tag, PropKey)> {
        let parent_tag = self.registry.get(tag)?.parent()?;
        let parent = self.registry.get(parent_tag)?;
        Some((parent.tag(), parent.view_type().into()))
    }

    /// Children of `tag` in render order, with their view types. Empty for
    /// unknown tags.
    pub fn get_children_of(&self, tag: Tag) -> Vec<(Tag, PropKey)> {
        let node = match self.registry.get(tag) {
            Some(node) => node,
            None => return Vec::new(),
        };
        node.children()
            .iter()
            .filter_map(|&child| {
                self.registry
                    .get(child)
                    .map(|node| (child, node.view_type().into()))
            })
            .collect()
    }

    pub fn subscribe_end_batch(&mut self, callback: EndBatchCallback) -> u64 {
        self.next_end_batch_id += 1;
        self.end_batch.insert(self.next_end_batch_id, callback);
        self.next_end_batch_id
    }

    pub fn unsubscribe_end_batch(&mut self, id: u64) {
        self.end_batch.remove(&id);
    }

    fn notify_end_batch(&self) {
        for callback in self.end_batch.values() {
            callback();
        }
    }

    /// Attach the view behind `node_id` (the root sentinel resolves to the
    /// manager's root tag) to a platform surface. Re-binding the same
    /// surface is a no-op. Binding a different surface records and attaches
    /// it without detaching the previous one; callers unbind first when
    /// they want that.
    pub fn bind_root(&mut self, surface: SurfaceHandle, node_id: Tag) {
        let tag = self.resolve_content_id(node_id);
        if self.bindings.get(&tag) == Some(&surface) {
            return;
        }
        let node = match self.registry.get(tag) {
            Some(node) => node,
            None => return,
        };
        let handle = node.native_handle();
        self.bindings.insert(tag, surface);
        self.surfaces.attach(surface, handle);
    }

    /// Detach the view behind `node_id` from its recorded surface. No-op if
    /// unbound or if the view is gone.
    pub fn unbind_root(&mut self, node_id: Tag) {
        let tag = self.resolve_content_id(node_id);
        let surface = match self.bindings.get(&tag) {
            Some(&surface) => surface,
            None => return,
        };
        let node = match self.registry.get(tag) {
            Some(node) => node,
            None => return,
        };
        self.surfaces.detach(surface, node.native_handle());
        self.bindings.remove(&tag);
    }

    fn resolve_content_id(&self, node_id: Tag) -> Tag {
        if node_id == Tag::ROOT {
            self.ctx.root_tag()
        } else {
            node_id
        }
    }
}
