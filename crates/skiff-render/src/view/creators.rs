use super::traits::RenderView;
use crate::context::RenderContext;
use crate::value::PropKey;
use std::collections::HashMap;

/// Constructor for a host-registered custom view.
pub type ViewCreator = Box<dyn Fn(&RenderContext) -> Box<dyn RenderView>>;

/// Host-supplied mapping from view-type name to constructor. Consulted
/// after the foreign tier and before the built-in factory, so a host can
/// override any built-in type name with its own implementation.
#[derive(Default)]
pub struct ViewCreators {
    creators: HashMap<PropKey, ViewCreator>,
}

impl ViewCreators {
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    pub fn register(&mut self, view_type: impl Into<PropKey>, creator: ViewCreator) {
        self.creators.insert(view_type.into(), creator);
    }

    pub fn get(&self, view_type: &str) -> Option<&ViewCreator> {
        self.creators.get(view_type)
    }

    pub fn contains(&self, view_type: &str) -> bool {
        self.creators.contains_key(view_type)
    }
}
