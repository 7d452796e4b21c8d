use std::collections::HashMap;

use uuid::Uuid;

/// Expand/collapse state of the sidebar, tracked per document id and
/// independent of the tree shape. Everything starts collapsed.
#[derive(Debug, Clone, Default)]
pub struct ExpandedState {
    expanded: HashMap<Uuid, bool>,
}

impl ExpandedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.get(&id).copied().unwrap_or(false)
    }

    pub fn toggle(&mut self, id: Uuid) {
        let entry = self.expanded.entry(id).or_insert(false);
        *entry = !*entry;
    }

    pub fn expand(&mut self, id: Uuid) {
        self.expanded.insert(id, true);
    }

    pub fn collapse(&mut self, id: Uuid) {
        self.expanded.insert(id, false);
    }
}
