//! Selection and hover focus.
//!
//! Focus is UI state: it is never recorded in history and does not bump
//! the scene version. It must never point at a node that is gone, so the
//! document prunes it whenever the tree changes shape.

use scenecraft_model::RootNode;

/// Which focus fields a prune (or clear) actually changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusChange {
    pub selection: bool,
    pub hover: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Vec<String>,
    hovered: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Replace the selection. Duplicates are dropped, first occurrence wins.
    pub fn select<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.clear();
        for id in ids {
            self.add(id);
        }
    }

    /// Returns false when `id` was already selected
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.is_selected(&id) {
            return false;
        }
        self.selected.push(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn set_hovered(&mut self, id: Option<String>) {
        self.hovered = id;
    }

    /// Drop every id that no longer exists in `root`
    pub fn prune(&mut self, root: &RootNode) -> FocusChange {
        let before = self.selected.len();
        self.selected.retain(|id| root.find_node(id).is_some());

        let hover = match &self.hovered {
            Some(id) if root.find_node(id).is_none() => {
                self.hovered = None;
                true
            }
            _ => false,
        };

        FocusChange {
            selection: self.selected.len() != before,
            hover,
        }
    }

    /// Forget all focus; reports what was non-empty
    pub fn clear(&mut self) -> FocusChange {
        let change = FocusChange {
            selection: !self.selected.is_empty(),
            hover: self.hovered.is_some(),
        };
        self.selected.clear();
        self.hovered = None;
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecraft_model::{NodeFactory, NodeType};

    #[test]
    fn test_select_dedupes_in_order() {
        let mut selection = SelectionState::new();
        selection.select(["b", "a", "b", "c", "a"]);
        assert_eq!(selection.selected(), ["b", "a", "c"]);

        assert!(!selection.add("c"));
        assert!(selection.add("d"));
        assert_eq!(selection.selected(), ["b", "a", "c", "d"]);
    }

    #[test]
    fn test_prune_drops_missing_ids() {
        let mut factory = NodeFactory::new("selection");
        let mut root = RootNode::new(100.0, 100.0);
        let kept = factory.create(NodeType::Text);
        let kept_id = kept.id.clone();
        root.children.push(kept);

        let mut selection = SelectionState::new();
        selection.select([kept_id.clone(), "gone".to_string()]);
        selection.set_hovered(Some("gone".to_string()));

        let change = selection.prune(&root);
        assert_eq!(change, FocusChange { selection: true, hover: true });
        assert_eq!(selection.selected(), [kept_id]);
        assert_eq!(selection.hovered(), None);

        assert_eq!(selection.prune(&root), FocusChange::default());
    }

    #[test]
    fn test_clear_reports_previous_focus() {
        let mut selection = SelectionState::new();
        assert_eq!(selection.clear(), FocusChange::default());

        selection.set_hovered(Some("x".to_string()));
        assert_eq!(selection.clear(), FocusChange { selection: false, hover: true });
    }
}
