//! # Scene Document
//!
//! The single write path into a scene tree.
//!
//! A `SceneDocument` owns the live tree together with everything that has
//! to stay consistent with it: the version counter, undo history, focus
//! state, the node factory and the event bus.
//!
//! ## Command lifecycle
//!
//! ```text
//! validate → apply → snapshot → version += 1 → emit
//!    ↓         ↓         ↓                       ↓
//!  Error    RootNode  UndoStack       change, history, focus events
//! ```
//!
//! A failed command leaves the tree, history, version and focus untouched
//! and emits nothing.

use scenecraft_common::{AssetResolver, NullResolver};
use scenecraft_model::{
    AssetRef, LayoutPatch, NodeFactory, NodeType, RootNode, SceneNode, StylePatch, ROOT_ID,
};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, info};

use crate::events::{EventBus, SceneEvent, Subscription};
use crate::mutations::{ChangeScope, Mutation, MutationError, MutationResult, PlacementIntent};
use crate::selection::{FocusChange, SelectionState};
use crate::serializer::SceneFile;
use crate::undo_stack::{Snapshot, UndoStack};
use crate::EditorError;

/// Editable scene with history, focus and change notifications
pub struct SceneDocument {
    name: String,
    root: RootNode,
    /// Increments on every applied edit, undo and redo
    version: u64,
    history: UndoStack,
    selection: SelectionState,
    events: EventBus,
    factory: NodeFactory,
    resolver: Rc<dyn AssetResolver>,
}

impl SceneDocument {
    /// Empty scene with a white canvas of the given size
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        let name = name.into();
        let root = RootNode::new(width, height);
        let mut history = UndoStack::new();
        history.commit(Snapshot::capture(&root, 0, None));

        Self {
            factory: NodeFactory::new(&name),
            name,
            root,
            version: 0,
            history,
            selection: SelectionState::new(),
            events: EventBus::new(),
            resolver: Rc::new(NullResolver),
        }
    }

    /// Load a scene from its serialized form
    pub fn from_json(name: impl Into<String>, source: &str) -> Result<Self, EditorError> {
        let file = SceneFile::from_json(source)?;
        let mut doc = Self::new(name, file.root.canvas.width, file.root.canvas.height);
        doc.install(file.root, file.version);
        Ok(doc)
    }

    pub fn with_resolver(mut self, resolver: Rc<dyn AssetResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Cap undo depth (0 = unlimited). Existing history is dropped.
    pub fn with_history_limit(mut self, max_levels: usize) -> Self {
        self.history = UndoStack::with_max_levels(max_levels);
        self.history
            .commit(Snapshot::capture(&self.root, self.version, None));
        self
    }

    // -- Accessors ---------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &RootNode {
        &self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find_node(&self, id: &str) -> Option<&SceneNode> {
        self.root.find_node(id)
    }

    pub fn resolver(&self) -> &dyn AssetResolver {
        self.resolver.as_ref()
    }

    pub fn selection(&self) -> &[String] {
        self.selection.selected()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.selection.hovered()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.history.undo_label()
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.history.redo_label()
    }

    pub fn subscribe(&self, listener: impl FnMut(&SceneEvent) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    // -- Node factory ------------------------------------------------------

    pub fn create_node(&mut self, node_type: NodeType) -> SceneNode {
        self.factory.create(node_type)
    }

    pub fn create_node_with(
        &mut self,
        node_type: NodeType,
        overrides: &serde_json::Value,
    ) -> Result<SceneNode, EditorError> {
        Ok(self.factory.create_with(node_type, overrides)?)
    }

    pub fn create_node_named(
        &mut self,
        node_type: &str,
        overrides: &serde_json::Value,
    ) -> Result<SceneNode, EditorError> {
        Ok(self.factory.create_named(node_type, overrides)?)
    }

    // -- Commands ----------------------------------------------------------

    /// Apply a mutation: validate, apply, snapshot, bump version, notify
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        if let Mutation::ApplyPlacementIntents { intents } = &mutation {
            if intents.is_empty() {
                debug!("Empty placement batch, nothing to apply");
                return Ok(MutationResult {
                    version: self.version,
                });
            }
        }

        let scope = match mutation.apply(&mut self.root, self.resolver.as_ref()) {
            Ok(scope) => scope,
            Err(error) => {
                debug!(mutation = mutation.label(), %error, "Mutation rejected");
                self.restore_current();
                return Err(error.into());
            }
        };

        self.version += 1;
        self.history.commit(Snapshot::capture(
            &self.root,
            self.version,
            Some(mutation.label()),
        ));
        let focus = self.selection.prune(&self.root);

        debug!(
            mutation = mutation.label(),
            version = self.version,
            "Mutation applied"
        );

        self.events.emit(&match scope {
            ChangeScope::Node(id) => SceneEvent::NodeChanged { id },
            ChangeScope::Scene => SceneEvent::SceneChanged,
        });
        self.emit_history();
        self.emit_focus(focus);

        Ok(MutationResult {
            version: self.version,
        })
    }

    /// Append `node` as the last child of `parent_id` (`"root"` for top level)
    pub fn add_child(
        &mut self,
        parent_id: &str,
        node: SceneNode,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::AddChild {
            parent_id: parent_id.to_string(),
            node,
        })
    }

    /// Remove a node and its subtree. Returns false when `id` is not in the tree.
    pub fn remove_node(&mut self, id: &str) -> Result<bool, EditorError> {
        if id != ROOT_ID && self.root.find_node(id).is_none() {
            debug!(node_id = %id, "Remove ignored, node not in tree");
            return Ok(false);
        }
        self.apply(Mutation::RemoveNode {
            node_id: id.to_string(),
        })?;
        Ok(true)
    }

    pub fn move_node(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::MoveNode {
            node_id: id.to_string(),
            new_parent_id: new_parent_id.to_string(),
            index,
        })
    }

    pub fn update_layout(
        &mut self,
        id: &str,
        layout: LayoutPatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateLayout {
            node_id: id.to_string(),
            layout,
        })
    }

    pub fn update_style(
        &mut self,
        id: &str,
        style: StylePatch,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateStyle {
            node_id: id.to_string(),
            style,
        })
    }

    pub fn bind_asset(&mut self, id: &str, asset: AssetRef) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::BindAsset {
            node_id: id.to_string(),
            asset,
        })
    }

    /// Fill slots from a batch of intents as one undoable edit
    pub fn apply_placement_intents(
        &mut self,
        intents: &[PlacementIntent],
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::ApplyPlacementIntents {
            intents: intents.to_vec(),
        })
    }

    pub fn set_text(
        &mut self,
        id: &str,
        content: impl Into<String>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::SetText {
            node_id: id.to_string(),
            content: content.into(),
        })
    }

    pub fn update_props(
        &mut self,
        id: &str,
        props: BTreeMap<String, serde_json::Value>,
    ) -> Result<MutationResult, EditorError> {
        self.apply(Mutation::UpdateProps {
            node_id: id.to_string(),
            props,
        })
    }

    // -- History -----------------------------------------------------------

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.root = snapshot.root.clone();
        self.after_restore("undo");
        true
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.root = snapshot.root.clone();
        self.after_restore("redo");
        true
    }

    fn after_restore(&mut self, action: &str) {
        self.version += 1;
        let focus = self.selection.prune(&self.root);
        debug!(action, version = self.version, "History restored");

        self.events.emit(&SceneEvent::SceneChanged);
        self.emit_history();
        self.emit_focus(focus);
    }

    /// Bring the tree back in line with the current snapshot
    fn restore_current(&mut self) {
        if let Some(current) = self.history.current() {
            if current.root != self.root {
                self.root = current.root.clone();
            }
        }
    }

    // -- Focus -------------------------------------------------------------

    /// Replace the selection. Every id must exist.
    pub fn select_nodes<I, S>(&mut self, ids: I) -> Result<(), EditorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        for id in &ids {
            self.require_node(id)?;
        }
        self.selection.select(ids);
        self.emit_selection();
        Ok(())
    }

    pub fn add_to_selection(&mut self, id: &str) -> Result<(), EditorError> {
        self.require_node(id)?;
        self.selection.add(id);
        self.emit_selection();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
        self.emit_selection();
    }

    pub fn set_hovered_node(&mut self, id: Option<&str>) -> Result<(), EditorError> {
        if let Some(id) = id {
            self.require_node(id)?;
        }
        self.selection.set_hovered(id.map(str::to_string));
        self.events.emit(&SceneEvent::NodeHovered {
            id: id.map(str::to_string),
        });
        Ok(())
    }

    fn require_node(&self, id: &str) -> Result<(), EditorError> {
        if self.root.find_node(id).is_none() {
            return Err(MutationError::NodeNotFound(id.to_string()).into());
        }
        Ok(())
    }

    // -- Serialization -----------------------------------------------------

    pub fn to_json(&self) -> Result<String, EditorError> {
        SceneFile::new(self.root.clone(), self.version).to_json()
    }

    /// Replace the whole scene. On error the live document is untouched.
    pub fn import_json(&mut self, source: &str) -> Result<(), EditorError> {
        let file = SceneFile::from_json(source)?;
        let nodes = file.root.node_count();
        self.install(file.root, file.version);
        info!(
            document = %self.name,
            nodes,
            version = self.version,
            "Scene imported"
        );
        Ok(())
    }

    /// Start over with an empty white canvas at version 0
    pub fn reset(&mut self, width: f64, height: f64) {
        self.install(RootNode::new(width, height), 0);
        info!(document = %self.name, width, height, "Scene reset");
    }

    fn install(&mut self, root: RootNode, version: u64) {
        self.root = root;
        self.version = version;
        self.history
            .reset(Snapshot::capture(&self.root, self.version, None));
        self.factory.observe_tree(&self.root);
        let focus = self.selection.clear();

        self.events.emit(&SceneEvent::SceneChanged);
        self.emit_history();
        self.emit_focus(focus);
    }

    // -- Events ------------------------------------------------------------

    fn emit_history(&self) {
        self.events.emit(&SceneEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn emit_selection(&self) {
        self.events.emit(&SceneEvent::NodeSelected {
            ids: self.selection.selected().to_vec(),
        });
    }

    fn emit_focus(&self, change: FocusChange) {
        if change.selection {
            self.emit_selection();
        }
        if change.hover {
            self.events.emit(&SceneEvent::NodeHovered {
                id: self.selection.hovered().map(str::to_string),
            });
        }
    }
}

impl std::fmt::Debug for SceneDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneDocument")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("nodes", &self.root.node_count())
            .field("history", &self.history)
            .field("selection", &self.selection)
            .finish()
    }
}
