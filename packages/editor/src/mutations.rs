//! # Scene Mutations
//!
//! The fixed command set of the scene document.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation is one user-visible edit
//! 2. **Validated up front**: `validate` covers every failure mode, so
//!    `apply` never stops halfway through a tree change
//! 3. **Serializable**: UI adapters can ship mutations as JSON messages
//!
//! ## Mutation Semantics
//!
//! ### RemoveNode
//! - Removes node and all descendants
//!
//! ### MoveNode
//! - Atomic relocation of node to new parent
//! - Fails if it would create a cycle
//!
//! ### ApplyPlacementIntents
//! - Every intent is checked before any slot is touched
//! - The whole batch is one undo step

use scenecraft_common::AssetResolver;
use scenecraft_model::{
    Anchor, AssetRef, LayoutPatch, ModelError, NodeKind, NodeType, ObjectFit, RootNode,
    SceneNode, StylePatch, ROOT_ID,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Directive binding an asset into a slot with presentation hints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlacementIntent {
    pub asset_id: String,
    pub slot_id: String,
    #[serde(default)]
    pub fit: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl PlacementIntent {
    pub fn new(asset_id: impl Into<String>, slot_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            slot_id: slot_id.into(),
            fit: String::new(),
            position: String::new(),
            opacity: None,
        }
    }

    pub fn fit(mut self, fit: impl Into<String>) -> Self {
        self.fit = fit.into();
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }
}

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Append a node as the last child of the root or a container
    AddChild { parent_id: String, node: SceneNode },

    /// Remove a node and its subtree
    RemoveNode { node_id: String },

    /// Move a node to a new parent at index
    MoveNode {
        node_id: String,
        new_parent_id: String,
        index: usize,
    },

    /// Shallow-merge layout fields
    UpdateLayout { node_id: String, layout: LayoutPatch },

    /// Shallow-merge style fields
    UpdateStyle { node_id: String, style: StylePatch },

    /// Point a media node or slot at an asset
    BindAsset { node_id: String, asset: AssetRef },

    /// Fill slots from a batch of placement intents
    ApplyPlacementIntents { intents: Vec<PlacementIntent> },

    /// Replace the content of a text node
    SetText { node_id: String, content: String },

    /// Shallow-merge props of an embedded component
    UpdateProps {
        node_id: String,
        props: BTreeMap<String, serde_json::Value>,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Parent not found: {0}")]
    ParentNotFound(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(String),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Node {node_id} is a {node_type}, which does not support this operation")]
    UnsupportedNodeType { node_id: String, node_type: NodeType },

    #[error("Node is not text")]
    NotText,

    #[error("Invalid placement intent: {0}")]
    InvalidIntent(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// What a mutation touched
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeScope {
    /// A single node changed in place
    Node(String),
    /// Tree structure or several nodes changed
    Scene,
}

impl Mutation {
    /// Short description used for undo/redo labels and logs
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddChild { .. } => "add child",
            Mutation::RemoveNode { .. } => "remove node",
            Mutation::MoveNode { .. } => "move node",
            Mutation::UpdateLayout { .. } => "update layout",
            Mutation::UpdateStyle { .. } => "update style",
            Mutation::BindAsset { .. } => "bind asset",
            Mutation::ApplyPlacementIntents { .. } => "apply placement intents",
            Mutation::SetText { .. } => "set text",
            Mutation::UpdateProps { .. } => "update props",
        }
    }

    /// Apply mutation to the tree with validation
    pub fn apply(
        &self,
        root: &mut RootNode,
        resolver: &dyn AssetResolver,
    ) -> Result<ChangeScope, MutationError> {
        // Validate first
        self.validate(root)?;

        match self {
            Mutation::AddChild { parent_id, node } => {
                let children = root
                    .children_of_mut(parent_id)
                    .ok_or_else(|| MutationError::ParentNotFound(parent_id.clone()))?;
                children.push(node.clone());
                Ok(ChangeScope::Scene)
            }

            Mutation::RemoveNode { node_id } => {
                root.remove_node(node_id)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;
                Ok(ChangeScope::Scene)
            }

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                index,
            } => Self::apply_move(root, node_id, new_parent_id, *index),

            Mutation::UpdateLayout { node_id, layout } => {
                let node = find_mut(root, node_id)?;
                node.layout = layout.merged(&node.layout);
                Ok(ChangeScope::Node(node_id.clone()))
            }

            Mutation::UpdateStyle { node_id, style } => {
                let node = find_mut(root, node_id)?;
                style.merge_into(&mut node.style);
                Ok(ChangeScope::Node(node_id.clone()))
            }

            Mutation::BindAsset { node_id, asset } => {
                let bound = resolve_binding(asset, resolver);
                let node = find_mut(root, node_id)?;
                match &mut node.kind {
                    NodeKind::Image { asset, .. } | NodeKind::Video { asset, .. } => {
                        *asset = bound;
                    }
                    NodeKind::Placeholder { current_asset, .. } => {
                        *current_asset = Some(bound);
                    }
                    _ => {
                        return Err(MutationError::UnsupportedNodeType {
                            node_id: node_id.clone(),
                            node_type: node.node_type(),
                        })
                    }
                }
                Ok(ChangeScope::Node(node_id.clone()))
            }

            Mutation::ApplyPlacementIntents { intents } => {
                for intent in intents {
                    Self::apply_intent(root, intent, resolver)?;
                }
                Ok(ChangeScope::Scene)
            }

            Mutation::SetText { node_id, content } => {
                let node = find_mut(root, node_id)?;
                match &mut node.kind {
                    NodeKind::Text { content: current } => {
                        *current = content.clone();
                        Ok(ChangeScope::Node(node_id.clone()))
                    }
                    _ => Err(MutationError::NotText),
                }
            }

            Mutation::UpdateProps { node_id, props } => {
                let node = find_mut(root, node_id)?;
                let node_type = node.node_type();
                match &mut node.kind {
                    NodeKind::Component { props: current, .. } => {
                        for (key, value) in props {
                            current.insert(key.clone(), value.clone());
                        }
                        Ok(ChangeScope::Node(node_id.clone()))
                    }
                    _ => Err(MutationError::UnsupportedNodeType {
                        node_id: node_id.clone(),
                        node_type,
                    }),
                }
            }
        }
    }

    fn apply_move(
        root: &mut RootNode,
        node_id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<ChangeScope, MutationError> {
        let node = root
            .remove_node(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;

        let children = root
            .children_of_mut(new_parent_id)
            .ok_or_else(|| MutationError::ParentNotFound(new_parent_id.to_string()))?;
        let insert_index = index.min(children.len());
        children.insert(insert_index, node);

        Ok(ChangeScope::Scene)
    }

    fn apply_intent(
        root: &mut RootNode,
        intent: &PlacementIntent,
        resolver: &dyn AssetResolver,
    ) -> Result<(), MutationError> {
        let target_id = find_slot(root, &intent.slot_id)
            .ok_or_else(|| MutationError::SlotNotFound(intent.slot_id.clone()))?;
        let bound = resolve_binding(&AssetRef::from_id(intent.asset_id.clone()), resolver);
        let node = find_mut(root, &target_id)?;

        if let Some(opacity) = intent.opacity {
            node.style.opacity = Some(opacity);
        }

        match &mut node.kind {
            NodeKind::Placeholder {
                current_asset,
                fit,
                position,
                ..
            } => {
                *current_asset = Some(bound);
                *fit = ObjectFit::from_hint(&intent.fit);
                *position = Anchor::from_hint(&intent.position);
                Ok(())
            }
            _ => Err(MutationError::UnsupportedNodeType {
                node_id: target_id.clone(),
                node_type: node.node_type(),
            }),
        }
    }

    /// Validate without applying
    pub fn validate(&self, root: &RootNode) -> Result<(), MutationError> {
        match self {
            Mutation::AddChild { parent_id, node } => {
                if !root.contains(parent_id) {
                    return Err(MutationError::ParentNotFound(parent_id.clone()));
                }
                if !root.accepts_children(parent_id) {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} cannot have children",
                        parent_id
                    )));
                }

                node.validate()?;
                for id in node.subtree_ids() {
                    if root.contains(&id) {
                        return Err(MutationError::DuplicateId(id));
                    }
                }
                Ok(())
            }

            Mutation::RemoveNode { node_id } => {
                if node_id == ROOT_ID {
                    return Err(MutationError::InvalidStructure(
                        "The root cannot be removed".to_string(),
                    ));
                }
                find(root, node_id)?;
                Ok(())
            }

            Mutation::MoveNode {
                node_id,
                new_parent_id,
                ..
            } => {
                if node_id == ROOT_ID {
                    return Err(MutationError::InvalidStructure(
                        "The root cannot be moved".to_string(),
                    ));
                }
                find(root, node_id)?;

                if !root.contains(new_parent_id) {
                    return Err(MutationError::ParentNotFound(new_parent_id.clone()));
                }

                // Check wouldn't create cycle
                if node_id == new_parent_id || root.is_descendant(node_id, new_parent_id) {
                    return Err(MutationError::CycleDetected);
                }

                if !root.accepts_children(new_parent_id) {
                    return Err(MutationError::InvalidStructure(format!(
                        "{} cannot have children",
                        new_parent_id
                    )));
                }
                Ok(())
            }

            Mutation::UpdateLayout { node_id, layout } => {
                let node = find(root, node_id)?;
                layout.merged(&node.layout).validate(node_id)?;
                Ok(())
            }

            Mutation::UpdateStyle { node_id, style } => {
                let node = find(root, node_id)?;
                let mut merged = node.style.clone();
                style.merge_into(&mut merged);
                merged.validate(node_id)?;
                Ok(())
            }

            Mutation::BindAsset { node_id, asset } => {
                let node = find(root, node_id)?;
                match node.node_type() {
                    NodeType::Image | NodeType::Video | NodeType::Placeholder => {}
                    node_type => {
                        return Err(MutationError::UnsupportedNodeType {
                            node_id: node_id.clone(),
                            node_type,
                        })
                    }
                }
                if asset.is_empty() {
                    return Err(MutationError::InvalidStructure(
                        "Asset reference needs an assetId or a url".to_string(),
                    ));
                }
                Ok(())
            }

            Mutation::ApplyPlacementIntents { intents } => {
                for intent in intents {
                    if intent.asset_id.is_empty() {
                        return Err(MutationError::InvalidIntent(format!(
                            "missing asset id for slot {}",
                            intent.slot_id
                        )));
                    }
                    if let Some(opacity) = intent.opacity {
                        if !(0.0..=1.0).contains(&opacity) {
                            return Err(MutationError::InvalidIntent(format!(
                                "opacity {} out of range for slot {}",
                                opacity, intent.slot_id
                            )));
                        }
                    }

                    let target_id = find_slot(root, &intent.slot_id)
                        .ok_or_else(|| MutationError::SlotNotFound(intent.slot_id.clone()))?;
                    let node = find(root, &target_id)?;
                    if node.node_type() != NodeType::Placeholder {
                        return Err(MutationError::UnsupportedNodeType {
                            node_id: target_id,
                            node_type: node.node_type(),
                        });
                    }
                }
                Ok(())
            }

            Mutation::SetText { node_id, .. } => match find(root, node_id)?.kind {
                NodeKind::Text { .. } => Ok(()),
                _ => Err(MutationError::NotText),
            },

            Mutation::UpdateProps { node_id, .. } => {
                let node = find(root, node_id)?;
                match node.node_type() {
                    NodeType::Component => Ok(()),
                    node_type => Err(MutationError::UnsupportedNodeType {
                        node_id: node_id.clone(),
                        node_type,
                    }),
                }
            }
        }
    }
}

fn find<'a>(root: &'a RootNode, node_id: &str) -> Result<&'a SceneNode, MutationError> {
    root.find_node(node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))
}

fn find_mut<'a>(root: &'a mut RootNode, node_id: &str) -> Result<&'a mut SceneNode, MutationError> {
    root.find_node_mut(node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))
}

/// Id of the placeholder filling `slot_id`: first placeholder (pre-order)
/// with that slot id, else a node whose own id is `slot_id`.
pub fn find_slot(root: &RootNode, slot_id: &str) -> Option<String> {
    let mut found: Option<&SceneNode> = None;
    root.walk(&mut |node| {
        if found.is_none() {
            if let NodeKind::Placeholder { slot_id: id, .. } = &node.kind {
                if id == slot_id {
                    found = Some(node);
                }
            }
        }
    });

    found
        .or_else(|| root.find_node(slot_id))
        .map(|node| node.id.clone())
}

/// Check an id-only reference against the resolver and pick up its alt
/// text. The url is never stored: it is resolved again at render time.
pub fn resolve_binding(asset: &AssetRef, resolver: &dyn AssetResolver) -> AssetRef {
    let mut bound = asset.clone();
    if bound.url.is_some() {
        return bound;
    }
    let Some(asset_id) = bound.asset_id.as_deref() else {
        return bound;
    };

    match resolver.resolve(asset_id) {
        Some(resolved) => {
            if bound.alt.is_none() {
                bound.alt = resolved.alt;
            }
        }
        None => warn!(asset_id = %asset_id, "Asset id could not be resolved at bind time"),
    }
    bound
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,
}
