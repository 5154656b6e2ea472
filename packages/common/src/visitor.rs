use scenecraft_model::*;
use std::collections::BTreeMap;

/// Visitor pattern for traversing the scene tree immutably
///
/// This trait provides default implementations that walk the entire tree
/// pre-order. Override specific visit_* methods to act on nodes.
pub trait Visitor: Sized {
    fn visit_root(&mut self, root: &RootNode) {
        walk_root(self, root);
    }

    fn visit_node(&mut self, node: &SceneNode) {
        walk_node(self, node);
    }

    fn visit_asset(&mut self, _node: &SceneNode, _asset: &AssetRef) {
        // Leaf, no children to walk
    }

    fn visit_slot(&mut self, _node: &SceneNode, _slot_id: &str, _current: Option<&AssetRef>) {
        // Leaf, no children to walk
    }

    fn visit_component_ref(
        &mut self,
        _node: &SceneNode,
        _component_id: &str,
        _props: &BTreeMap<String, serde_json::Value>,
    ) {
        // Leaf, no children to walk
    }
}

pub fn walk_root<V: Visitor>(visitor: &mut V, root: &RootNode) {
    for child in &root.children {
        visitor.visit_node(child);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &SceneNode) {
    match &node.kind {
        NodeKind::Container { children, .. }
        | NodeKind::Frame { children }
        | NodeKind::Group { children } => {
            for child in children {
                visitor.visit_node(child);
            }
        }
        NodeKind::Image { asset, .. } | NodeKind::Video { asset, .. } => {
            visitor.visit_asset(node, asset);
        }
        NodeKind::Placeholder {
            slot_id,
            current_asset,
            ..
        } => {
            visitor.visit_slot(node, slot_id, current_asset.as_ref());
        }
        NodeKind::Component {
            component_id,
            props,
        } => {
            visitor.visit_component_ref(node, component_id, props);
        }
        NodeKind::Text { .. } | NodeKind::Shape { .. } => {}
    }
}

/// Distinct asset ids referenced by media nodes (sorted)
pub fn referenced_asset_ids(root: &RootNode) -> Vec<String> {
    #[derive(Default)]
    struct Collector(std::collections::BTreeSet<String>);

    impl Visitor for Collector {
        fn visit_asset(&mut self, _node: &SceneNode, asset: &AssetRef) {
            if let Some(id) = &asset.asset_id {
                self.0.insert(id.clone());
            }
        }
    }

    let mut collector = Collector::default();
    collector.visit_root(root);
    collector.0.into_iter().collect()
}
