//! # Node Factory
//!
//! The only place nodes are born. Every node gets a fresh id from the
//! document's [`IDGenerator`], a layout at the origin with a size that
//! suits its type, an empty style, and type-specific defaults.

use serde_json::Value;

use crate::ast::*;
use crate::error::{ModelError, ModelResult};
use crate::id_generator::IDGenerator;

/// Fields a caller may never set through overrides
const RESERVED_FIELDS: [&str; 2] = ["id", "type"];

#[derive(Debug, Clone)]
pub struct NodeFactory {
    ids: IDGenerator,
}

impl NodeFactory {
    pub fn new(document_name: &str) -> Self {
        Self {
            ids: IDGenerator::new(document_name),
        }
    }

    pub fn from_generator(ids: IDGenerator) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &IDGenerator {
        &self.ids
    }

    /// Make sure ids already present in `root` are never minted again
    pub fn observe_tree(&mut self, root: &RootNode) {
        let ids = &mut self.ids;
        root.walk(&mut |node| ids.observe(&node.id));
    }

    /// Create a node with all defaults
    pub fn create(&mut self, node_type: NodeType) -> SceneNode {
        let id = self.ids.new_id();
        let (width, height) = default_size(node_type);

        let kind = match node_type {
            NodeType::Container => NodeKind::Container {
                tag: None,
                children: Vec::new(),
            },
            NodeType::Frame => NodeKind::Frame {
                children: Vec::new(),
            },
            NodeType::Group => NodeKind::Group {
                children: Vec::new(),
            },
            NodeType::Text => NodeKind::Text {
                content: "Text".to_string(),
            },
            NodeType::Image => NodeKind::Image {
                asset: AssetRef::default(),
                object_fit: ObjectFit::Cover,
            },
            NodeType::Video => NodeKind::Video {
                asset: AssetRef::default(),
                object_fit: ObjectFit::Cover,
                autoplay: false,
                looped: false,
                muted: false,
                controls: true,
            },
            NodeType::Shape => NodeKind::Shape {
                shape_type: ShapeType::Rectangle,
                fill: Some("#d1d5db".to_string()),
                stroke: None,
                stroke_width: 0.0,
            },
            NodeType::Placeholder => NodeKind::Placeholder {
                slot_id: id.clone(),
                current_asset: None,
                fit: ObjectFit::Cover,
                position: Anchor::Center,
            },
            NodeType::Component => NodeKind::Component {
                component_id: String::new(),
                props: Default::default(),
            },
        };

        SceneNode {
            id,
            layout: Layout::sized(width, height),
            style: Style::default(),
            kind,
        }
    }

    /// Create a node and deep-merge a JSON object of overrides over its defaults
    ///
    /// ```rust,ignore
    /// let title = factory.create_with(NodeType::Text, &json!({
    ///     "content": "Hello",
    ///     "layout": { "x": 10, "y": 10, "width": 780, "height": 40 }
    /// }))?;
    /// ```
    pub fn create_with(&mut self, node_type: NodeType, overrides: &Value) -> ModelResult<SceneNode> {
        let Value::Object(fields) = overrides else {
            return Err(ModelError::InvalidOverrides(
                "overrides must be a JSON object".to_string(),
            ));
        };

        if let Some(field) = RESERVED_FIELDS.iter().find(|f| fields.contains_key(**f)) {
            return Err(ModelError::ReservedField(field.to_string()));
        }

        let base = self.create(node_type);
        let mut value = serde_json::to_value(&base)
            .map_err(|e| ModelError::InvalidOverrides(e.to_string()))?;
        merge_json(&mut value, overrides);

        let node: SceneNode = serde_json::from_value(value)
            .map_err(|e| ModelError::InvalidOverrides(e.to_string()))?;
        node.validate()?;

        Ok(node)
    }

    /// String-tagged entry point for callers that only know the type name
    pub fn create_named(&mut self, node_type: &str, overrides: &Value) -> ModelResult<SceneNode> {
        let node_type: NodeType = node_type.parse()?;
        if overrides.is_null() {
            return Ok(self.create(node_type));
        }
        self.create_with(node_type, overrides)
    }
}

fn default_size(node_type: NodeType) -> (f64, f64) {
    match node_type {
        NodeType::Container | NodeType::Frame => (400.0, 300.0),
        NodeType::Group => (200.0, 200.0),
        NodeType::Text => (200.0, 40.0),
        NodeType::Image | NodeType::Video | NodeType::Placeholder => (320.0, 180.0),
        NodeType::Shape => (100.0, 100.0),
        NodeType::Component => (240.0, 160.0),
    }
}

/// Objects merge key by key; everything else is replaced
fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_type_gets_defaults() {
        let mut factory = NodeFactory::new("test");

        for node_type in NodeType::ALL {
            let node = factory.create(node_type);
            assert_eq!(node.node_type(), node_type);
            assert_eq!(node.layout.x, 0.0);
            assert!(node.layout.width > 0.0);
            assert_eq!(node.style, Style::default());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut factory = NodeFactory::new("test");
        let a = factory.create(NodeType::Text);
        let b = factory.create(NodeType::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_with_overrides() {
        let mut factory = NodeFactory::new("test");
        let node = factory
            .create_with(
                NodeType::Text,
                &json!({
                    "content": "Hello",
                    "layout": { "x": 10, "y": 10, "width": 780 },
                    "style": { "opacity": 0.5 }
                }),
            )
            .unwrap();

        assert_eq!(node.layout, Layout::new(10.0, 10.0, 780.0, 40.0));
        assert_eq!(node.style.opacity, Some(0.5));
        match node.kind {
            NodeKind::Text { content } => assert_eq!(content, "Hello"),
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_overrides_rejected() {
        let mut factory = NodeFactory::new("test");

        assert!(matches!(
            factory.create_with(NodeType::Text, &json!("nope")),
            Err(ModelError::InvalidOverrides(_))
        ));
        assert!(matches!(
            factory.create_with(NodeType::Text, &json!({ "content": 42 })),
            Err(ModelError::InvalidOverrides(_))
        ));
        assert_eq!(
            factory.create_with(NodeType::Text, &json!({ "id": "mine" })),
            Err(ModelError::ReservedField("id".to_string()))
        );
        assert!(matches!(
            factory.create_with(NodeType::Image, &json!({ "layout": { "height": -4 } })),
            Err(ModelError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn test_unknown_type_name() {
        let mut factory = NodeFactory::new("test");
        assert_eq!(
            factory.create_named("hologram", &Value::Null),
            Err(ModelError::UnknownNodeType("hologram".to_string()))
        );
        assert!(factory.create_named("video", &Value::Null).is_ok());
    }
}
