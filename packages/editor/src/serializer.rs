//! On-disk form of a scene: `{ "root": ..., "version": n }`.

use scenecraft_model::RootNode;
use serde::{Deserialize, Serialize};

use crate::errors::EditorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    pub root: RootNode,
    pub version: u64,
}

impl SceneFile {
    pub fn new(root: RootNode, version: u64) -> Self {
        Self { root, version }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a complete scene. Nothing is returned unless the
    /// whole file is usable.
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        let file: SceneFile = serde_json::from_str(source)?;
        file.root.validate().map_err(EditorError::InvalidScene)?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecraft_model::{Layout, NodeFactory, NodeType};

    #[test]
    fn test_round_trip_is_exact() {
        let mut factory = NodeFactory::new("serializer");
        let mut root = RootNode::new(800.0, 600.0).with_background("#111111");
        let mut frame = factory.create(NodeType::Frame);
        frame.children_mut().unwrap().push(factory.create(NodeType::Placeholder));
        root.children.push(frame);
        root.children.push(factory.create(NodeType::Video));

        let file = SceneFile::new(root, 12);
        let parsed = SceneFile::from_json(&file.to_json().unwrap()).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_round_trip_keeps_every_float_bit() {
        let mut factory = NodeFactory::new("floats");
        let mut root = RootNode::new(1280.0000000000002, 720.3333333333334);
        let values = [
            985.6906946328695,
            0.1 + 0.2,
            1e-7,
            123456.789012345,
            std::f64::consts::PI,
            5e-324,
            1.7976931348623157e308,
        ];
        for (i, value) in values.iter().enumerate() {
            let mut shape = factory.create(NodeType::Shape);
            shape.layout = Layout::new(*value, i as f64 / 3.0, value.abs() + 1.0, 2.0 / 3.0);
            shape.layout.rotation = value / 7.0;
            shape.style.opacity = Some(1.0 / (i as f64 + 3.0));
            root.children.push(shape);
        }

        let file = SceneFile::new(root, 3);
        let parsed = SceneFile::from_json(&file.to_json().unwrap()).unwrap();
        for (a, b) in parsed.root.children.iter().zip(&file.root.children) {
            assert_eq!(a.layout.x.to_bits(), b.layout.x.to_bits());
            assert_eq!(a.layout.rotation.to_bits(), b.layout.rotation.to_bits());
        }
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_rejects_missing_version() {
        let source = r#"{ "root": { "canvas": { "width": 10, "height": 10 }, "children": [] } }"#;
        assert!(matches!(
            SceneFile::from_json(source),
            Err(EditorError::Serialization(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_variant() {
        let source = r#"{ "root": { "canvas": { "width": 10, "height": 10 },
            "children": [ { "id": "a", "type": "hologram" } ] }, "version": 1 }"#;
        assert!(matches!(
            SceneFile::from_json(source),
            Err(EditorError::Serialization(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let source = r#"{ "root": { "canvas": { "width": 10, "height": 10 },
            "children": [
                { "id": "a", "type": "text", "content": "x" },
                { "id": "a", "type": "text", "content": "y" }
            ] }, "version": 1 }"#;
        assert!(matches!(
            SceneFile::from_json(source),
            Err(EditorError::InvalidScene(_))
        ));
    }
}
