use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Reserved id the root node answers to
pub const ROOT_ID: &str = "root";

/// Default canvas background
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Root of a scene: canvas metadata plus top-level nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNode {
    pub canvas: Canvas,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

/// Canvas dimensions and backdrop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_background")]
    pub background_color: String,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

/// A single visual node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub style: Style,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Variant-specific node payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Generic box, optionally rendered with a host tag (section, header, ...)
    Container {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
        #[serde(default)]
        children: Vec<SceneNode>,
    },

    /// Artboard-like clipping container
    Frame {
        #[serde(default)]
        children: Vec<SceneNode>,
    },

    /// Logical grouping
    Group {
        #[serde(default)]
        children: Vec<SceneNode>,
    },

    /// Text run
    Text {
        #[serde(default)]
        content: String,
    },

    /// Still image
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        asset: AssetRef,
        #[serde(default)]
        object_fit: ObjectFit,
    },

    /// Video clip
    #[serde(rename_all = "camelCase")]
    Video {
        #[serde(default)]
        asset: AssetRef,
        #[serde(default)]
        object_fit: ObjectFit,
        #[serde(default)]
        autoplay: bool,
        #[serde(default, rename = "loop")]
        looped: bool,
        #[serde(default)]
        muted: bool,
        #[serde(default)]
        controls: bool,
    },

    /// Vector shape
    #[serde(rename_all = "camelCase")]
    Shape {
        #[serde(default)]
        shape_type: ShapeType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stroke: Option<String>,
        #[serde(default)]
        stroke_width: f64,
    },

    /// Fill-in-the-blank slot bound to an asset later
    #[serde(rename = "placeholder-slot", rename_all = "camelCase")]
    Placeholder {
        slot_id: String,
        #[serde(default)]
        current_asset: Option<AssetRef>,
        #[serde(default)]
        fit: ObjectFit,
        #[serde(default)]
        position: Anchor,
    },

    /// Reference to a registered component
    #[serde(rename = "embedded-component", rename_all = "camelCase")]
    Component {
        component_id: String,
        #[serde(default)]
        props: BTreeMap<String, serde_json::Value>,
    },
}

/// Field-less discriminant of [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Container,
    Frame,
    Group,
    Text,
    Image,
    Video,
    Shape,
    #[serde(rename = "placeholder-slot")]
    Placeholder,
    #[serde(rename = "embedded-component")]
    Component,
}

impl NodeType {
    pub const ALL: [NodeType; 9] = [
        NodeType::Container,
        NodeType::Frame,
        NodeType::Group,
        NodeType::Text,
        NodeType::Image,
        NodeType::Video,
        NodeType::Shape,
        NodeType::Placeholder,
        NodeType::Component,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Container => "container",
            NodeType::Frame => "frame",
            NodeType::Group => "group",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::Video => "video",
            NodeType::Shape => "shape",
            NodeType::Placeholder => "placeholder-slot",
            NodeType::Component => "embedded-component",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Container | NodeType::Frame | NodeType::Group)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(NodeType::Container),
            "frame" => Ok(NodeType::Frame),
            "group" => Ok(NodeType::Group),
            "text" => Ok(NodeType::Text),
            "image" => Ok(NodeType::Image),
            "video" => Ok(NodeType::Video),
            "shape" => Ok(NodeType::Shape),
            "placeholder-slot" | "placeholder" | "slot" => Ok(NodeType::Placeholder),
            "embedded-component" | "component" => Ok(NodeType::Component),
            other => Err(ModelError::UnknownNodeType(other.to_string())),
        }
    }
}

/// Position, size and transform of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Layout {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Default::default()
        }
    }

    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn has_transform(&self) -> bool {
        self.rotation != 0.0 || self.scale_x != 1.0 || self.scale_y != 1.0
    }

    pub fn validate(&self, id: &str) -> ModelResult<()> {
        let fields = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
            ("scaleX", self.scale_x),
            ("scaleY", self.scale_y),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ModelError::invalid_layout(id, format!("{} is not finite", name)));
            }
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ModelError::invalid_layout(
                id,
                format!("negative size {}x{}", self.width, self.height),
            ));
        }
        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Partial layout, shallow-merged by `update_layout`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub scale_x: Option<f64>,
    pub scale_y: Option<f64>,
}

impl LayoutPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    /// Returns the layout with every present field overwritten
    pub fn merged(&self, layout: &Layout) -> Layout {
        Layout {
            x: self.x.unwrap_or(layout.x),
            y: self.y.unwrap_or(layout.y),
            width: self.width.unwrap_or(layout.width),
            height: self.height.unwrap_or(layout.height),
            rotation: self.rotation.unwrap_or(layout.rotation),
            scale_x: self.scale_x.unwrap_or(layout.scale_x),
            scale_y: self.scale_y.unwrap_or(layout.scale_y),
        }
    }
}

/// Visual styling shared by every node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_size: Option<String>,
    #[serde(skip_serializing_if = "Border::is_empty")]
    pub border: Border,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Border {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

impl Border {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.color.is_none() && self.style.is_none() && self.radius.is_none()
    }
}

impl Style {
    /// Opacity within `0..=1`, border width and radius finite and non-negative
    pub fn validate(&self, id: &str) -> ModelResult<()> {
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ModelError::invalid_style(
                    id,
                    format!("opacity {} outside 0..=1", opacity),
                ));
            }
        }
        let border = [
            ("borderWidth", self.border.width),
            ("borderRadius", self.border.radius),
        ];
        for (name, value) in border {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ModelError::invalid_style(
                        id,
                        format!("{} must be a non-negative number, got {}", name, value),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Partial style, shallow-merged by `update_style`.
///
/// `border` replaces the whole border when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    pub background_color: Option<String>,
    pub background_image: Option<String>,
    pub background_size: Option<String>,
    pub border: Option<Border>,
    pub opacity: Option<f64>,
    pub box_shadow: Option<String>,
    pub filter: Option<String>,
    pub backdrop_filter: Option<String>,
    pub overflow: Option<String>,
    pub z_index: Option<i64>,
}

impl StylePatch {
    pub fn merge_into(&self, style: &mut Style) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        set(&mut style.background_color, &self.background_color);
        set(&mut style.background_image, &self.background_image);
        set(&mut style.background_size, &self.background_size);
        if let Some(border) = &self.border {
            style.border = border.clone();
        }
        set(&mut style.opacity, &self.opacity);
        set(&mut style.box_shadow, &self.box_shadow);
        set(&mut style.filter, &self.filter);
        set(&mut style.backdrop_filter, &self.backdrop_filter);
        set(&mut style.overflow, &self.overflow);
        set(&mut style.z_index, &self.z_index);
    }
}

/// Pointer to an asset, either by registry id or by literal url
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl AssetRef {
    pub fn from_id(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: Some(asset_id.into()),
            ..Default::default()
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.asset_id.is_none() && self.url.is_none()
    }
}

/// How media fills its box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
    ScaleDown,
    None,
}

impl ObjectFit {
    /// Maps a free-form hint onto the fit family; unrecognized hints mean `None`
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "cover" => ObjectFit::Cover,
            "contain" => ObjectFit::Contain,
            "fill" => ObjectFit::Fill,
            "scale-down" | "scale_down" | "scaledown" => ObjectFit::ScaleDown,
            _ => ObjectFit::None,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
            ObjectFit::Fill => "fill",
            ObjectFit::ScaleDown => "scale-down",
            ObjectFit::None => "none",
        }
    }
}

/// Anchor for positioned media
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    #[default]
    Center,
}

impl Anchor {
    /// Maps a free-form hint onto the anchor family; anything else is `Center`
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "top" => Anchor::Top,
            "bottom" => Anchor::Bottom,
            "left" => Anchor::Left,
            "right" => Anchor::Right,
            _ => Anchor::Center,
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Bottom => "bottom",
            Anchor::Left => "left",
            Anchor::Right => "right",
            Anchor::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Ellipse,
    Line,
    Triangle,
    Polygon,
    Star,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Line => "line",
            ShapeType::Triangle => "triangle",
            ShapeType::Polygon => "polygon",
            ShapeType::Star => "star",
        }
    }
}

impl SceneNode {
    pub fn node_type(&self) -> NodeType {
        match &self.kind {
            NodeKind::Container { .. } => NodeType::Container,
            NodeKind::Frame { .. } => NodeType::Frame,
            NodeKind::Group { .. } => NodeType::Group,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Image { .. } => NodeType::Image,
            NodeKind::Video { .. } => NodeType::Video,
            NodeKind::Shape { .. } => NodeType::Shape,
            NodeKind::Placeholder { .. } => NodeType::Placeholder,
            NodeKind::Component { .. } => NodeType::Component,
        }
    }

    pub fn children(&self) -> Option<&Vec<SceneNode>> {
        match &self.kind {
            NodeKind::Container { children, .. }
            | NodeKind::Frame { children }
            | NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<SceneNode>> {
        match &mut self.kind {
            NodeKind::Container { children, .. }
            | NodeKind::Frame { children }
            | NodeKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Find a node in this subtree (including self)
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children()?.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Pre-order walk over this subtree
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        f(self);
        if let Some(children) = self.children() {
            for child in children {
                child.walk(f);
            }
        }
    }

    /// Ids of this node and all descendants, pre-order
    pub fn subtree_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id.clone()));
        ids
    }

    /// Layout, style and variant values of this node alone
    pub fn validate_fields(&self) -> ModelResult<()> {
        self.layout.validate(&self.id)?;
        self.style.validate(&self.id)?;
        if let NodeKind::Shape { stroke_width, .. } = &self.kind {
            if !stroke_width.is_finite() || *stroke_width < 0.0 {
                return Err(ModelError::invalid_style(
                    &self.id,
                    format!("strokeWidth must be a non-negative number, got {}", stroke_width),
                ));
            }
        }
        Ok(())
    }

    /// Check this subtree: unique ids, valid layouts and styles
    pub fn validate(&self) -> ModelResult<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Ok(());
        self.walk(&mut |node| {
            if result.is_err() {
                return;
            }
            if node.id.is_empty() || node.id == ROOT_ID || !seen.insert(node.id.as_str()) {
                result = Err(ModelError::DuplicateId(node.id.clone()));
                return;
            }
            result = node.validate_fields();
        });
        result
    }

    fn remove_descendant(&mut self, id: &str) -> Option<SceneNode> {
        let children = self.children_mut()?;
        remove_from(children, id)
    }
}

fn remove_from(children: &mut Vec<SceneNode>, id: &str) -> Option<SceneNode> {
    if let Some(pos) = children.iter().position(|c| c.id == id) {
        return Some(children.remove(pos));
    }

    for child in children {
        if let Some(removed) = child.remove_descendant(id) {
            return Some(removed);
        }
    }

    None
}

fn find_parent<'a>(parent_id: &'a str, children: &'a [SceneNode], id: &str) -> Option<&'a str> {
    for child in children {
        if child.id == id {
            return Some(parent_id);
        }
        if let Some(grandchildren) = child.children() {
            if let Some(found) = find_parent(&child.id, grandchildren, id) {
                return Some(found);
            }
        }
    }
    None
}

impl RootNode {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            canvas: Canvas {
                width,
                height,
                background_color: default_background(),
            },
            children: Vec::new(),
        }
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.canvas.background_color = color.into();
        self
    }

    pub fn find_node(&self, id: &str) -> Option<&SceneNode> {
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut SceneNode> {
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Whether `id` names the root or a node in the tree
    pub fn contains(&self, id: &str) -> bool {
        id == ROOT_ID || self.find_node(id).is_some()
    }

    /// Child list of the root or of a container-capable node
    pub fn children_of_mut(&mut self, parent_id: &str) -> Option<&mut Vec<SceneNode>> {
        if parent_id == ROOT_ID {
            return Some(&mut self.children);
        }
        self.find_node_mut(parent_id)?.children_mut()
    }

    /// Whether the root or the node `id` can hold children
    pub fn accepts_children(&self, id: &str) -> bool {
        id == ROOT_ID
            || self
                .find_node(id)
                .map(|node| node.node_type().is_container())
                .unwrap_or(false)
    }

    /// Detach a node (with its subtree) and return it
    pub fn remove_node(&mut self, id: &str) -> Option<SceneNode> {
        remove_from(&mut self.children, id)
    }

    /// Id of the parent of `id`; top-level nodes report [`ROOT_ID`]
    pub fn parent_of(&self, id: &str) -> Option<&str> {
        find_parent(ROOT_ID, &self.children, id)
    }

    /// Whether `id` sits inside the subtree rooted at `ancestor_id`
    pub fn is_descendant(&self, ancestor_id: &str, id: &str) -> bool {
        if ancestor_id == ROOT_ID {
            return self.find_node(id).is_some();
        }
        match self.find_node(ancestor_id) {
            Some(ancestor) => ancestor.id != id && ancestor.find(id).is_some(),
            None => false,
        }
    }

    /// Pre-order walk over all nodes (the root itself is not visited)
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a SceneNode)) {
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn collect_ids(&self) -> Vec<String> {
        let mut ids = Vec::new();
        self.walk(&mut |node| ids.push(node.id.clone()));
        ids
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Check structural invariants: unique ids, valid layouts and styles,
    /// sane canvas
    pub fn validate(&self) -> ModelResult<()> {
        if !(self.canvas.width >= 0.0 && self.canvas.height >= 0.0)
            || !self.canvas.width.is_finite()
            || !self.canvas.height.is_finite()
        {
            return Err(ModelError::invalid_layout(
                ROOT_ID,
                format!("invalid canvas {}x{}", self.canvas.width, self.canvas.height),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(ROOT_ID);
        let mut result = Ok(());
        self.walk(&mut |node| {
            if result.is_err() {
                return;
            }
            if node.id.is_empty() || !seen.insert(node.id.as_str()) {
                result = Err(ModelError::DuplicateId(node.id.clone()));
                return;
            }
            result = node.validate_fields();
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str, content: &str) -> SceneNode {
        SceneNode {
            id: id.to_string(),
            layout: Layout::sized(100.0, 20.0),
            style: Style::default(),
            kind: NodeKind::Text {
                content: content.to_string(),
            },
        }
    }

    fn group(id: &str, children: Vec<SceneNode>) -> SceneNode {
        SceneNode {
            id: id.to_string(),
            layout: Layout::default(),
            style: Style::default(),
            kind: NodeKind::Group { children },
        }
    }

    fn sample_tree() -> RootNode {
        let mut root = RootNode::new(800.0, 600.0);
        root.children.push(group(
            "g1",
            vec![text("t1", "a"), group("g2", vec![text("t2", "b")])],
        ));
        root.children.push(text("t3", "c"));
        root
    }

    #[test]
    fn test_find_and_parent() {
        let root = sample_tree();
        assert!(root.find_node("t2").is_some());
        assert!(root.find_node("missing").is_none());
        assert_eq!(root.parent_of("t2"), Some("g2"));
        assert_eq!(root.parent_of("g1"), Some(ROOT_ID));
        assert!(root.contains(ROOT_ID));
    }

    #[test]
    fn test_remove_takes_subtree_only() {
        let mut root = sample_tree();
        let removed = root.remove_node("g2").unwrap();
        assert_eq!(removed.subtree_ids(), vec!["g2", "t2"]);
        assert_eq!(root.collect_ids(), vec!["g1", "t1", "t3"]);
    }

    #[test]
    fn test_is_descendant() {
        let root = sample_tree();
        assert!(root.is_descendant("g1", "t2"));
        assert!(!root.is_descendant("g2", "t1"));
        assert!(!root.is_descendant("g1", "g1"));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_negative_sizes() {
        let mut root = sample_tree();
        assert!(root.validate().is_ok());

        root.children.push(text("t1", "dup"));
        assert_eq!(root.validate(), Err(ModelError::DuplicateId("t1".to_string())));

        let mut root = sample_tree();
        root.find_node_mut("t3").unwrap().layout.width = -1.0;
        assert!(matches!(root.validate(), Err(ModelError::InvalidLayout { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_style_values() {
        for opacity in [f64::NAN, 7.5, -0.1] {
            let mut root = sample_tree();
            root.find_node_mut("t3").unwrap().style.opacity = Some(opacity);
            assert!(matches!(root.validate(), Err(ModelError::InvalidStyle { .. })));
        }

        let mut root = sample_tree();
        root.find_node_mut("t3").unwrap().style.border.radius = Some(-2.0);
        assert!(matches!(root.validate(), Err(ModelError::InvalidStyle { .. })));

        let mut root = sample_tree();
        root.find_node_mut("t3").unwrap().style.border.width = Some(f64::INFINITY);
        assert!(matches!(root.validate(), Err(ModelError::InvalidStyle { .. })));

        let mut root = sample_tree();
        let style = &mut root.find_node_mut("t3").unwrap().style;
        style.opacity = Some(1.0);
        style.border.width = Some(0.0);
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_stroke_width() {
        let mut shape = text("s", "");
        shape.kind = NodeKind::Shape {
            shape_type: ShapeType::Rectangle,
            fill: None,
            stroke: None,
            stroke_width: f64::NAN,
        };
        assert!(matches!(shape.validate(), Err(ModelError::InvalidStyle { .. })));

        let mut root = sample_tree();
        root.children.push(shape);
        assert!(matches!(root.validate(), Err(ModelError::InvalidStyle { .. })));
    }

    #[test]
    fn test_node_json_shape() {
        let node = SceneNode {
            id: "s1".to_string(),
            layout: Layout::default(),
            style: Style::default(),
            kind: NodeKind::Placeholder {
                slot_id: "hero".to_string(),
                current_asset: None,
                fit: ObjectFit::Cover,
                position: Anchor::Center,
            },
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "placeholder-slot");
        assert_eq!(json["slotId"], "hero");
        assert_eq!(json["layout"]["scaleX"], 1.0);

        let back: SceneNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_hint_mapping() {
        assert_eq!(ObjectFit::from_hint("Cover"), ObjectFit::Cover);
        assert_eq!(ObjectFit::from_hint("scale-down"), ObjectFit::ScaleDown);
        assert_eq!(ObjectFit::from_hint("stretch"), ObjectFit::None);
        assert_eq!(Anchor::from_hint("TOP"), Anchor::Top);
        assert_eq!(Anchor::from_hint("top-left"), Anchor::Center);
    }

    #[test]
    fn test_node_type_parsing() {
        assert_eq!("text".parse::<NodeType>(), Ok(NodeType::Text));
        assert_eq!("slot".parse::<NodeType>(), Ok(NodeType::Placeholder));
        assert_eq!(
            "sprite".parse::<NodeType>(),
            Err(ModelError::UnknownNodeType("sprite".to_string()))
        );
    }
}
