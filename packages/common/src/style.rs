//! Layout/style → declaration list, shared by every output target.
//!
//! Both the markup and the component-source compilers call into here, so
//! positioning and sizing can only differ in syntax between targets.
//! Declarations come out in a fixed order; the same node always yields
//! the same list.

use scenecraft_model::{Canvas, NodeKind, SceneNode, ShapeType};

/// Ordered CSS declarations (kebab-case property names)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDeclarations {
    entries: Vec<(&'static str, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, keeping its original slot if already present
    pub fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    fn set_opt(&mut self, property: &'static str, value: Option<String>) {
        if let Some(value) = value {
            self.set(property, value);
        }
    }

    /// Set only when the property is absent
    pub fn set_default(&mut self, property: &'static str, value: impl Into<String>) {
        if self.get(property).is_none() {
            self.set(property, value);
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(name, value)| (*name, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `prop: value; prop: value;`
    pub fn to_css_string(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Deterministic number formatting (integers print without decimals)
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

pub fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// `background-color` → `backgroundColor`
pub fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn background_image(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with("url(") || trimmed.contains("gradient(") || trimmed == "none" {
        trimmed.to_string()
    } else {
        format!("url('{}')", trimmed.replace('\'', "%27"))
    }
}

/// Style of the canvas wrapper element
pub fn root_style(canvas: &Canvas) -> StyleDeclarations {
    let mut decls = StyleDeclarations::new();
    decls.set("position", "relative");
    decls.set("width", px(canvas.width));
    decls.set("height", px(canvas.height));
    decls.set("background-color", canvas.background_color.clone());
    decls.set("overflow", "hidden");
    decls
}

/// Layout, style and variant presentation hints for one node
pub fn compute_style(node: &SceneNode) -> StyleDeclarations {
    let layout = &node.layout;
    let style = &node.style;
    let mut decls = StyleDeclarations::new();

    decls.set("position", "absolute");
    decls.set("left", px(layout.x));
    decls.set("top", px(layout.y));
    decls.set("width", px(layout.width));
    decls.set("height", px(layout.height));

    if layout.has_transform() {
        let mut transform = Vec::new();
        if layout.rotation != 0.0 {
            transform.push(format!("rotate({}deg)", format_number(layout.rotation)));
        }
        if layout.scale_x != 1.0 || layout.scale_y != 1.0 {
            transform.push(format!(
                "scale({}, {})",
                format_number(layout.scale_x),
                format_number(layout.scale_y)
            ));
        }
        decls.set("transform", transform.join(" "));
    }

    decls.set_opt("background-color", style.background_color.clone());
    decls.set_opt(
        "background-image",
        style.background_image.as_deref().map(background_image),
    );
    decls.set_opt("background-size", style.background_size.clone());
    decls.set_opt("border-width", style.border.width.map(px));
    decls.set_opt("border-style", style.border.style.clone());
    decls.set_opt("border-color", style.border.color.clone());
    decls.set_opt("border-radius", style.border.radius.map(px));
    decls.set_opt("opacity", style.opacity.map(format_number));
    decls.set_opt("box-shadow", style.box_shadow.clone());
    decls.set_opt("filter", style.filter.clone());
    decls.set_opt("backdrop-filter", style.backdrop_filter.clone());
    decls.set_opt("overflow", style.overflow.clone());
    decls.set_opt("z-index", style.z_index.map(|z| z.to_string()));

    match &node.kind {
        NodeKind::Container { .. } | NodeKind::Group { .. } | NodeKind::Component { .. } => {}
        NodeKind::Frame { .. } => decls.set_default("overflow", "hidden"),
        NodeKind::Text { .. } => decls.set("white-space", "pre-wrap"),
        NodeKind::Image { object_fit, .. } | NodeKind::Video { object_fit, .. } => {
            decls.set("object-fit", object_fit.as_css());
        }
        NodeKind::Shape {
            shape_type,
            fill,
            stroke,
            stroke_width,
        } => {
            decls.set_opt("background-color", fill.clone());
            if let Some(stroke) = stroke {
                if *stroke_width > 0.0 {
                    decls.set("border-width", px(*stroke_width));
                    decls.set("border-style", "solid");
                    decls.set("border-color", stroke.clone());
                }
            }
            if *shape_type == ShapeType::Rectangle {
                decls.set("box-sizing", "border-box");
            }
        }
        NodeKind::Placeholder { fit, position, .. } => {
            decls.set("object-fit", fit.as_css());
            decls.set("object-position", position.as_css());
        }
    }

    decls
}

/// Extra declarations for the dashed box drawn where content is missing
pub fn apply_placeholder_style(decls: &mut StyleDeclarations) {
    decls.set("border-width", "2px");
    decls.set("border-style", "dashed");
    decls.set("border-color", "#9ca3af");
    decls.set("box-sizing", "border-box");
    decls.set("display", "flex");
    decls.set("align-items", "center");
    decls.set("justify-content", "center");
    decls.set("color", "#6b7280");
    decls.set("font-size", "12px");
}
