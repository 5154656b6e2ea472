use crate::context::{sanitize_identifier, CompileOptions, CompilerContext};
use scenecraft_common::{
    apply_placeholder_style, camel_case, compute_style, container_tag, referenced_asset_ids,
    root_style, StyleDeclarations, Visitor,
};
use scenecraft_model::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

/// Compile a scene tree to a React component module.
///
/// Unlike the HTML target, nothing is resolved here: assets and components
/// are looked up through registries when the module runs, and slots come
/// in as props.
#[instrument(skip_all, fields(nodes = root.node_count()))]
pub fn compile_to_react(root: &RootNode, options: CompileOptions) -> String {
    let mut ctx = CompilerContext::new(options);

    let asset_ids = referenced_asset_ids(root);
    let component_ids = referenced_component_ids(root);
    ctx.declare(
        asset_ids.iter().map(String::as_str),
        component_ids.iter().map(String::as_str),
    );

    compile_imports(&ctx);
    compile_declarations(&ctx);
    compile_component(root, &ctx);

    ctx.get_output()
}

/// Distinct embedded component ids (sorted)
fn referenced_component_ids(root: &RootNode) -> Vec<String> {
    #[derive(Default)]
    struct Collector(BTreeSet<String>);

    impl Visitor for Collector {
        fn visit_component_ref(
            &mut self,
            _node: &SceneNode,
            component_id: &str,
            _props: &BTreeMap<String, serde_json::Value>,
        ) {
            if !component_id.is_empty() {
                self.0.insert(component_id.to_string());
            }
        }
    }

    let mut collector = Collector::default();
    collector.visit_root(root);
    collector.0.into_iter().collect()
}

fn compile_imports(ctx: &CompilerContext) {
    ctx.add_line("import React from \"react\";");

    if !ctx.assets.is_empty() {
        ctx.add_line(&format!(
            "import {{ assets }} from {};",
            js_string(&ctx.options.asset_module)
        ));
    }
    if !ctx.components.is_empty() {
        ctx.add_line(&format!(
            "import {{ components }} from {};",
            js_string(&ctx.options.component_module)
        ));
    }

    ctx.add("\n");
}

fn compile_declarations(ctx: &CompilerContext) {
    for (id, ident) in &ctx.assets {
        ctx.add_line(&format!("const {} = assets.get({});", ident, js_string(id)));
    }
    for (id, ident) in &ctx.components {
        ctx.add_line(&format!("const {} = components.get({});", ident, js_string(id)));
    }
    if !ctx.assets.is_empty() || !ctx.components.is_empty() {
        ctx.add("\n");
    }
}

fn compile_component(root: &RootNode, ctx: &CompilerContext) {
    let name = &ctx.options.component_name;

    if ctx.options.use_typescript {
        ctx.add_line(&format!("export type {}Props = {{", name));
        ctx.indent();
        ctx.add_line("slots?: Record<string, { url: string; alt?: string } | undefined>;");
        ctx.dedent();
        ctx.add_line("};");
        ctx.add("\n");
        ctx.add_line(&format!(
            "export default function {}({{ slots = {{}} }}: {}Props) {{",
            name, name
        ));
    } else {
        ctx.add_line(&format!(
            "export default function {}({{ slots = {{}} }}) {{",
            name
        ));
    }
    ctx.indent();

    ctx.add_line("return (");
    ctx.indent();
    compile_root(root, ctx);
    ctx.dedent();
    ctx.add_line(");");

    ctx.dedent();
    ctx.add_line("}");
}

fn compile_root(root: &RootNode, ctx: &CompilerContext) {
    let open = open_tag("div", ROOT_ID, "root", &[], &root_style(&root.canvas));
    if root.children.is_empty() {
        ctx.add_line(&format!("{} />", open));
        return;
    }

    ctx.add_line(&format!("{}>", open));
    ctx.indent();
    for child in &root.children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line("</div>");
}

fn compile_node(node: &SceneNode, ctx: &CompilerContext) {
    let style = compute_style(node);

    match &node.kind {
        NodeKind::Container { tag, children } => {
            compile_wrapper(container_tag(tag.as_deref()), node, &style, children, ctx);
        }
        NodeKind::Frame { children } | NodeKind::Group { children } => {
            compile_wrapper("div", node, &style, children, ctx);
        }
        NodeKind::Text { content } => {
            let open = node_open("div", node, &[], &style);
            ctx.add_line(&format!("{}>{}</div>", open, jsx_text(content)));
        }
        NodeKind::Image { asset, .. } => match media_source(asset, ctx) {
            Some(src) => {
                let attrs = [("src", src), ("alt", alt_expr(asset, ctx))];
                ctx.add_line(&format!("{} />", node_open("img", node, &attrs, &style)));
            }
            None => compile_missing_asset(node, style, ctx),
        },
        NodeKind::Video {
            asset,
            autoplay,
            looped,
            muted,
            controls,
            ..
        } => match media_source(asset, ctx) {
            Some(src) => {
                let mut open = node_open("video", node, &[("src", src)], &style);
                for (flag, name) in [
                    (*autoplay, "autoPlay"),
                    (*looped, "loop"),
                    (*muted, "muted"),
                    (*controls, "controls"),
                ] {
                    if flag {
                        open.push(' ');
                        open.push_str(name);
                    }
                }
                ctx.add_line(&format!("{} playsInline />", open));
            }
            None => compile_missing_asset(node, style, ctx),
        },
        NodeKind::Shape { shape_type, .. } => match shape_type {
            ShapeType::Rectangle => {
                ctx.add_line(&format!("{} />", node_open("div", node, &[], &style)));
            }
            ShapeType::Ellipse
            | ShapeType::Line
            | ShapeType::Triangle
            | ShapeType::Polygon
            | ShapeType::Star => {
                ctx.add_line(&format!(
                    "{{/* shape:{} node:{} */}}",
                    shape_type.as_str(),
                    comment_safe(&node.id)
                ));
                ctx.add_line(&format!("{} hidden />", node_open("div", node, &[], &style)));
            }
        },
        NodeKind::Placeholder { slot_id, .. } => compile_slot(node, slot_id, style, ctx),
        NodeKind::Component {
            component_id,
            props,
        } => match ctx.component_ident(component_id) {
            Some(ident) => {
                let attrs = [("data-component-id", js_string(component_id))];
                let mut open = node_open(ident, node, &attrs, &style);
                if !props.is_empty() {
                    let props = serde_json::to_string(props).unwrap_or_else(|_| "{}".to_string());
                    open.push_str(&format!(" {{...{}}}", props));
                }
                ctx.add_line(&format!("{} />", open));
            }
            None => {
                let mut style = style;
                apply_placeholder_style(&mut style);
                let attrs = [("data-component-id", js_string(component_id))];
                let open = node_open("div", node, &attrs, &style);
                ctx.add_line(&format!("{}>Component</div>", open));
            }
        },
    }
}

fn compile_wrapper(
    tag: &str,
    node: &SceneNode,
    style: &StyleDeclarations,
    children: &[SceneNode],
    ctx: &CompilerContext,
) {
    let open = node_open(tag, node, &[], style);
    if children.is_empty() {
        ctx.add_line(&format!("{} />", open));
        return;
    }

    ctx.add_line(&format!("{}>", open));
    ctx.indent();
    for child in children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

/// `{slots.hero ? (<img .. />) : (<div ..>hero</div>)}`
fn compile_slot(node: &SceneNode, slot_id: &str, style: StyleDeclarations, ctx: &CompilerContext) {
    let slot = format!("slots.{}", sanitize_identifier(slot_id));
    let slot_attr = [("data-slot-id", js_string(slot_id))];

    ctx.add_line(&format!("{{{} ? (", slot));
    ctx.indent();
    let attrs = [
        slot_attr[0].clone(),
        ("src", format!("{{{}.url}}", slot)),
        ("alt", format!("{{{}.alt ?? \"\"}}", slot)),
    ];
    ctx.add_line(&format!("{} />", node_open("img", node, &attrs, &style)));
    ctx.dedent();
    ctx.add_line(") : (");
    ctx.indent();
    let mut placeholder = style;
    apply_placeholder_style(&mut placeholder);
    let open = node_open("div", node, &slot_attr, &placeholder);
    ctx.add_line(&format!("{}>{}</div>", open, jsx_text(slot_id)));
    ctx.dedent();
    ctx.add_line(")}");
}

fn compile_missing_asset(node: &SceneNode, mut style: StyleDeclarations, ctx: &CompilerContext) {
    apply_placeholder_style(&mut style);
    let open = node_open("div", node, &[("data-missing-asset", "\"\"".to_string())], &style);
    ctx.add_line(&format!("{}>Missing asset</div>", open));
}

/// `src` attribute value: registry lookup for ids, literal for bare urls
fn media_source(asset: &AssetRef, ctx: &CompilerContext) -> Option<String> {
    if let Some(ident) = asset.asset_id.as_deref().and_then(|id| ctx.asset_ident(id)) {
        return Some(format!("{{{}?.url}}", ident));
    }
    asset.url.as_deref().map(js_string)
}

fn alt_expr(asset: &AssetRef, ctx: &CompilerContext) -> String {
    let fallback = js_string(asset.alt.as_deref().unwrap_or(""));
    match asset.asset_id.as_deref().and_then(|id| ctx.asset_ident(id)) {
        Some(ident) => format!("{{{}?.alt ?? {}}}", ident, fallback),
        None => fallback,
    }
}

/// Opening tag without the closing `>` / `/>`. Attribute values are
/// already JSX (`"literal"` or `{expr}`).
fn node_open(
    tag: &str,
    node: &SceneNode,
    attrs: &[(&str, String)],
    style: &StyleDeclarations,
) -> String {
    open_tag(tag, &node.id, node.node_type().as_str(), attrs, style)
}

fn open_tag(
    tag: &str,
    id: &str,
    node_type: &str,
    attrs: &[(&str, String)],
    style: &StyleDeclarations,
) -> String {
    let mut out = format!(
        "<{} data-node-id={} data-node-type={}",
        tag,
        js_string(id),
        js_string(node_type)
    );
    for (name, value) in attrs {
        out.push_str(&format!(" {}={}", name, value));
    }
    if !style.is_empty() {
        out.push_str(&format!(" style={{{}}}", style_object(style)));
    }
    out
}

/// `{ position: "absolute", left: "10px" }`
fn style_object(style: &StyleDeclarations) -> String {
    let entries: Vec<String> = style
        .iter()
        .map(|(name, value)| format!("{}: {}", camel_case(name), js_string(value)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Escape text for a JSX child position. Multi-line text becomes a
/// string expression so line breaks survive.
pub fn jsx_text(text: &str) -> String {
    if text.contains('\n') {
        return format!("{{{}}}", js_string(text));
    }
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

