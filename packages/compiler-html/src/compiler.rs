use scenecraft_common::{
    apply_placeholder_style, compute_style, container_tag, resolve_asset_url, root_style,
    AssetResolver, StyleDeclarations,
};
use scenecraft_model::*;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Options for HTML compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Wrap the scene in `<!DOCTYPE html>` + head/body
    pub full_document: bool,
    /// `<title>` of the full document
    pub title: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            full_document: false,
            title: "Scene".to_string(),
        }
    }
}

struct Context<'a> {
    options: CompileOptions,
    resolver: &'a dyn AssetResolver,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: CompileOptions, resolver: &'a dyn AssetResolver) -> Self {
        Self {
            options,
            resolver,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile a scene tree to static HTML.
///
/// Never fails: unresolvable assets and unsupported shapes degrade to
/// placeholders so one broken node cannot take down the whole render.
#[instrument(skip_all, fields(nodes = root.node_count()))]
pub fn compile_to_html(
    root: &RootNode,
    resolver: &dyn AssetResolver,
    options: CompileOptions,
) -> String {
    let mut ctx = Context::new(options, resolver);

    if ctx.options.full_document {
        ctx.add_line("<!DOCTYPE html>");
        ctx.add_line("<html>");
        ctx.indent();
        compile_head(&mut ctx);
        ctx.add_line("<body>");
        ctx.indent();
    }

    compile_root(root, &mut ctx);

    if ctx.options.full_document {
        ctx.dedent();
        ctx.add_line("</body>");
        ctx.dedent();
        ctx.add_line("</html>");
    }

    ctx.get_output()
}

fn compile_head(ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    let title = format!("<title>{}</title>", escape_html(&ctx.options.title));
    ctx.add_line(&title);
    ctx.add_line("<style>body { margin: 0; }</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}

fn compile_root(root: &RootNode, ctx: &mut Context) {
    let open = format!(
        "{}>",
        open_tag("div", ROOT_ID, "root", &[], &root_style(&root.canvas))
    );
    if root.children.is_empty() {
        ctx.add_line(&format!("{}</div>", open));
        return;
    }

    ctx.add_line(&open);
    ctx.indent();
    for child in &root.children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line("</div>");
}

fn compile_node(node: &SceneNode, ctx: &mut Context) {
    let style = compute_style(node);

    match &node.kind {
        NodeKind::Container { tag, children } => {
            compile_wrapper(container_tag(tag.as_deref()), node, &style, children, ctx);
        }
        NodeKind::Frame { children } | NodeKind::Group { children } => {
            compile_wrapper("div", node, &style, children, ctx);
        }
        NodeKind::Text { content } => {
            let open = node_tag("div", node, &[], &style);
            ctx.add_line(&format!("{}{}</div>", open, escape_html(content)));
        }
        NodeKind::Image { asset, .. } => match resolve_asset_url(asset, ctx.resolver) {
            Some(src) => {
                let mut attrs = vec![("src", src)];
                attrs.push(("alt", alt_text(asset, ctx.resolver)));
                ctx.add_line(&format!("{} />", node_open("img", node, &attrs, &style)));
            }
            None => compile_missing_asset(node, asset, style, ctx),
        },
        NodeKind::Video {
            asset,
            autoplay,
            looped,
            muted,
            controls,
            ..
        } => match resolve_asset_url(asset, ctx.resolver) {
            Some(src) => {
                let mut open = node_open("video", node, &[("src", src)], &style);
                for (flag, name) in [
                    (*autoplay, "autoplay"),
                    (*looped, "loop"),
                    (*muted, "muted"),
                    (*controls, "controls"),
                ] {
                    if flag {
                        open.push(' ');
                        open.push_str(name);
                    }
                }
                open.push_str(" playsinline>");
                ctx.add_line(&format!("{}</video>", open));
            }
            None => compile_missing_asset(node, asset, style, ctx),
        },
        NodeKind::Shape { shape_type, .. } => match shape_type {
            ShapeType::Rectangle => {
                ctx.add_line(&format!("{}</div>", node_tag("div", node, &[], &style)));
            }
            ShapeType::Ellipse
            | ShapeType::Line
            | ShapeType::Triangle
            | ShapeType::Polygon
            | ShapeType::Star => {
                ctx.add_line(&format!(
                    "<!-- shape:{} node:{} -->",
                    shape_type.as_str(),
                    comment_safe(&node.id)
                ));
                // The comment may mangle the id; the marker keeps it addressable
                ctx.add_line(&format!("{} hidden></div>", node_open("div", node, &[], &style)));
            }
        },
        NodeKind::Placeholder {
            slot_id,
            current_asset,
            ..
        } => {
            let src = current_asset
                .as_ref()
                .and_then(|asset| resolve_asset_url(asset, ctx.resolver));
            match (src, current_asset) {
                (Some(src), Some(asset)) => {
                    let attrs = [
                        ("data-slot-id", slot_id.clone()),
                        ("src", src),
                        ("alt", alt_text(asset, ctx.resolver)),
                    ];
                    ctx.add_line(&format!("{} />", node_open("img", node, &attrs, &style)));
                }
                _ => {
                    if current_asset.is_some() {
                        warn!(node_id = %node.id, slot_id = %slot_id, "Slot asset could not be resolved");
                    }
                    let mut style = style;
                    apply_placeholder_style(&mut style);
                    let open = node_tag("div", node, &[("data-slot-id", slot_id.clone())], &style);
                    ctx.add_line(&format!("{}{}</div>", open, escape_html(slot_id)));
                }
            }
        }
        NodeKind::Component { component_id, .. } => {
            let mut style = style;
            apply_placeholder_style(&mut style);
            let open = node_tag(
                "div",
                node,
                &[("data-component-id", component_id.clone())],
                &style,
            );
            ctx.add_line(&open);
            ctx.indent();
            ctx.add_line(&format!(
                "<!-- component:{} node:{} -->",
                comment_safe(component_id),
                comment_safe(&node.id)
            ));
            ctx.add_line(&escape_html(component_id));
            ctx.dedent();
            ctx.add_line("</div>");
        }
    }
}

fn compile_wrapper(
    tag: &str,
    node: &SceneNode,
    style: &StyleDeclarations,
    children: &[SceneNode],
    ctx: &mut Context,
) {
    let open = node_tag(tag, node, &[], style);
    if children.is_empty() {
        ctx.add_line(&format!("{}</{}>", open, tag));
        return;
    }

    ctx.add_line(&open);
    ctx.indent();
    for child in children {
        compile_node(child, ctx);
    }
    ctx.dedent();
    ctx.add_line(&format!("</{}>", tag));
}

fn compile_missing_asset(
    node: &SceneNode,
    asset: &AssetRef,
    mut style: StyleDeclarations,
    ctx: &mut Context,
) {
    warn!(node_id = %node.id, asset_id = ?asset.asset_id, "Media asset could not be resolved");
    apply_placeholder_style(&mut style);
    let missing = asset.asset_id.clone().unwrap_or_default();
    let open = node_tag("div", node, &[("data-missing-asset", missing)], &style);
    ctx.add_line(&format!("{}Missing asset</div>", open));
}

fn alt_text(asset: &AssetRef, resolver: &dyn AssetResolver) -> String {
    asset
        .alt
        .clone()
        .or_else(|| {
            asset
                .asset_id
                .as_deref()
                .and_then(|id| resolver.resolve(id))
                .and_then(|resolved| resolved.alt)
        })
        .unwrap_or_default()
}

/// `<tag data-node-id=.. data-node-type=.. attrs.. style="..">`
fn node_tag(
    tag: &str,
    node: &SceneNode,
    attrs: &[(&str, String)],
    style: &StyleDeclarations,
) -> String {
    format!("{}>", node_open(tag, node, attrs, style))
}

/// Like [`node_tag`] but leaves the tag open for void elements and flags
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
        "<{} data-node-id=\"{}\" data-node-type=\"{}\"",
        tag,
        escape_html(id),
        node_type
    );
    for (name, value) in attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
    }
    if !style.is_empty() {
        out.push_str(&format!(" style=\"{}\"", escape_html(&style.to_css_string())));
    }
    out
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `--` would end an HTML comment early
fn comment_safe(text: &str) -> String {
    text.replace("--", "- -").replace('>', "&gt;")
}

