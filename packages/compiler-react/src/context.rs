use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Options for React compilation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Name of the default-exported component
    pub component_name: String,
    /// Module exporting the `assets` registry
    pub asset_module: String,
    /// Module exporting the `components` registry
    pub component_module: String,
    /// Whether to use TypeScript types
    pub use_typescript: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            component_name: "Scene".to_string(),
            asset_module: "./assets".to_string(),
            component_module: "./components".to_string(),
            use_typescript: false,
        }
    }
}

/// Compilation context for managing state during code generation
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    indent_level: Rc<RefCell<usize>>,
    pub options: CompileOptions,
    /// asset id → JS identifier
    pub assets: BTreeMap<String, String>,
    /// component id → JSX tag
    pub components: BTreeMap<String, String>,
}

impl CompilerContext {
    pub fn new(options: CompileOptions) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            indent_level: Rc::new(RefCell::new(0)),
            options,
            assets: BTreeMap::new(),
            components: BTreeMap::new(),
        }
    }

    /// Assign identifiers to the (sorted) asset and component ids
    pub fn declare<'a>(
        &mut self,
        asset_ids: impl IntoIterator<Item = &'a str>,
        component_ids: impl IntoIterator<Item = &'a str>,
    ) {
        let mut taken: HashSet<String> = ["React", "assets", "components", "slots"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        taken.insert(self.options.component_name.clone());

        for id in asset_ids {
            let ident = unique(format!("asset_{}", sanitize_identifier(id)), &mut taken);
            self.assets.insert(id.to_string(), ident);
        }
        for id in component_ids {
            let ident = unique(pascal_case(id), &mut taken);
            self.components.insert(id.to_string(), ident);
        }
    }

    pub fn asset_ident(&self, asset_id: &str) -> Option<&str> {
        self.assets.get(asset_id).map(String::as_str)
    }

    pub fn component_ident(&self, component_id: &str) -> Option<&str> {
        self.components.get(component_id).map(String::as_str)
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn add_line(&self, text: &str) {
        self.add_indented(text);
        self.add("\n");
    }

    pub fn add_indented(&self, text: &str) {
        let indent = "  ".repeat(*self.indent_level.borrow());
        self.buffer.borrow_mut().push_str(&indent);
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn indent(&self) {
        *self.indent_level.borrow_mut() += 1;
    }

    pub fn dedent(&self) {
        let mut level = self.indent_level.borrow_mut();
        if *level > 0 {
            *level -= 1;
        }
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }
}

fn unique(base: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Any id → valid JS identifier fragment (`hero-img` → `hero_img`)
pub fn sanitize_identifier(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// `pricing-card` → `PricingCard`
pub fn pascal_case(id: &str) -> String {
    let mut out = String::new();
    for part in id.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        return "Component".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'C');
    }
    out
}
