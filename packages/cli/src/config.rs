use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "scenecraft.config.json";

/// Scenecraft configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing `.scene.json` files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Asset manifest (`{ "id": "url" | { "url", "alt" } }`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,

    /// Output directory for rendered files
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    /// Output formats to emit
    #[serde(default = "default_emit")]
    pub emit: Vec<EmitTarget>,

    /// Component name for React output (defaults to the scene file name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,

    /// Indent markup output
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Emit `.tsx` with a props type instead of `.jsx`
    #[serde(default)]
    pub typescript: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmitTarget {
    Html,
    React,
}

impl EmitTarget {
    pub fn extension(self, typescript: bool) -> &'static str {
        match self {
            EmitTarget::Html => "html",
            EmitTarget::React if typescript => "tsx",
            EmitTarget::React => "jsx",
        }
    }
}

fn default_src_dir() -> String {
    "scenes".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_emit() -> Vec<EmitTarget> {
    vec![EmitTarget::Html]
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    pub fn get_assets_path(&self, cwd: &str) -> Option<PathBuf> {
        self.assets.as_ref().map(|path| PathBuf::from(cwd).join(path))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            assets: None,
            out_dir: default_out_dir(),
            emit: default_emit(),
            component_name: None,
            pretty: default_pretty(),
            typescript: false,
        }
    }
}
