use crate::config::{Config, EmitTarget, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use scenecraft_editor::SceneDocument;
use scenecraft_model::{NodeType, ROOT_ID};
use serde_json::json;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Output formats to emit
    #[arg(short, long, value_enum, default_value = "html")]
    pub target: Vec<EmitTarget>,

    /// Scene directory
    #[arg(short, long, default_value = "scenes")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Scenecraft project...".bright_blue().bold());

    let src_dir = PathBuf::from(cwd).join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let example_file = src_dir.join("example.scene.json");
    if !example_file.exists() {
        fs::write(&example_file, example_scene()?)?;
        println!("  {} Created example.scene.json", "✓".green());
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        emit: args.target,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}/example.scene.json", args.src_dir);
    println!("  2. Run: scenecraft render");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}

/// Headline plus an unfilled hero slot
fn example_scene() -> Result<String> {
    let mut doc = SceneDocument::new("example", 1280.0, 720.0);

    let title = doc.create_node_with(
        NodeType::Text,
        &json!({
            "content": "Hello, Scenecraft",
            "layout": { "x": 80, "y": 64, "width": 1120, "height": 72 }
        }),
    )?;
    doc.add_child(ROOT_ID, title)?;

    let hero = doc.create_node_with(
        NodeType::Placeholder,
        &json!({
            "slotId": "hero",
            "layout": { "x": 80, "y": 176, "width": 1120, "height": 480 }
        }),
    )?;
    doc.add_child(ROOT_ID, hero)?;

    Ok(doc.to_json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecraft_editor::SceneFile;
    use scenecraft_model::NodeKind;

    #[test]
    fn test_example_scene_is_loadable() {
        let source = example_scene().unwrap();
        let file = SceneFile::from_json(&source).unwrap();

        assert_eq!(file.root.children.len(), 2);
        assert!(matches!(
            &file.root.children[1].kind,
            NodeKind::Placeholder { slot_id, .. } if slot_id == "hero"
        ));
    }
}
