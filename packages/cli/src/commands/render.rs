use crate::config::{Config, EmitTarget};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use scenecraft_common::{AssetResolver, StaticAssetResolver};
use scenecraft_compiler_html::{compile_to_html, CompileOptions as HtmlOptions};
use scenecraft_compiler_react::{compile_to_react, pascal_case, CompileOptions as ReactOptions};
use scenecraft_editor::SceneFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const SCENE_EXTENSION: &str = ".scene.json";

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Scene file or directory (defaults to the configured scene directory)
    pub path: Option<String>,

    /// Output format (overrides config, may be repeated)
    #[arg(short, long, value_enum)]
    pub target: Vec<EmitTarget>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Asset manifest (overrides config)
    #[arg(short, long)]
    pub assets: Option<String>,

    /// Emit TypeScript for React output
    #[arg(long)]
    pub typescript: bool,
}

/// Render settings after merging the config file with CLI flags
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub targets: Vec<EmitTarget>,
    pub component_name: Option<String>,
    pub pretty: bool,
    pub typescript: bool,
}

impl RenderSettings {
    pub fn new(config: &Config, args: &RenderArgs) -> Self {
        let targets = if args.target.is_empty() {
            config.emit.clone()
        } else {
            args.target.clone()
        };
        Self {
            targets,
            component_name: config.component_name.clone(),
            pretty: config.pretty,
            typescript: config.typescript || args.typescript,
        }
    }
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let settings = RenderSettings::new(&config, &args);

    let input = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };
    if !input.exists() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    let resolver = load_resolver(&config, &args, cwd)?;

    println!("{}", "🎨 Rendering scenes...".bright_blue().bold());

    let (scene_files, base_dir) = if input.is_file() {
        let base = input.parent().map(Path::to_path_buf).unwrap_or_default();
        (vec![input.clone()], base)
    } else {
        (find_scene_files(&input), input.clone())
    };

    if scene_files.is_empty() {
        println!("{}", "⚠️  No .scene.json files found".yellow());
        return Ok(());
    }

    println!("Found {} scenes", scene_files.len());

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for scene_file in &scene_files {
        let relative_path = scene_file.strip_prefix(&base_dir).unwrap_or(scene_file);
        match render_file(scene_file, relative_path, &settings, &resolver, &out_dir, args.stdout) {
            Ok(outputs) => {
                success_count += 1;
                for output in outputs {
                    println!("  {} {} → {}", "✓".green(), relative_path.display(), output);
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    format!("{:#}", e).red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!("{} Rendered {} scenes successfully", "✅".green(), success_count);
        Ok(())
    } else {
        println!(
            "{} Rendered {} scenes, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
        Err(anyhow!("{} scene(s) failed to render", error_count))
    }
}

fn load_resolver(config: &Config, args: &RenderArgs, cwd: &str) -> Result<StaticAssetResolver> {
    let path = match &args.assets {
        Some(path) => Some(PathBuf::from(cwd).join(path)),
        None => config.get_assets_path(cwd),
    };

    match path {
        Some(path) => {
            let resolver = StaticAssetResolver::load(&path)
                .with_context(|| format!("Failed to load asset manifest {}", path.display()))?;
            info!(assets = resolver.len(), path = %path.display(), "loaded asset manifest");
            Ok(resolver)
        }
        None => Ok(StaticAssetResolver::new()),
    }
}

fn find_scene_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_scene_file(path))
        .collect();
    files.sort();
    files
}

fn is_scene_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(SCENE_EXTENSION))
        .unwrap_or(false)
}

/// `hero.scene.json` → `hero`
fn scene_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("scene");
    file_name
        .strip_suffix(SCENE_EXTENSION)
        .unwrap_or(file_name)
        .to_string()
}

fn render_file(
    scene_file: &Path,
    relative_path: &Path,
    settings: &RenderSettings,
    resolver: &dyn AssetResolver,
    out_dir: &Path,
    stdout: bool,
) -> Result<Vec<String>> {
    let source = fs::read_to_string(scene_file)?;
    let name = scene_name(scene_file);
    let rendered = render_scene(&name, &source, settings, resolver)?;

    let mut outputs = Vec::new();
    for (target, output) in rendered {
        if stdout {
            println!("{}", output);
            outputs.push("stdout".to_string());
            continue;
        }

        let output_file = output_path(out_dir, relative_path, &name, target, settings.typescript);
        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_file, output)?;
        outputs.push(output_file.display().to_string());
    }

    Ok(outputs)
}

/// `<out_dir>/<relative dir>/<name>.<ext>`; the name keeps any dots
fn output_path(
    out_dir: &Path,
    relative_path: &Path,
    name: &str,
    target: EmitTarget,
    typescript: bool,
) -> PathBuf {
    let file_name = format!("{}.{}", name, target.extension(typescript));
    out_dir.join(relative_path.with_file_name(file_name))
}

/// Parse a serialized scene and render it to every configured target
pub fn render_scene(
    name: &str,
    source: &str,
    settings: &RenderSettings,
    resolver: &dyn AssetResolver,
) -> Result<Vec<(EmitTarget, String)>> {
    let scene = SceneFile::from_json(source).with_context(|| format!("Invalid scene {}", name))?;
    debug!(scene = name, version = scene.version, "rendering scene");

    let outputs = settings
        .targets
        .iter()
        .map(|target| {
            let output = match target {
                EmitTarget::Html => compile_to_html(
                    &scene.root,
                    resolver,
                    HtmlOptions {
                        pretty: settings.pretty,
                        full_document: true,
                        title: name.to_string(),
                        ..HtmlOptions::default()
                    },
                ),
                EmitTarget::React => compile_to_react(
                    &scene.root,
                    ReactOptions {
                        component_name: settings
                            .component_name
                            .clone()
                            .unwrap_or_else(|| pascal_case(name)),
                        use_typescript: settings.typescript,
                        ..ReactOptions::default()
                    },
                ),
            };
            (*target, output)
        })
        .collect();

    Ok(outputs)
}
