//! Block Geometry CLI
//!
//! Compute preview geometry for a Minecraft block model and print it as JSON.

use block_geometry::export::{css_quads, CssOptions};
use block_geometry::resolver::{default_variant, resolve_texture_map, ModelResolver};
use block_geometry::scheduler::{GeometryRequest, GeometryScheduler, SchedulerConfig};
use block_geometry::{BlockModel, BlockstateDefinition, BlockstateRotation, Rgb};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "block-geometry")]
#[command(author, version, about = "Compute preview geometry for Minecraft block models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build geometry for one model
    Geometry {
        /// Block model JSON file
        #[arg(short, long)]
        model: PathBuf,

        /// Pack models directory (containing block/*.json) for resolving parents
        #[arg(long)]
        models_dir: Option<PathBuf>,

        /// Blockstate JSON file; its default variant supplies the rotation
        #[arg(long)]
        blockstate: Option<PathBuf>,

        /// X rotation in degrees
        #[arg(long, default_value = "0")]
        x: i32,

        /// Y rotation in degrees
        #[arg(long, default_value = "0")]
        y: i32,

        /// Keep textures fixed in world space while rotating
        #[arg(long)]
        uvlock: bool,

        /// Biome tint color as "r,g,b" or "#rrggbb"
        #[arg(long, value_parser = parse_rgb)]
        biome: Option<Rgb>,

        /// JSON object mapping texture ids to loadable handles
        #[arg(long)]
        texture_handles: Option<PathBuf>,

        /// Print CSS quads instead of raw buffers
        #[arg(long)]
        css: bool,

        /// Pixels per block for CSS quads
        #[arg(long, default_value = "64")]
        css_scale: f32,
    },

    /// Print a model's resolved texture variables
    Textures {
        /// Block model JSON file
        #[arg(short, long)]
        model: PathBuf,

        /// Pack models directory (containing block/*.json) for resolving parents
        #[arg(long)]
        models_dir: Option<PathBuf>,
    },
}

fn parse_rgb(s: &str) -> Result<Rgb, String> {
    Rgb::parse(s).ok_or_else(|| format!("Invalid color: '{}'. Use r,g,b or #rrggbb", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Geometry {
            model,
            models_dir,
            blockstate,
            x,
            y,
            uvlock,
            biome,
            texture_handles,
            css,
            css_scale,
        } => {
            let model = load_model(&model, models_dir.as_deref())?;

            let rotation = match blockstate {
                Some(path) => {
                    let definition: BlockstateDefinition =
                        serde_json::from_str(&fs::read_to_string(path)?)?;
                    let variant = default_variant(&definition)?;
                    eprintln!("Default variant: {}", variant.model_location());
                    variant.rotation()
                }
                None => BlockstateRotation::new(x, y, uvlock),
            };

            let mut request = GeometryRequest::new(model).with_rotation(rotation);
            if let Some(color) = biome {
                request = request.with_biome_color(color);
            }
            if let Some(path) = texture_handles {
                let handles: HashMap<String, String> =
                    serde_json::from_str(&fs::read_to_string(path)?)?;
                request = request.with_resolved_textures(handles);
            }

            let scheduler = GeometryScheduler::new(SchedulerConfig::default());
            let response = scheduler.compute(request)?.wait()?;
            scheduler.shutdown();

            let vertices: usize = response.elements.iter().map(|e| e.vertex_count()).sum();
            let triangles: usize = response.elements.iter().map(|e| e.triangle_count()).sum();
            eprintln!(
                "Generated {} elements, {} vertices, {} triangles",
                response.elements.len(),
                vertices,
                triangles
            );

            if css {
                let options = CssOptions { scale: css_scale };
                let quads: Vec<_> = response
                    .elements
                    .iter()
                    .map(|element| css_quads(element, &options))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&quads)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }
        Commands::Textures { model, models_dir } => {
            let model = load_model(&model, models_dir.as_deref())?;
            let resolved = resolve_texture_map(&model.textures);

            let mut keys: Vec<_> = model.textures.keys().collect();
            keys.sort();
            for key in keys {
                match resolved.get(key) {
                    Some(id) => println!("#{} -> {}", key, id),
                    None => println!("#{} -> (unresolved)", key),
                }
            }
        }
    }

    Ok(())
}

/// Read a model, flattening its parent chain when a models directory is given.
fn load_model(
    path: &Path,
    models_dir: Option<&Path>,
) -> Result<BlockModel, Box<dyn std::error::Error>> {
    let model = BlockModel::from_json(&fs::read_to_string(path)?)?;

    let (Some(dir), Some(_)) = (models_dir, model.parent.as_ref()) else {
        return Ok(model);
    };

    let mut models = load_models_dir(dir)?;
    let location = "minecraft:__cli_input".to_string();
    models.insert(location.clone(), model);

    Ok(ModelResolver::new(&models).resolve(&location)?)
}

/// Load every `<dir>/<folder>/<name>.json` keyed as `minecraft:<folder>/<name>`.
fn load_models_dir(dir: &Path) -> Result<HashMap<String, BlockModel>, Box<dyn std::error::Error>> {
    let mut models = HashMap::new();

    for folder in fs::read_dir(dir)? {
        let folder = folder?.path();
        if !folder.is_dir() {
            continue;
        }
        let Some(folder_name) = folder.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        for entry in fs::read_dir(&folder)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match BlockModel::from_json(&fs::read_to_string(&path)?) {
                Ok(model) => {
                    models.insert(format!("minecraft:{}/{}", folder_name, stem), model);
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
    }

    log::debug!("Loaded {} models from {}", models.len(), dir.display());
    Ok(models)
}
