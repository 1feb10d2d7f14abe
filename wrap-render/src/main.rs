//! Command-line front end for mug-wrap templates.
//!
//! Usage:
//!   mugwrap new-project --name "Gift mug" > mug.json
//!   mugwrap template mug.json -o mug.svg
//!   mugwrap export mug.json --format pdf
//!   mugwrap cutout mug.json --exterior-only
//!   mugwrap mesh mug.json -o mug.obj

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use wrap_core::{MugDimensions, ProjectRecord, encode_rgba_to_png_bytes};
use wrap_render::{
    ExportArtifact, ExportFormat, RenderConfig, Renderer, decode_data_uri, encode_data_uri,
    remove_background,
};

#[derive(Parser)]
#[command(name = "mugwrap")]
#[command(about = "Printable mug wrap templates and 3D previews")]
struct Cli {
    /// Render configuration (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Extra font file to load (repeatable)
    #[arg(long = "font", global = true)]
    fonts: Vec<PathBuf>,
    /// Do not load system fonts
    #[arg(long, global = true)]
    no_system_fonts: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Svg,
    Png,
    Pdf,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Svg => ExportFormat::Svg,
            Format::Png => ExportFormat::Png,
            Format::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a default project record
    NewProject {
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Write the template SVG
    Template {
        project: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Write the on-screen preview instead of the print document
        #[arg(long)]
        preview: bool,
        /// Embed the project record as a comment
        #[arg(long)]
        metadata: bool,
    },
    /// Export the design as SVG, PNG or PDF
    Export {
        project: PathBuf,
        #[arg(long, value_enum, default_value = "svg")]
        format: Format,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        dpi: Option<f64>,
        #[arg(long)]
        metadata: bool,
    },
    /// Export the cutout mask or the exterior outline
    Cutout {
        project: PathBuf,
        #[arg(long, value_enum, default_value = "png")]
        format: Format,
        #[arg(long)]
        exterior_only: bool,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long)]
        dpi: Option<f64>,
    },
    /// Write the outer-wall texture as PNG
    Texture {
        project: PathBuf,
        #[arg(short, long, default_value = "texture.png")]
        out: PathBuf,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Write the 3D mug as Wavefront OBJ
    Mesh {
        /// Project file; dimensions flags are used when omitted
        project: Option<PathBuf>,
        #[arg(long, default_value_t = 95.0)]
        height: f64,
        #[arg(long, default_value_t = 82.0)]
        diameter: f64,
        #[arg(long, default_value_t = 20.0)]
        handle_width: f64,
        #[arg(short, long, default_value = "mug.obj")]
        out: PathBuf,
    },
    /// Make an image's background colour transparent
    RemoveBackground {
        image: PathBuf,
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::NewProject { name } => {
            println!("{}", ProjectRecord::new(name, Default::default()).to_json()?);
            Ok(())
        }
        Commands::Template {
            project,
            out,
            preview,
            metadata,
        } => {
            let record = read_project(&project)?;
            let renderer = Renderer::new(config);
            let (layout, doc) = renderer.template(&record, metadata)?;
            let markup = if preview {
                doc.preview_markup
            } else {
                doc.download_markup
            };
            let out = out.unwrap_or_else(|| {
                PathBuf::from(wrap_render::export::design_file_name(
                    &record.project_name,
                    ExportFormat::Svg,
                ))
            });
            fs::write(&out, markup).with_context(|| format!("writing {}", out.display()))?;
            log::info!(
                "template {:.2} x {:.2} mm written to {}",
                layout.sheet_width,
                layout.sheet_height,
                out.display()
            );
            Ok(())
        }
        Commands::Export {
            project,
            format,
            out_dir,
            dpi,
            metadata,
        } => {
            let mut config = config;
            if let Some(dpi) = dpi {
                config.png_dpi = dpi;
                config.pdf_dpi = dpi;
            }
            let record = read_project(&project)?;
            let renderer = Renderer::new(config);
            let (_, doc) = renderer.template(&record, metadata)?;
            let artifact = renderer.export_design(&doc, &record.project_name, format.into())?;
            write_artifact(&out_dir, &artifact)
        }
        Commands::Cutout {
            project,
            format,
            exterior_only,
            out_dir,
            dpi,
        } => {
            let mut config = config;
            if let Some(dpi) = dpi {
                config.cutout_dpi = dpi;
            }
            let record = read_project(&project)?;
            let renderer = Renderer::new(config);
            let (_, doc) = renderer.template(&record, false)?;
            let artifact =
                renderer.export_cutout(&doc, &record.project_name, format.into(), exterior_only)?;
            write_artifact(&out_dir, &artifact)
        }
        Commands::Texture {
            project,
            out,
            width,
            height,
        } => {
            let record = read_project(&project)?;
            let renderer = Renderer::new(config);
            let (_, doc) = renderer.template(&record, false)?;
            let size = width.zip(height);
            let texture = renderer.texture(&doc, 0, size)?;
            let png = encode_rgba_to_png_bytes(texture.width, texture.height, &texture.rgba)?;
            fs::write(&out, png).with_context(|| format!("writing {}", out.display()))?;
            log::info!("{}x{} texture written to {}", texture.width, texture.height, out.display());
            Ok(())
        }
        Commands::Mesh {
            project,
            height,
            diameter,
            handle_width,
            out,
        } => {
            let dims = match project {
                Some(path) => read_project(&path)?.design.dimensions,
                None => MugDimensions::new(height, diameter, handle_width)?,
            };
            let group = mug_core::build_mug(&dims)?;
            fs::write(&out, group.to_obj()).with_context(|| format!("writing {}", out.display()))?;
            log::info!("mesh written to {}", out.display());
            Ok(())
        }
        Commands::RemoveBackground { image, out } => {
            let bytes = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let cleaned = remove_background(&encode_data_uri("image/png", &bytes))?;
            fs::write(&out, decode_data_uri(&cleaned)?.bytes)
                .with_context(|| format!("writing {}", out.display()))?;
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if cli.no_system_fonts {
        config.system_fonts = false;
    }
    config.font_files.extend(cli.fonts.iter().cloned());
    Ok(config)
}

fn read_project(path: &Path) -> Result<ProjectRecord> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let record = if text.trim_start().starts_with('{') {
        ProjectRecord::from_json(&text)?
    } else {
        wrap_core::parse_metadata_comment(&text)?
    };
    Ok(record)
}

fn write_artifact(dir: &Path, artifact: &ExportArtifact) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
