//! rose: render, inspect and strip rich-text markup.
//!
//! Logging goes to stderr and is filtered by `RUST_LOG` (default `warn`),
//! e.g. `RUST_LOG=integrate.layout=trace rose items doc.txt`.

mod settings;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rose_integrate::{Environment, Integrate, IntegrateConfig};
use rose_markup::{Color, drop_markup};
use rose_render::{FileImageSource, FontSet, FontdueMetrics, Renderer, get_surface};
use tracing_subscriber::EnvFilter;

use settings::{Overrides, load_config};

/// Rose rich-text markup tool
#[derive(Parser, Debug)]
#[command(name = "rose")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Render a document to PNG
    rose render doc.txt -o doc.png

    # Narrow layout with larger text
    rose render doc.txt -o doc.png --width 240 --font-size 18

    # Dump laid-out items as JSON
    rose items doc.txt --width 320

    # Print the plain text of a document
    rose strip doc.txt
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a document and save it as an image
    Render {
        /// Markup file
        input: PathBuf,

        /// Output image (format from the extension)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Lay out a document and print its items as JSON
    Items {
        /// Markup file
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Print a document with its markup removed
    Strip {
        /// Markup file
        input: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct LayoutArgs {
    /// Layout width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// Base font size in pixels
    #[arg(long)]
    font_size: Option<u32>,

    /// Engine configuration (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Lay out in editable mode
    #[arg(long)]
    editable: bool,
}

impl LayoutArgs {
    fn load(&self) -> Result<IntegrateConfig> {
        let overrides = Overrides {
            width: self.width,
            font_size: self.font_size,
            editable: self.editable,
        };
        load_config(self.config.as_deref(), overrides)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Command::Render {
            input,
            output,
            layout,
        } => render(&input, &output, &layout),
        Command::Items { input, layout } => {
            let engine = open(&input, layout.load()?, None)?;
            println!("{}", serde_json::to_string_pretty(engine.items())?);
            Ok(())
        }
        Command::Strip { input } => {
            let bytes = read(&input)?;
            print!("{}", drop_markup(&String::from_utf8_lossy(&bytes)));
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Lay out `input` with images resolved next to it. Without `fonts` text is
/// measured approximately.
fn open(input: &Path, config: IntegrateConfig, fonts: Option<Arc<FontSet>>) -> Result<Integrate> {
    let bytes = read(input)?;
    let root = input.parent().unwrap_or_else(|| Path::new("."));
    let env = match fonts {
        Some(fonts) => Environment::new(Arc::new(FontdueMetrics::new(fonts))),
        None => Environment::default(),
    }
    .with_images(Arc::new(FileImageSource::new(root)));
    Integrate::from_bytes(&bytes, config, env)
        .with_context(|| format!("failed to lay out '{}'", input.display()))
}

fn render(input: &Path, output: &Path, layout: &LayoutArgs) -> Result<()> {
    let config = layout.load()?;
    let fonts = match FontSet::load_system() {
        Ok(fonts) => Some(Arc::new(fonts)),
        Err(e) => {
            eprintln!(
                "{} {e}; text will be laid out but not drawn",
                "warning:".yellow().bold()
            );
            None
        }
    };

    let mut engine = open(input, config, fonts.clone())?;
    let surface = get_surface(&mut engine, fonts, Color::WHITE);
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        // An empty document still produces an image.
        Renderer::new(1, 1, Color::WHITE, None).save(output)?;
    } else {
        surface
            .save(output)
            .with_context(|| format!("failed to save image to '{}'", output.display()))?;
    }

    println!(
        "{} {} ({}x{})",
        "Saved".green().bold(),
        output.display(),
        width.max(1),
        height.max(1)
    );
    Ok(())
}
