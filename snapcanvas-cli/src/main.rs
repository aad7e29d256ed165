use anyhow::{bail, Context};
use clap::Parser;
use snapcanvas::{render_snapshot, FileImageLoader, RenderConfig, Snapshot};
use snapcanvas_raster::{CustomFont, FontConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// snapcanvas: render a captured layout snapshot (JSON) to a PNG image
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the layout snapshot JSON file
    pub input: PathBuf,

    /// Path to the PNG file to be created
    #[clap(short, long)]
    pub output: PathBuf,

    /// Render configuration JSON file
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Output scale, overriding the configuration file
    #[clap(short, long)]
    pub scale: Option<f64>,

    /// Device pixel ratio, overriding the configuration file
    #[clap(long)]
    pub dpr: Option<f64>,

    /// Directory image paths are resolved against. Defaults to the
    /// snapshot's directory
    #[clap(long)]
    pub assets: Option<PathBuf>,

    /// Additional font files (TTF/OTF)
    #[clap(long = "font")]
    pub fonts: Vec<PathBuf>,

    /// Additional directories to scan for fonts
    #[clap(long = "font-dir")]
    pub font_dirs: Vec<PathBuf>,

    /// Skip loading system fonts
    #[clap(long)]
    pub no_system_fonts: bool,

    /// Export at container size times scale instead of device resolution
    #[clap(long)]
    pub logical: bool,

    /// Log every drawing stage
    #[clap(short, long)]
    pub verbose: bool,
}

fn load_config(args: &Args) -> anyhow::Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(scale) = args.scale {
        if !(scale.is_finite() && scale > 0.0) {
            bail!("Invalid scale: {scale}");
        }
        config.scale = scale;
    }
    if let Some(dpr) = args.dpr {
        if !(dpr.is_finite() && dpr > 0.0) {
            bail!("Invalid device pixel ratio: {dpr}");
        }
        config.device_pixel_ratio = dpr;
    }
    Ok(config)
}

fn load_fonts(args: &Args) -> anyhow::Result<FontConfig> {
    let mut fonts = if args.no_system_fonts {
        FontConfig::empty()
    } else {
        FontConfig::default()
    };
    fonts.font_dirs.extend(args.font_dirs.iter().cloned());
    for path in &args.fonts {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;
        fonts.custom_fonts.push(CustomFont {
            data: Arc::new(data),
        });
    }
    Ok(fonts)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let snapshot = Snapshot::from_json_file(&args.input)
        .with_context(|| format!("Failed to read snapshot: {}", args.input.display()))?;
    let config = load_config(&args)?;
    let fonts = load_fonts(&args)?;
    let assets = args.assets.clone().unwrap_or_else(|| {
        args.input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    let loader = FileImageLoader::new(assets);

    let canvas = render_snapshot(&snapshot, config, &loader, &fonts)
        .await
        .context("Failed to render snapshot")?;
    let png = canvas.to_png(!args.logical)?;
    std::fs::write(&args.output, png)
        .with_context(|| format!("Failed to write output file: {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    run(args).await
}
