use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dosview_core::{
    list_fonts, Command, Dispatch, Document, FileStore, FontManager, KeyEvent, ScreenGeometry,
    Settings, Viewer,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

const DEFAULT_CONFIG: &str = "dosview.toml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Retro CP866 text viewer rendered with a bitmap font")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the composited 80x24 screen to stdout
    Preview(PreviewArgs),
    /// Render the screen to a PNG file
    Render(RenderArgs),
    /// Replay keys and write one PNG per animation frame
    Animate(AnimateArgs),
    /// List font files found in a directory
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Text file to view; shows the welcome screen when omitted
    input: Option<PathBuf>,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text file to view; shows the welcome screen when omitted
    input: Option<PathBuf>,
    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Text file to view; shows the welcome screen when omitted
    input: Option<PathBuf>,
    /// Output directory for frame files
    #[arg(short, long)]
    out_dir: PathBuf,
    /// Frames rendered per second of animation
    #[arg(long, default_value_t = 30.0)]
    fps: f32,
    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Directory to search
    dir: PathBuf,
    /// Glyph height in pixels
    #[arg(long, default_value_t = 16)]
    font_height: usize,
}

#[derive(Parser, Debug, Clone)]
struct SessionArgs {
    /// Keys replayed before rendering, e.g. `F1,Esc,F5`
    #[arg(long, value_delimiter = ',')]
    keys: Vec<KeyEvent>,
    /// Raw font file; overrides font discovery
    #[arg(long)]
    font: Option<PathBuf>,
    /// Directory searched for font files
    #[arg(long)]
    font_dir: Option<PathBuf>,
    /// Pixel scale factor
    #[arg(long)]
    scale: Option<f32>,
    /// Blend partially covered pixels
    #[arg(long, overrides_with = "no_antialias")]
    antialias: bool,
    /// Draw hard pixel edges even if the settings file enables blending
    #[arg(long, overrides_with = "antialias")]
    no_antialias: bool,
    /// Enable word wrap
    #[arg(long, overrides_with = "no_wrap")]
    wrap: bool,
    /// Disable word wrap even if the settings file enables it
    #[arg(long, overrides_with = "wrap")]
    no_wrap: bool,
    /// Color preset
    #[arg(long, value_enum)]
    palette: Option<PalettePreset>,
    /// Entries listed by the library overlay
    #[arg(long)]
    library: Vec<String>,
    /// Settings file (defaults to ./dosview.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PalettePreset {
    Classic,
    Monochrome,
    Amber,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview(args) => preview(args),
        Commands::Render(args) => render(args),
        Commands::Animate(args) => animate(args),
        Commands::Fonts(args) => fonts(args),
    }
}

fn preview(args: PreviewArgs) -> Result<()> {
    let mut viewer = args.session.open_viewer(args.input.as_deref())?;
    args.session.replay(&mut viewer, |viewer| viewer.tick(Duration::from_secs(1)));

    for row in viewer.compose().rows() {
        println!("{}", row);
    }
    Ok(())
}

fn render(args: RenderArgs) -> Result<()> {
    let mut viewer = args.session.open_viewer(args.input.as_deref())?;
    args.session.replay(&mut viewer, |viewer| viewer.tick(Duration::from_secs(1)));

    viewer
        .save_png(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;
    info!("wrote {:?}", args.output);
    Ok(())
}

fn animate(args: AnimateArgs) -> Result<()> {
    let mut viewer = args.session.open_viewer(args.input.as_deref())?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let frame = Duration::from_secs_f32(1.0 / args.fps.max(1.0));
    let fade = viewer.settings().fade();
    let frames_per_key = (fade.as_secs_f32() / frame.as_secs_f32()).ceil() as u64 + 1;
    let total = 1 + frames_per_key * args.session.keys.len() as u64;

    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames",
        )?
        .progress_chars("=> "),
    );

    let mut index = 0usize;
    let mut write_frame = |viewer: &mut Viewer| -> Result<()> {
        let path = args.out_dir.join(format!("frame_{:04}.png", index));
        viewer.save_png(&path).with_context(|| format!("failed to write {:?}", path))?;
        index += 1;
        progress.inc(1);
        Ok(())
    };

    write_frame(&mut viewer)?;
    for &event in &args.session.keys {
        let dispatch = viewer.handle(Command::Key(event));
        for _ in 0..frames_per_key {
            viewer.tick(frame);
            write_frame(&mut viewer)?;
        }
        if dispatch == Dispatch::Terminate {
            break;
        }
    }

    progress.finish_with_message(format!("Frames written to {:?}", args.out_dir));
    Ok(())
}

fn fonts(args: FontsArgs) -> Result<()> {
    let metrics = dosview_core::FontMetrics::new(8, args.font_height);
    let fonts = list_fonts(&args.dir, metrics);
    if fonts.is_empty() {
        anyhow::bail!("no font files found in {:?}", args.dir);
    }

    for path in fonts {
        let size = std::fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
        println!("{}\t{} bytes", path.display(), size);
    }
    Ok(())
}

impl SessionArgs {
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.font_dir {
            settings.font_dir = Some(dir.clone());
        }
        if let Some(scale) = self.scale {
            settings.scale = scale;
        }
        if let Some(palette) = self.palette {
            settings.palette = palette.name().to_string();
        }
        if let Some(antialias) = switch(self.antialias, self.no_antialias) {
            settings.antialias = antialias;
        }
        if let Some(wrap) = switch(self.wrap, self.no_wrap) {
            settings.word_wrap = wrap;
        }
    }

    fn settings(&self) -> Result<Settings> {
        let config = self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.is_file().then_some(default)
        });

        let mut settings = match &config {
            Some(path) => {
                let store = FileStore::open(path)
                    .with_context(|| format!("failed to load settings from {:?}", path))?;
                Settings::load(&store)
            },
            None => Settings::default(),
        };

        self.apply_overrides(&mut settings);

        if self.save_config {
            let path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            let mut store = FileStore::open(&path)
                .with_context(|| format!("failed to open settings file {:?}", path))?;
            settings
                .save(&mut store)
                .with_context(|| format!("failed to save settings to {:?}", path))?;
            info!("saved settings to {:?}", store.path());
        }

        Ok(settings)
    }

    fn open_viewer(&self, input: Option<&Path>) -> Result<Viewer> {
        let settings = self.settings()?;
        let fonts = match &self.font {
            Some(path) => FontManager::load(path, settings.font_metrics())
                .with_context(|| format!("failed to load font {:?}", path))?,
            None => FontManager::discover(&settings),
        };

        let geometry = ScreenGeometry::DOS;
        let (width, page) = (geometry.cols, geometry.content_rows());
        let document = match input {
            Some(path) => Document::open(path, width, page)
                .with_context(|| format!("failed to open {:?}", path))?,
            None => Document::empty(width, page),
        };

        let mut viewer = Viewer::new(settings, fonts, document);
        viewer.set_library(self.library.clone());
        Ok(viewer)
    }

    /// Feeds every scripted key, settling fades after each one.
    fn replay<F>(&self, viewer: &mut Viewer, mut settle: F)
    where
        F: FnMut(&mut Viewer),
    {
        for &event in &self.keys {
            let dispatch = viewer.handle(Command::Key(event));
            settle(viewer);
            match dispatch {
                Dispatch::Terminate => {
                    info!("quit confirmed, skipping remaining keys");
                    break;
                },
                Dispatch::OpenFilePicker => warn!("no file picker in the command line viewer"),
                Dispatch::Consumed | Dispatch::PassThrough => (),
            }
        }
    }
}

impl PalettePreset {
    fn name(self) -> &'static str {
        match self {
            PalettePreset::Classic => "classic",
            PalettePreset::Monochrome => "monochrome",
            PalettePreset::Amber => "amber",
        }
    }
}

/// Resolves an `--x`/`--no-x` pair; `None` keeps the loaded value.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
