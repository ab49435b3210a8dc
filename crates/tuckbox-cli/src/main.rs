use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;
use tuckbox::{Backend, Config, InsideKind, Recorder, SvgCanvas, build_with};

#[derive(Parser)]
#[command(name = "tuckbox-cli")]
#[command(about = "Generate printable tuckbox, sleeve and tray templates", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted
    config: Option<PathBuf>,

    /// Output file. Multi-page SVG output is split into `NAME-1.svg`, `NAME-2.svg`, ...
    #[arg(short, long, value_name = "PATH", default_value = "tuckbox.svg")]
    output: PathBuf,

    /// What to write
    #[arg(long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Insert to draw ahead of the box
    #[arg(long, value_enum)]
    inside: Option<Inside>,

    /// Title printed on the box
    #[arg(long)]
    title: Option<String>,

    /// Card width, in the configured unit
    #[arg(long)]
    width: Option<f64>,

    /// Card length, in the configured unit
    #[arg(long)]
    length: Option<f64>,

    /// Deck depth, in the configured unit
    #[arg(long)]
    depth: Option<f64>,

    /// Print a data URI to stdout instead of writing files
    #[arg(long)]
    data_uri: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One SVG document per page
    Svg,
    /// The recorded drawing commands as JSON
    Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Inside {
    None,
    Sleeve,
    Tray,
}

impl From<Inside> for InsideKind {
    fn from(inside: Inside) -> Self {
        match inside {
            Inside::None => InsideKind::None,
            Inside::Sleeve => InsideKind::Sleeve,
            Inside::Tray => InsideKind::Tray,
        }
    }
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(inside) = self.inside {
            config.inside = inside.into();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(width) = self.width {
            config.card_width = width;
        }
        if let Some(length) = self.length {
            config.card_length = length;
        }
        if let Some(depth) = self.depth {
            config.box_depth = depth;
        }
        Ok(config)
    }

    /// Directory that image paths in the configuration are relative to
    fn base_dir(&self) -> &Path {
        self.config
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let mut request = config.to_request();
    request.images = config.load_images(cli.base_dir())?;

    let canvas: Backend = match cli.format {
        Format::Svg => SvgCanvas::new(request.paper).into(),
        Format::Commands => Recorder::new(request.paper).into(),
    };
    let templates = build_with(canvas, &request)?;
    tracing::info!(
        pages = templates.page_count(),
        width = templates.dimensions().width.raw(),
        length = templates.dimensions().length.raw(),
        depth = templates.dimensions().depth.raw(),
        "built templates"
    );

    if cli.data_uri {
        println!("{}", templates.export_as_data_string()?);
        return Ok(());
    }

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).into_diagnostic()?;
    }
    templates.persist(&cli.output)?;
    eprintln!(
        "wrote {} page(s) from {}",
        templates.page_count(),
        cli.output.display()
    );
    Ok(())
}
