use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use greetcard::{CardConfig, CardPipeline, CardRequest, CardSession, GenerationState};

#[derive(Parser, Debug)]
#[command(name = "greetcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a board's card and write it as a PNG.
    Render(RenderArgs),
    /// Write only the board's barcode as a PNG.
    Qr(QrArgs),
    /// Print the URL the barcode encodes.
    Url(UrlArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Board identifier.
    #[arg(long)]
    board: String,

    /// JSON config file; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site origin the barcode URL is built on.
    #[arg(long)]
    origin: Option<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Directory holding the template and font assets.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Output directory; the file is named after the board and today's date.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct QrArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Side length in pixels; defaults to the card's scaled barcode box.
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Parser, Debug)]
struct UrlArgs {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let res = match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Qr(args) => cmd_qr(args),
        Command::Url(args) => cmd_url(args),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(common: &CommonArgs) -> anyhow::Result<CardConfig> {
    let cfg = match &common.config {
        Some(path) => CardConfig::from_json_file(path)?,
        None => CardConfig::default(),
    };
    let mut cfg = cfg.with_env_overrides();
    if let Some(origin) = &common.origin {
        cfg.origin = origin.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    if let Some(root) = args.assets_root {
        cfg.assets_root = root;
    }
    let request = CardRequest::new(args.common.board)?;
    let pipeline = CardPipeline::new(cfg)?;

    let mut session = CardSession::new();
    match session.generate(&pipeline, request) {
        GenerationState::Ready(_) => {}
        GenerationState::Failed {
            reason, message, ..
        } => {
            eprintln!("{message}");
            anyhow::bail!("{reason}");
        }
        other => anyhow::bail!("card generation ended in state '{}'", other.label()),
    }

    let path = session.download(&args.out)?;
    println!("{}", path.display());
    Ok(())
}

fn cmd_qr(args: QrArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let request = CardRequest::new(args.common.board)?;
    let url = greetcard::payload_url(&cfg.origin, &cfg.board_path, request.board_id());
    let size = args.size.unwrap_or(cfg.geometry.barcode_pixel_size());

    let code = greetcard::CodeEncoder::new(cfg.error_correction).encode(&url, size)?;
    let png = greetcard::assets::decode::encode_png(code.raster())?;
    std::fs::write(&args.out, png)
        .with_context(|| format!("write barcode '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_url(args: UrlArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.common)?;
    let request = CardRequest::new(args.common.board)?;
    println!(
        "{}",
        greetcard::payload_url(&cfg.origin, &cfg.board_path, request.board_id())
    );
    Ok(())
}

