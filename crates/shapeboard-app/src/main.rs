//! Command-line entry point: replays a session script and prints the document.

use clap::Parser;
use shapeboard_app::{AppError, AppResult, LogRenderer};
use shapeboard_core::CanvasConfig;
use shapeboard_core::render::{RenderContext, Renderer};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shapeboard", about = "Replay a shapeboard session script")]
struct Cli {
    /// JSON array of session commands.
    script: PathBuf,

    /// Canvas configuration (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => shapeboard_app::load_config(path)?,
        None => CanvasConfig::default(),
    };

    let session = shapeboard_app::run_script_file(&cli.script, config)?;
    for warning in &session.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut renderer = LogRenderer::new();
    renderer.build_scene(&RenderContext::new(&session.canvas));

    let json = session
        .canvas
        .document
        .to_json()
        .map_err(AppError::Output)?;
    println!("{}", json);
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Starting shapeboard");

    if let Err(err) = run(cli) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
