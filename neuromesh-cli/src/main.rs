use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use neuromesh_core::clipboard::CopyIndicator;
use neuromesh_core::export::{analysis_artifact, script_artifact};
use neuromesh_core::schema;
use neuromesh_core::session::{SessionController, SessionState};
use neuromesh_core::{GenerateError, GenerationResult, ImageAsset, Orchestrator};
use neuromesh_gemini::GeminiClient;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod clipboard;
mod config;
mod logging;
mod render;

use config::{Config, ExportArgs, ExportSelection, ServiceArgs};

#[derive(Parser)]
#[command(author, version, about = "Turn character concept art into a Blender block-out script", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze concept art and generate a block-out build script
    Analyze {
        /// The character image (png, jpg, webp, heic, heif, gif)
        image: PathBuf,
        #[command(flatten)]
        service: ServiceArgs,
        #[command(flatten)]
        export: ExportArgs,
        /// Copy the build script to the clipboard
        #[arg(long)]
        copy: bool,
        /// Do not print the build script
        #[arg(long)]
        no_script: bool,
    },
    /// Display a previously exported analysis file
    Show {
        /// The path to a `<name>_analysis.json` file
        file: PathBuf,
        /// Re-export the build script and analysis into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Do not print the build script
        #[arg(long)]
        no_script: bool,
    },
    /// Print the response schema sent with every request
    Schema,
}

/// How a finished result should be presented.
struct Presentation<'a> {
    out_dir: Option<&'a Path>,
    export: ExportSelection,
    copy: bool,
    show_script: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let outcome = match cli.command {
        Commands::Analyze { image, service, export, copy, no_script } => {
            analyze(&image, &service, &export, copy, no_script).await
        }
        Commands::Show { file, out_dir, no_script } => show(&file, out_dir.as_deref(), no_script),
        Commands::Schema => print_schema(),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn analyze(image: &Path, service: &ServiceArgs, export: &ExportArgs, copy: bool, no_script: bool) -> Result<()> {
    let config = Config::from_args(service);
    if config.orchestrator.credential.is_empty() {
        bail!("{}. Set GEMINI_API_KEY or pass --api-key.", GenerateError::MissingCredential);
    }
    tracing::debug!(
        endpoint = %config.endpoint,
        model = %config.orchestrator.model,
        "resolved configuration"
    );

    let asset = ImageAsset::from_path(image).with_context(|| format!("cannot use '{}'", image.display()))?;
    println!("{} {}", "Source detected:".bold(), asset.file_name.as_deref().unwrap_or_default().cyan());
    if let Some(size) = asset.size_bytes() {
        println!("{}", format!("{:.2} MB", size as f64 / 1024.0 / 1024.0).dimmed());
    }

    let orchestrator = Orchestrator::new(GeminiClient::with_endpoint(config.endpoint), config.orchestrator);
    let controller = SessionController::new();
    controller.select_asset(asset)?;

    println!("{}", "PROCESSING NEURAL ARCHITECTURE...".cyan());
    match controller.run(&orchestrator).await? {
        SessionState::Complete(result) => present(
            &result,
            &Presentation {
                out_dir: Some(export.out_dir.as_path()),
                export: export.export,
                copy,
                show_script: !no_script,
            },
        ),
        SessionState::Error(message) => bail!(message),
        other => bail!("generation ended in unexpected state '{}'", other.name()),
    }
}

fn show(file: &Path, out_dir: Option<&Path>, no_script: bool) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file.display()))?;
    let result = schema::parse_result(&text).with_context(|| format!("invalid analysis file '{}'", file.display()))?;
    let export = if out_dir.is_some() { ExportSelection::All } else { ExportSelection::None };
    present(&result, &Presentation { out_dir, export, copy: false, show_script: !no_script })
}

fn print_schema() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&schema::response_schema())?);
    Ok(())
}

fn present(result: &GenerationResult, presentation: &Presentation<'_>) -> Result<()> {
    println!("{}", render::analysis_card(&result.analysis));
    if presentation.show_script {
        println!("{}", render::script_block(&result.script));
    }

    let script = script_artifact(result);
    let mut exported_script = None;
    if let Some(dir) = presentation.out_dir {
        if presentation.export.script() {
            let path = script.write_to(dir).context("failed to write build script")?;
            println!("Saved build script to {}", path.display());
            exported_script = Some(path);
        }
        if presentation.export.analysis() {
            let path = analysis_artifact(result)?.write_to(dir).context("failed to write analysis")?;
            println!("Saved analysis to {}", path.display());
        }
    }

    let script_name = exported_script.as_ref().map(|p: &PathBuf| p.display().to_string());
    println!("{}", render::instructions(script_name.as_deref()));

    if presentation.copy {
        let now = Instant::now();
        let mut indicator = CopyIndicator::new();
        indicator
            .copy(&mut clipboard::Osc52::new(io::stdout()), &result.script, now)
            .context("failed to copy build script")?;
        if indicator.is_copied(now) {
            println!("{}", "Copied build script to clipboard.".green());
        }
    }

    Ok(())
}
