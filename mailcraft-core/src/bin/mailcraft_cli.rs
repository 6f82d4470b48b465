//! Mailcraft CLI - JSON bridge for the editing surface
//!
//! Commands: defaults, validate, render, compile
//! Outputs JSON (or HTML for `render`) to stdout, logs to stderr
//! Returns 2 on validation/compilation failure, 1 on load errors

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailcraft_core::{
    default_attributes, render, CompilationPipeline, ComponentType, FailureMode, Project,
};

#[derive(Parser)]
#[command(name = "mailcraft-cli")]
#[command(about = "Mailcraft CLI - Email Block Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default attribute bag for a component type
    Defaults {
        /// Component type, e.g. header or sales_offer
        component_type: String,
    },

    /// Validate a project file
    Validate {
        /// Project JSON (envelope or bare component array)
        #[arg(short, long)]
        input: PathBuf,

        /// Treat errors as blocking
        #[arg(long)]
        strict: bool,
    },

    /// Render a project file to HTML
    Render {
        #[arg(short, long)]
        input: PathBuf,

        /// Write HTML here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compile a project file into a fingerprinted result
    Compile {
        #[arg(short, long)]
        input: PathBuf,

        /// Treat errors as blocking
        #[arg(long)]
        strict: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn failure_mode(strict: bool) -> FailureMode {
    if strict {
        FailureMode::Block
    } else {
        FailureMode::Warn
    }
}

fn print_json(value: &impl serde::Serialize) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load(input: &Path) -> Result<Project, ExitCode> {
    Project::load(input).map_err(|e| {
        let output = serde_json::json!({ "success": false, "error": e.to_string() });
        println!("{}", output);
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Defaults { component_type } => {
            if ComponentType::parse(&component_type).is_none() {
                let known: Vec<_> = ComponentType::ALL.iter().map(|t| t.as_str()).collect();
                let output = serde_json::json!({
                    "success": false,
                    "error": format!("Unknown component type: {}", component_type),
                    "known": known,
                });
                println!("{}", output);
                return ExitCode::FAILURE;
            }
            print_json(&default_attributes(&component_type))
        }

        Commands::Validate { input, strict } => {
            let project = match load(&input) {
                Ok(p) => p,
                Err(code) => return code,
            };
            let result = CompilationPipeline::new(failure_mode(strict)).validate(&project);
            let code = print_json(&result);
            if result.valid { code } else { ExitCode::from(2) }
        }

        Commands::Render { input, output } => {
            let project = match load(&input) {
                Ok(p) => p,
                Err(code) => return code,
            };
            let html = render(&project.document(), &project.settings);
            match output {
                Some(path) => match fs::write(&path, &html) {
                    Ok(()) => {
                        info!(path = %path.display(), bytes = html.len(), "wrote email");
                        ExitCode::SUCCESS
                    }
                    Err(e) => {
                        eprintln!("failed to write {}: {}", path.display(), e);
                        ExitCode::FAILURE
                    }
                },
                None => {
                    print!("{}", html);
                    ExitCode::SUCCESS
                }
            }
        }

        Commands::Compile { input, strict } => {
            let project = match load(&input) {
                Ok(p) => p,
                Err(code) => return code,
            };
            match CompilationPipeline::new(failure_mode(strict)).compile(&project) {
                Ok(email) => print_json(&serde_json::json!({
                    "success": true,
                    "email": email,
                })),
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    ExitCode::from(2)
                }
            }
        }
    }
}
