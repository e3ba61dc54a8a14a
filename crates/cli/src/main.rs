//! umlgen CLI — turn class source into a UML outline from the terminal.
//!
//! Calls `umlgen-core` directly; `serve` hosts the `umlgen-http` router.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use umlgen_core::present::{to_ansi, to_html, to_json, to_plain};
use umlgen_core::types::UmlConfig;
use umlgen_core::{load_config_file, load_umlgen_config, UmlGenerator};

/// umlgen — compact UML outlines from C#, Java and similar class source.
#[derive(Parser)]
#[command(name = "umlgen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./.umlgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputStyle {
    /// ANSI italic/underline when stdout is a terminal, plain otherwise
    Auto,
    Plain,
    Ansi,
    Html,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the UML outline of a source file
    Render {
        /// Source file (default: stdin; `-` also reads stdin)
        file: Option<PathBuf>,

        /// How emphasis is shown
        #[arg(long, value_enum, default_value = "auto")]
        style: OutputStyle,

        /// Render methods as name(params)
        #[arg(long)]
        show_parameters: bool,
    },
    /// Show how every surviving line was classified
    Explain {
        /// Source file (default: stdin; `-` also reads stdin)
        file: Option<PathBuf>,
    },
    /// Serve the outline API over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8433")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1 (localhost)
        #[arg(long)]
        bind_all: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn resolve_config(path: Option<&Path>) -> UmlConfig {
    match path {
        Some(p) => load_config_file(p).unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            load_umlgen_config(&cwd)
        }
    }
}

fn read_input(file: Option<&Path>) -> String {
    match file {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p).unwrap_or_else(|e| {
            eprintln!("Could not read {}: {e}", p.display());
            std::process::exit(1);
        }),
        _ => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Could not read stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    }
}

fn stdout_is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    info!("Received Ctrl+C, shutting down...");
}

async fn serve(config: UmlConfig, port: u16, bind_all: bool) {
    let bind_addr = if bind_all { "0.0.0.0" } else { "127.0.0.1" };
    let listener = tokio::net::TcpListener::bind(format!("{bind_addr}:{port}"))
        .await
        .unwrap_or_else(|e| {
            error!(port = port, error = %e, "Could not bind to port");
            std::process::exit(1);
        });

    let state = Arc::new(umlgen_http::AppState::new(config));
    let app = umlgen_http::router(state);

    info!(addr = %format!("http://{bind_addr}:{port}"), "umlgen API listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match cli.command {
        Commands::Serve { .. } => "umlgen=info",
        _ => "umlgen=warn",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse().expect("static directive")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            file,
            style,
            show_parameters,
        } => {
            let mut config = resolve_config(cli.config.as_deref());
            config.show_parameters |= show_parameters;
            let code = read_input(file.as_deref());
            let runs = UmlGenerator::new(config).outline(&code).into_runs();

            if cli.json {
                let out = serde_json::to_string_pretty(&to_json(&runs)).unwrap_or_default();
                println!("{out}");
                return;
            }
            let text = match style {
                OutputStyle::Plain => to_plain(&runs),
                OutputStyle::Ansi => to_ansi(&runs),
                OutputStyle::Html => to_html(&runs),
                OutputStyle::Auto if stdout_is_terminal() => to_ansi(&runs),
                OutputStyle::Auto => to_plain(&runs),
            };
            if text.is_empty() {
                eprintln!("No class, field or method declarations found");
                return;
            }
            print!("{text}");
        }
        Commands::Explain { file } => {
            let config = resolve_config(cli.config.as_deref());
            let code = read_input(file.as_deref());
            let classification = UmlGenerator::new(config).classify(&code);

            if cli.json {
                let out = serde_json::to_string_pretty(&classification.lines).unwrap_or_default();
                println!("{out}");
            } else {
                for line in &classification.lines {
                    println!("{:<14} {}", line.kind.as_str(), line.text);
                }
                eprintln!(
                    "\n{} fields, {} methods, {} accessors",
                    classification.fields.len(),
                    classification.methods.len(),
                    classification.accessors.len()
                );
            }
        }
        Commands::Serve { port, bind_all } => {
            let config = resolve_config(cli.config.as_deref());
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .unwrap_or_else(|e| {
                    eprintln!("Could not start async runtime: {e}");
                    std::process::exit(1);
                });
            runtime.block_on(serve(config, port, bind_all));
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "umlgen", &mut std::io::stdout());
        }
    }
}
