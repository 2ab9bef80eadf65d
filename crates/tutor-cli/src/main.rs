//! tutor CLI: terminal math tutor

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tutor_engine::{config_path, discover_models, sessions_dir, Config, Session, TUTOR_DIR};

/// Snap a math problem and get tutored through it, step by step
#[derive(Parser)]
#[command(name = "tutor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Photo of a problem to open the tutor with directly
    #[arg(long, global = true)]
    image: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI (default when no command specified)
    Tui,

    /// Detect tutor backends and print diagnostics
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Initialize the .tutor directory and config
    Init,

    /// List saved tutoring sessions
    Sessions,
}

fn main() {
    let cli = Cli::parse();
    let root = std::env::current_dir().expect("Failed to get current directory");

    match cli.command {
        None | Some(Commands::Tui) => {
            cmd_tui(&root, cli.image.as_deref());
        }
        Some(Commands::Doctor { json }) => {
            cmd_doctor(json);
        }
        Some(Commands::Init) => {
            cmd_init(&root);
        }
        Some(Commands::Sessions) => {
            cmd_sessions(&root);
        }
    }
}

fn cmd_tui(root: &Path, image: Option<&Path>) {
    init_logging(root);

    let config = Config::load(&config_path(root)).unwrap_or_default();
    let models = discover_models();
    if !models.iter().any(tutor_engine::ModelInfo::ready) {
        eprintln!("No tutor backend found on PATH (claude, codex, or gemini).");
        eprintln!("The app will open, but sends will be unavailable. See `tutor doctor`.");
    }

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(tutor_tui::run_tui(root, config, models, image)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_doctor(json: bool) {
    let models = discover_models();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&models).expect("failed to serialize")
        );
        return;
    }

    println!("Backend Discovery Results\n");

    for model in &models {
        let status = if model.ready() { "ready" } else { "not found" };
        println!("  {} - {}", model.name, status);

        if let Some(path) = &model.path {
            println!("    Path: {path}");
        }
        if let Some(version) = &model.version {
            println!("    Version: {version}");
        }
        println!();
    }

    let ready_count = models.iter().filter(|m| m.ready()).count();
    println!("{ready_count} backend(s) ready");
}

fn cmd_init(root: &Path) {
    let path = config_path(root);
    if path.exists() {
        println!("{} already exists", path.display());
        return;
    }

    let detected: Vec<String> = discover_models()
        .into_iter()
        .filter(tutor_engine::ModelInfo::ready)
        .map(|m| m.name)
        .collect();

    let config = if detected.is_empty() {
        Config::default()
    } else {
        Config::with_detected_models(&detected)
    };

    match config.save(&path) {
        Ok(()) => {
            if let Err(e) = std::fs::create_dir_all(sessions_dir(root)) {
                eprintln!("Warning: could not create sessions directory: {e}");
            }
            println!("Initialized {}", path.display());
        }
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_sessions(root: &Path) {
    let dir = sessions_dir(root);
    let ids = match Session::list(&dir) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("Failed to list sessions: {e}");
            std::process::exit(1);
        }
    };

    if ids.is_empty() {
        println!("No saved sessions in {}", dir.display());
        return;
    }

    println!("Saved sessions (newest first):\n");
    for id in ids {
        match Session::load(&dir, &id) {
            Ok(session) => {
                let opened = session
                    .transcript
                    .messages()
                    .first()
                    .map(|m| m.text_content())
                    .unwrap_or_default();
                let title: String = opened.chars().take(48).collect();
                println!(
                    "  {}  {} message(s)  {}",
                    id,
                    session.transcript.len(),
                    title
                );
            }
            Err(e) => {
                println!("  {id}  (unreadable: {e})");
            }
        }
    }
}

/// Route tracing output to a log file; the TUI owns the terminal.
fn init_logging(root: &Path) {
    use tracing_subscriber::EnvFilter;

    let dir = root.join(TUTOR_DIR);
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("tutor.log")) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tutor starting");
}
