//! BugAI Command Line
//!
//! Terminal surface for the BugAI session core. Each invocation drives one
//! [`Workbench`] through a short sequence of UI events and prints what a
//! graphical surface would show.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a file
//! bugai analyze src/app.py --language python
//!
//! # Analyze stdin in a language without a syntax mode, export a report
//! cat main.hs | bugai analyze - --language other --name Haskell --export
//!
//! # Browse and replay history
//! bugai history
//! bugai replay 0 --export
//!
//! # Wipe history without prompting
//! bugai clear-history --yes
//! ```
//!
//! # Environment Variables
//!
//! - `BUGAI_API_URL`: service base URL (default: `http://localhost:8000`)
//! - `BUGAI_TIMEOUT_SECS`: request timeout in seconds (default: 120)
//! - `BUGAI_REPORT_DIR`: where reports are written (default: `.`)
//! - `BUGAI_CONFIG`: explicit config file
//! - `RUST_LOG`: log filter (default: `bugai=info,bugai_core=info`)
//!
//! # Exit Status
//!
//! Non-zero when the analysis ends in an error state.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use bugai_core::source::lookup_language;
use bugai_core::{
    load_config, ConfigOverrides, HttpAnalysisService, SpeechEngine, Surfaces, UiEvent,
    UtteranceId, ViewState, Workbench, LANGUAGES,
};

/// BugAI code analysis from the terminal
#[derive(Debug, Parser)]
#[command(name = "bugai", version, about)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/bugai/client.toml)
    #[arg(long, global = true, env = "BUGAI_CONFIG")]
    config: Option<PathBuf>,

    /// Analysis service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Directory for exported reports
    #[arg(long, global = true)]
    report_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a source file (`-` reads stdin)
    Analyze {
        /// File to analyze
        file: PathBuf,

        /// Syntax mode (e.g. python, rust, text/x-java) or `other`
        #[arg(short, long)]
        language: String,

        /// Language name when `--language other`
        #[arg(long)]
        name: Option<String>,

        /// Save a report for the result
        #[arg(long)]
        export: bool,

        /// Print the narration of the findings
        #[arg(long)]
        read_aloud: bool,
    },

    /// List past analyses
    History,

    /// Show a past analysis again
    Replay {
        /// Index from `bugai history`
        index: usize,

        /// Save a report for the replayed analysis
        #[arg(long)]
        export: bool,
    },

    /// Delete all past analyses
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List recognized syntax modes
    Languages,
}

/// Speech engine that prints narration to stdout
struct ConsoleSpeech;

impl SpeechEngine for ConsoleSpeech {
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, _id: UtteranceId, text: &str) {
        println!("\u{1F50A} {text}");
    }

    fn cancel(&mut self) {}
}

type CliWorkbench = Workbench<HttpAnalysisService>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bugai=info,bugai_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();

    if let Command::Languages = cli.command {
        for mode in LANGUAGES {
            println!("{:<16} {}", mode.mime, mode.name);
        }
        println!("{:<16} (free text via --name)", bugai_core::OTHER_MIME);
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = load_config(&ConfigOverrides {
        config_path: cli.config.clone(),
        api_base_url: cli.api_url.clone(),
        request_timeout_secs: cli.timeout,
        report_dir: cli.report_dir.clone(),
    })?;
    tracing::debug!(source = ?loaded.source, "Using configuration");

    let service = Arc::new(HttpAnalysisService::from_config(&loaded.config)?);
    let mut surfaces = Surfaces::headless(&loaded.config.report_dir);
    surfaces.speech = Box::new(ConsoleSpeech);
    let mut workbench = Workbench::new(service, surfaces);

    let status = match cli.command {
        Command::Analyze {
            file,
            language,
            name,
            export,
            read_aloud,
        } => {
            let code = read_source(&file).await?;
            analyze(&mut workbench, code, language, name, export, read_aloud).await
        }
        Command::History => {
            workbench
                .handle_event(UiEvent::SwitchTab(bugai_core::AppTab::History))
                .await;
            print!("{}", workbench.history_view());
            ExitCode::SUCCESS
        }
        Command::Replay { index, export } => replay(&mut workbench, index, export).await?,
        Command::ClearHistory { yes } => clear_history(&mut workbench, yes).await?,
        Command::Languages => ExitCode::SUCCESS,
    };

    Ok(status)
}

/// Read the code to analyze from a file, or stdin for `-`
async fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        tokio::io::stdin()
            .read_to_string(&mut code)
            .await
            .context("Failed to read code from stdin")?;
        return Ok(code);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

async fn analyze(
    workbench: &mut CliWorkbench,
    code: String,
    language: String,
    name: Option<String>,
    export: bool,
    read_aloud: bool,
) -> ExitCode {
    // An unknown key doubles as the free-text name
    let name = name.or_else(|| {
        (language != bugai_core::OTHER_MIME && lookup_language(&language).is_none())
            .then(|| language.clone())
    });

    workbench.handle_event(UiEvent::SetCode(code)).await;
    workbench.handle_event(UiEvent::SelectLanguage(language)).await;
    if let Some(name) = name {
        workbench.handle_event(UiEvent::SetOtherLanguage(name)).await;
    }
    workbench.handle_event(UiEvent::Submit).await;

    print!("{}", workbench.view());
    if matches!(workbench.view_state(), ViewState::Error(_)) {
        return ExitCode::FAILURE;
    }

    if read_aloud {
        println!();
        workbench.handle_event(UiEvent::ToggleNarration).await;
        show_dialog(workbench);
    }
    if export {
        save_report(workbench).await;
    }
    ExitCode::SUCCESS
}

async fn replay(
    workbench: &mut CliWorkbench,
    index: usize,
    export: bool,
) -> anyhow::Result<ExitCode> {
    workbench.refresh_history().await;
    if !workbench.select_history(index) {
        print!("{}", workbench.history_view());
        anyhow::bail!("No history entry at index {index}");
    }

    if let Some(session) = workbench.current_session() {
        println!(
            "Replaying analysis from {}",
            bugai_core::display_timestamp(&session.timestamp)
        );
        println!();
    }
    print!("{}", workbench.view());

    if export {
        save_report(workbench).await;
    }
    Ok(ExitCode::SUCCESS)
}

async fn clear_history(workbench: &mut CliWorkbench, yes: bool) -> anyhow::Result<ExitCode> {
    workbench.handle_event(UiEvent::RequestClearHistory).await;

    let confirmed = if yes {
        true
    } else {
        if let Some(dialog) = workbench.modal_view() {
            println!("{}\n{}", dialog.title, dialog.body);
        }
        prompt_yes_no("Clear all history? [y/N] ").await?
    };

    if confirmed {
        workbench.handle_event(UiEvent::ConfirmModal).await;
        print!("{}", workbench.history_view());
    } else {
        workbench.handle_event(UiEvent::CancelModal).await;
        println!("Cancelled.");
    }
    Ok(ExitCode::SUCCESS)
}

async fn save_report(workbench: &mut CliWorkbench) {
    workbench.handle_event(UiEvent::DownloadReport).await;
    match workbench.last_report() {
        Some(path) => println!("\nReport saved to {}", path.display()),
        None => show_dialog(workbench),
    }
}

/// Print an open notice and dismiss it
fn show_dialog(workbench: &mut CliWorkbench) {
    if let Some(dialog) = workbench.modal_view() {
        eprintln!("{}: {}", dialog.title, dialog.body);
        workbench.cancel_modal();
    }
}

async fn prompt_yes_no(question: &str) -> anyhow::Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(question.as_bytes())
        .await
        .context("Failed to write prompt")?;
    stdout.flush().await.context("Failed to flush stdout")?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("Failed to read answer")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
