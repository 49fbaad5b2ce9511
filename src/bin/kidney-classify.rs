//! CLI binary for kidney-classify.
//!
//! A thin shim over the library crate: maps CLI flags to `ClientConfig`,
//! mounts a `Session`, uploads one image and prints the rendered view.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use kidney_classify::{
    connectivity_label, render_text, ClientConfig, ConnectivityStatus, Report, Session,
    UploadCandidate, UploadOutcome, ValidationError, ViewObserver, ViewState, DEFAULT_API_URL,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: a spinner while `Uploading`, a coloured status dot for
/// the liveness probe, and a warning line for refused files.
struct CliObserver {
    spinner: Mutex<Option<ProgressBar>>,
    show_progress: bool,
}

impl CliObserver {
    fn new(show_progress: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            show_progress,
        })
    }

    fn start_spinner(&self) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Analyzing");
        bar.set_message("processing your CT scan… this may take a few seconds");
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(bar);
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl ViewObserver for CliObserver {
    fn on_state_change(&self, state: &ViewState) {
        match state {
            ViewState::Uploading if self.show_progress => self.start_spinner(),
            _ => self.stop_spinner(),
        }
    }

    fn on_connectivity_change(&self, status: ConnectivityStatus) {
        if !self.show_progress {
            return;
        }
        let dot = match status {
            ConnectivityStatus::Connected => green("●"),
            ConnectivityStatus::Disconnected => red("●"),
            ConnectivityStatus::Checking => yellow("●"),
        };
        eprintln!("{dot} {}", connectivity_label(status));
    }

    fn on_advisory(&self, error: &ValidationError) {
        eprintln!("{} {}", yellow("⚠"), error);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Classify a scan against the local service
  kidney-classify scan.jpg

  # Point at another deployment
  kidney-classify --api-url https://kidney.example.org scan.png

  # Machine-readable result
  kidney-classify --json scan.jpg > result.json

  # Is the service up?
  kidney-classify --health-only

  # Model details / kick off retraining
  kidney-classify --model-info
  kidney-classify --train

ACCEPTED FILES:
  JPEG, JPG or PNG, at most 10 MB (10,485,760 bytes).

ENVIRONMENT VARIABLES:
  VITE_API_URL   Service base URL (default http://localhost:8080)
  RUST_LOG       Log filter, e.g. kidney_classify=debug

EXIT STATUS:
  0  result received (or service healthy with --health-only)
  1  upload failed, file refused, or service unreachable
"#;

/// Classify kidney CT scans with a remote CNN service.
#[derive(Parser, Debug)]
#[command(
    name = "kidney-classify",
    version,
    about = "Classify kidney CT scans with a remote CNN service",
    long_about = "Upload a kidney CT scan (JPEG or PNG) to a classification service and print \
the verdict: normal tissue or tumor detected. The service performs all inference; this tool \
validates, encodes and sends the image and renders the response.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JPEG or PNG image to classify.
    image: Option<PathBuf>,

    /// Base URL of the classification service.
    #[arg(long, env = "VITE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Timeout for the classification request in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Timeout for the health probe in seconds.
    #[arg(long, default_value_t = 10)]
    health_timeout: u64,

    /// Only probe /health and report connectivity.
    #[arg(long, conflicts_with_all = ["image", "model_info", "train"])]
    health_only: bool,

    /// Print the service's model information.
    #[arg(long, conflicts_with_all = ["image", "train"])]
    model_info: bool,

    /// Ask the service to start retraining in the background.
    #[arg(long, conflicts_with = "image")]
    train: bool,

    /// Print results as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Disable the spinner and status line.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except the result and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner is the user's feedback; keep INFO logs from tearing it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build session ────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let observer = CliObserver::new(show_progress);
    let session = Session::new(config)
        .context("Failed to create API client")?
        .with_observer(observer);

    // ── Auxiliary modes ──────────────────────────────────────────────────
    if cli.health_only {
        let status = session.check_connectivity().await;
        if cli.json {
            println!("{}", serde_json::json!({ "status": status }));
        } else if !show_progress {
            // The observer already printed the status line otherwise.
            println!("{}", connectivity_label(status));
        }
        return Ok(exit_for(status == ConnectivityStatus::Connected));
    }

    if cli.model_info {
        let info = session
            .client()
            .model_info()
            .await
            .context("Failed to fetch model info")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise model info")?
            );
        } else {
            println!("Model:       {}", info.model_type);
            println!("Input size:  {}", info.input_size);
            println!("Classes:     {}", info.classes.join(", "));
            println!("Framework:   {}", info.framework);
            println!("Version:     {}", info.version);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if cli.train {
        let status = session
            .client()
            .start_training()
            .await
            .context("Failed to start training")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&status).context("Failed to serialise status")?
            );
        } else {
            println!("{} {}", bold(&status.status), status.message);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // ── Classify ─────────────────────────────────────────────────────────
    let Some(ref path) = cli.image else {
        bail!("an IMAGE is required unless --health-only, --model-info or --train is given");
    };

    session.check_connectivity().await;

    let candidate = UploadCandidate::from_path(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    match session.upload(candidate).await {
        UploadOutcome::Completed(ViewState::Success(result)) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&Report::new(&result))
                    .context("Failed to serialise result")?;
                println!("{json}");
            } else {
                let marker = if result.is_normal() {
                    green("✔")
                } else {
                    red("⚠")
                };
                let text = render_text(&ViewState::Success(result));
                let (headline, rest) = text.split_once('\n').unwrap_or((text.as_str(), ""));
                println!("{marker} {}", bold(headline));
                println!("{}", dim(rest.trim_end()));
            }
            Ok(ExitCode::SUCCESS)
        }
        UploadOutcome::Completed(state) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&state).context("Failed to serialise state")?
                );
            } else {
                eprintln!("{} {}", red("✘"), render_text(&state));
            }
            Ok(ExitCode::FAILURE)
        }
        UploadOutcome::Rejected(reason) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "state": "rejected", "reason": reason.to_string() })
                );
            }
            // Text mode: the observer already printed the advisory.
            Ok(ExitCode::FAILURE)
        }
        other => bail!("upload did not complete: {other:?}"),
    }
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    ClientConfig::builder()
        .base_url(cli.api_url.as_str())
        .request_timeout_secs(cli.timeout)
        .health_timeout_secs(cli.health_timeout)
        .build()
        .context("Invalid configuration")
}

fn exit_for(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
