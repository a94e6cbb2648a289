//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docindex_core::pipeline::{self, BuildReport, ProgressReporter};
use docindex_shared::{AppConfig, PipelineConfig, init_config, load_config, load_config_from};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docindex: content import and search index builder.
#[derive(Parser)]
#[command(
    name = "docindex",
    version,
    about = "Import project documents into the content store and build search-index.json.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Project root directory.
    #[arg(long, default_value = ".", global = true, env = "DOCINDEX_ROOT")]
    pub root: PathBuf,

    /// Config file (defaults to <root>/docindex.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Import sources, resolve routes and write the search index.
    Build,

    /// Import well-known sources into the content store only.
    Import,

    /// Print the route map resolved from the page tree.
    Routes,

    /// Rebuild the search index from the current content store.
    Index,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docindex=info",
        1 => "docindex=debug",
        _ => "docindex=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let root = cli.root.as_path();
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Build => cmd_build(root, config_path).await,
        Command::Import => cmd_import(root, config_path).await,
        Command::Routes => cmd_routes(root, config_path).await,
        Command::Index => cmd_index(root, config_path).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(root),
            ConfigAction::Show => cmd_config_show(root, config_path),
        },
    }
}

/// `--config` wins over `<root>/docindex.toml`, which wins over defaults.
fn resolve_app_config(root: &Path, config_path: Option<&Path>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(root)?,
    };
    Ok(config)
}

fn resolve_pipeline_config(root: &Path, config_path: Option<&Path>) -> Result<PipelineConfig> {
    if !root.is_dir() {
        return Err(eyre!("project root '{}' is not a directory", root.display()));
    }
    let app = resolve_app_config(root, config_path)?;
    Ok(PipelineConfig::from_app_config(root, &app)?)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_pipeline_config(root, config_path)?;
    info!(root = %root.display(), "building search index");

    let reporter = CliProgress::new();
    let report = pipeline::build(&config, &reporter).await?;

    print_report(&report);
    Ok(())
}

async fn cmd_import(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_pipeline_config(root, config_path)?;

    let reporter = CliProgress::new();
    let imported = pipeline::import(&config, &reporter).await?;
    reporter.spinner.finish_and_clear();

    println!();
    if imported.is_empty() {
        println!("  No well-known sources found in {}", root.display());
    }
    for doc in &imported {
        println!(
            "  {:<10} {} → {}",
            doc.kind,
            doc.source_path.display(),
            doc.content_path
        );
    }
    println!();

    Ok(())
}

async fn cmd_routes(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_pipeline_config(root, config_path)?;
    let routes = pipeline::routes(&config).await?;
    println!("{}", serde_json::to_string_pretty(&routes)?);
    Ok(())
}

async fn cmd_index(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_pipeline_config(root, config_path)?;
    info!(root = %root.display(), "rebuilding search index from content store");

    let reporter = CliProgress::new();
    let report = pipeline::index(&config, &reporter).await?;

    print_report(&report);
    Ok(())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    let path = init_config(root)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_app_config(root, config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_report(report: &BuildReport) {
    println!();
    println!("  Search index written!");
    println!("  Imported: {}", report.imported.len());
    println!("  Routes:   {}", report.route_count);
    println!("  Scanned:  {}", report.documents_scanned);
    println!("  Entries:  {}", report.entry_count);
    if report.skipped_empty > 0 {
        println!("  Skipped:  {} (no text)", report.skipped_empty);
    }
    println!("  Path:     {}", report.artifact.path.display());
    println!("  SHA-256:  {}", report.artifact.sha256);
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}
