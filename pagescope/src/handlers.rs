use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagescope_client::{FetchController, ScrapeClient};
use pagescope_core::Config;
use pagescope_core::config::API_BASE_ENV;
use pagescope_core::report::{ReportFormat, generate_report, save_report};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// What `scrape` should fetch and how to render it.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub target: String,
    /// Additional pages after the first one; `None` loads them all.
    pub extra_pages: Option<usize>,
    pub format: ReportFormat,
    pub show_progress: bool,
}

pub fn print_banner() {
    println!(
        "{} {}",
        "pagescope".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("{}", "scrape a page, browse its links".dimmed());
    println!();
}

/// Installs the stderr log subscriber used by the non-interactive commands.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Resolves configuration from the global `--api-base`/`--config` flags.
pub fn resolve_config(args: &ArgMatches) -> Result<Config> {
    let api_base = args.get_one::<String>("api-base").map(String::as_str);
    let config_path = args.get_one::<String>("config").map(String::as_str);
    Config::resolve(api_base, config_path).context("Failed to load configuration")
}

pub fn scrape_options(args: &ArgMatches) -> Result<ScrapeOptions> {
    let target = args
        .get_one::<String>("URL")
        .ok_or_else(|| anyhow!("A URL to scrape is required"))?
        .trim()
        .to_string();
    let extra_pages = if args.get_flag("all") {
        None
    } else {
        Some(args.get_one::<usize>("pages").copied().unwrap_or(0))
    };
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;

    Ok(ScrapeOptions {
        target,
        extra_pages,
        format,
        show_progress: true,
    })
}

fn spinner(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Scrapes `options.target`, follows pagination as requested and renders the
/// accumulated session.
///
/// A failed first request is an error. A failed follow-up page is reported
/// on stderr and the pages loaded so far are still rendered.
pub async fn scrape_report(config: &Config, options: &ScrapeOptions) -> Result<String> {
    let client = ScrapeClient::new(config)?;
    let mut controller = FetchController::new(client);

    let spinner = spinner(options.show_progress)?;
    spinner.set_message(format!("Scraping {}", options.target));

    if controller.submit(&options.target).await.is_none() {
        spinner.finish_and_clear();
        return Err(anyhow!("A URL to scrape is required"));
    }
    if let Some(error) = controller.error() {
        spinner.finish_and_clear();
        return Err(anyhow!("{}", error));
    }

    if controller.state().can_load_more() && options.extra_pages != Some(0) {
        spinner.set_message("Loading more URLs");
        controller.load_pages(options.extra_pages).await;
    }
    spinner.finish_and_clear();

    if let Some(error) = controller.error() {
        eprintln!("{} {}", "⚠".yellow().bold(), error.yellow());
    }

    let session = controller
        .session()
        .ok_or_else(|| anyhow!("The scrape produced no results"))?;
    let report = generate_report(session, &options.target, options.format)?;
    Ok(report)
}

/// Writes `report` to `output`, or prints it when no path is given.
pub fn write_report(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            save_report(report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}

pub async fn handle_scrape(args: &ArgMatches, config: &Config, quiet: bool) -> Result<()> {
    let mut options = scrape_options(args)?;
    options.show_progress = !quiet;
    let output = args.get_one::<PathBuf>("output");

    let report = scrape_report(config, &options).await?;
    write_report(&report, output.map(PathBuf::as_path))
}

/// Runs the interactive viewer on a blocking thread; requests it issues are
/// spawned back onto the current runtime.
pub async fn handle_ui(args: &ArgMatches, config: &Config) -> Result<()> {
    let client = ScrapeClient::new(config)?;
    let initial_url = args.get_one::<String>("URL").cloned();
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || pagescope_tui::run(client, initial_url, runtime))
        .await
        .context("Viewer thread panicked")?
}

pub fn handle_config(config: &Config) {
    let source = if std::env::var(API_BASE_ENV).is_ok() {
        format!(" (from {})", API_BASE_ENV)
    } else {
        String::new()
    };

    println!("{}", "CONFIGURATION".bright_blue().bold());
    println!(
        "  {:<14}{}{}",
        "API base:",
        config.api_base_url.bright_white(),
        source.dimmed()
    );
    println!("  {:<14}{}s", "Timeout:", config.timeout_secs);
    println!("  {:<14}{}", "User agent:", config.user_agent);
}
