#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod errors;
mod runner;
mod types;
mod webdriver;

use errors::PagecheckError;
use runner::RunOptions;
use types::{CheckSuite, Outcome, OutputFormat, RunReport, ViewportSize};
use webdriver::BrowserType;

#[derive(Parser)]
#[command(name = "pagecheck")]
#[command(about = "Declarative page-assertion checker", long_about = None)]
struct Cli {
    /// Target URL to check
    url: String,

    /// Path to the JSON check suite
    suite: PathBuf,

    /// Browser to use
    #[arg(short, long, default_value = "firefox")]
    browser: String,

    /// WebDriver endpoint (defaults to the browser's standard port)
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Set viewport size (WIDTHxHEIGHT, e.g., 1920x1080)
    #[arg(long)]
    viewport: Option<String>,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,

    /// Bounded wait for element resolution, in seconds
    #[arg(long, default_value = "5")]
    timeout: u64,

    /// Save a full-page screenshot to this path after navigation
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": err.to_string(),
                "exit_code": err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<i32, PagecheckError> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagecheck=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr) // Output logs to stderr
                .with_target(false), // Don't show target module in logs
        )
        .init();

    let cli = Cli::parse();

    let suite_text = std::fs::read_to_string(&cli.suite)
        .map_err(|e| PagecheckError::Suite(format!("{}: {}", cli.suite.display(), e)))?;
    let suite = CheckSuite::from_json(&suite_text)
        .map_err(|e| PagecheckError::Suite(format!("{}: {}", cli.suite.display(), e)))?;

    // Bad option values are configuration problems, not check failures,
    // so they take the configuration exit code.
    let browser: BrowserType = cli.browser.parse().map_err(|e: anyhow::Error| {
        errors::ConfigError::InvalidOption {
            option: "--browser".to_string(),
            reason: e.to_string(),
        }
    })?;
    let viewport = cli
        .viewport
        .as_deref()
        .map(ViewportSize::parse)
        .transpose()
        .map_err(|e| errors::ConfigError::InvalidOption {
            option: "--viewport".to_string(),
            reason: e.to_string(),
        })?;

    let options = RunOptions {
        browser,
        webdriver_url: cli.webdriver_url,
        viewport,
        headless: !cli.no_headless,
        element_timeout: Duration::from_secs(cli.timeout),
        screenshot: cli.screenshot,
    };

    let report = runner::run(&cli.url, &suite.checks, &options).await?;

    print_report(&report, cli.format);

    Ok(report.exit_code())
}

fn print_report(report: &RunReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let (passed, failed, errored) = report.counts();
            let output = json!({
                "overall": report.overall(),
                "summary": {
                    "passed": passed,
                    "failed": failed,
                    "errored": errored,
                },
                "results": report.results,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Simple => {
            for result in &report.results {
                let marker = match result.outcome {
                    Outcome::Passed => "✓",
                    Outcome::Failed => "✗",
                    Outcome::Errored => "!",
                };
                if result.messages.is_empty() {
                    println!("{} {}", marker, result.name);
                } else {
                    println!("{} {}: {}", marker, result.name, result.messages.join("; "));
                }
            }
            let (passed, failed, errored) = report.counts();
            println!("{} passed, {} failed, {} errored", passed, failed, errored);
        }
    }
}
