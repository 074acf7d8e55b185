//! web-snapshot CLI
//!
//! Captures one URL per invocation. Exit codes: 0 success, 1 capture
//! failure, 2 setup failure (logging or browser launch).

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use web_snapshot::config::DEFAULT_OUTPUT_DIR;
use web_snapshot::logging::{self, LogLevel};
use web_snapshot::{BrowserConfig, ChromeSession, SnapshotConfig, WebSnapshot};

/// Web Snapshot Tool
#[derive(Parser, Debug)]
#[command(name = "web-snapshot")]
#[command(version)]
#[command(about = "Capture a full-page screenshot and JSON metadata for a URL")]
struct Args {
    /// URL of the webpage to capture
    #[arg(long)]
    url: String,

    /// Directory to store screenshots and JSON files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Additional wait time in seconds, applied regardless of page stability
    #[arg(long)]
    wait_time: Option<u64>,

    /// Directory for snapshot.log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Disable the Chromium sandbox (needed in most containers)
    #[arg(long)]
    no_sandbox: bool,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Upper bound on lazy-load scroll passes
    #[arg(long, default_value = "10")]
    max_scroll_passes: u32,
}

impl Args {
    fn snapshot_config(&self) -> SnapshotConfig {
        let mut builder = SnapshotConfig::builder()
            .output_dir(self.output_dir.clone())
            .max_scroll_passes(self.max_scroll_passes);
        if let Some(secs) = self.wait_time {
            builder = builder.fixed_wait_secs(secs);
        }
        builder.build()
    }

    fn browser_config(&self) -> BrowserConfig {
        let mut builder = BrowserConfig::builder()
            .headless(!self.headed)
            .sandbox(!self.no_sandbox);
        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_path(path.clone());
        }
        builder.build()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_level, &args.log_dir) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(2);
    }

    match run(&args).await {
        Ok(Some(result)) => {
            println!(
                "Screenshot and JSON data saved successfully: {}",
                result.screenshot_path.display()
            );
            println!("{}", result.metadata_path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("Failed to capture screenshot");
            ExitCode::from(1)
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Launch the browser and capture. `Ok(None)` means the capture itself failed.
async fn run(args: &Args) -> anyhow::Result<Option<web_snapshot::CaptureResult>> {
    tracing::info!("{} {} starting", web_snapshot::NAME, web_snapshot::VERSION);

    let session = ChromeSession::with_config(args.browser_config())
        .await
        .context("browser setup failed")?;

    let snapshot = WebSnapshot::new(session, args.snapshot_config());
    Ok(snapshot.capture_and_close(&args.url).await.ok())
}
