//! E2E test harness entry point
//!
//! This file is the test binary that runs the browser acceptance specs.
//! Run with: cargo test --package calculadora-e2e --test e2e -- [options]
//!
//! Without Playwright on the machine the run is skipped unless `--strict`
//! is given.

use std::path::PathBuf;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use calculadora_e2e::{E2eError, E2eResult, TestRunner};
use calculadora_e2e::playwright::{Browser, PlaywrightConfig, PlaywrightHandle};
use calculadora_e2e::runner::{default_specs_dir, RunnerConfig, TestSuiteResult};
use calculadora_e2e::server::{default_binary_path, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "calculadora-e2e")]
#[command(about = "Browser acceptance tests for Calculadora")]
#[command(ignore_errors = true)]
struct Args {
    /// Path to test specs directory
    #[arg(short, long, default_value_os_t = default_specs_dir())]
    specs: PathBuf,

    /// Run only tests matching this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only a specific test (or all cases of a parameterised spec) by name
    #[arg(short, long)]
    name: Option<String>,

    /// Test an already-running server instead of spawning one
    #[arg(long, env = "APP_BASE_URL")]
    base_url: Option<String>,

    /// Path to web server binary
    #[arg(long, default_value_os_t = default_binary_path())]
    server_binary: PathBuf,

    /// Port to run server on (0 = auto)
    #[arg(long, default_value = "0")]
    port: u16,

    /// Forward server logs to stderr
    #[arg(long)]
    server_logs: bool,

    /// Browser to use
    #[arg(long, value_enum, default_value_t = Browser::Chromium)]
    browser: Browser,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    viewport_width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    viewport_height: u32,

    /// Module search path containing the `playwright` package
    #[arg(long, env = "NODE_PATH")]
    node_path: Option<PathBuf>,

    /// Fail instead of skipping when Playwright is not installed
    #[arg(long)]
    strict: bool,

    /// Output directory for results
    #[arg(short, long, default_value = "test-results")]
    output: PathBuf,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = PlaywrightHandle::check_playwright_installed() {
        if args.strict {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
        warn!("{} - skipping browser acceptance tests", e);
        return;
    }

    // Run async main
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {}", e);
            std::process::exit(2);
        }
    };
    let result = rt.block_on(async_main(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

async fn async_main(args: Args) -> E2eResult<bool> {
    let config = RunnerConfig {
        server: ServerConfig {
            binary_path: args.server_binary,
            port: if args.port == 0 { None } else { Some(args.port) },
            show_logs: args.server_logs,
            ..Default::default()
        },
        playwright: PlaywrightConfig {
            viewport_width: args.viewport_width,
            viewport_height: args.viewport_height,
            browser: args.browser,
            headless: !args.headed,
            node_path: args.node_path,
            screenshot_dir: args.output.join("screenshots"),
            ..Default::default()
        },
        base_url: args.base_url.filter(|u| !u.trim().is_empty()),
        specs_dir: args.specs,
        output_dir: args.output,
    };

    let mut runner = TestRunner::with_config(config);

    // Start server
    runner.start_server().await?;

    // Run tests
    let results: TestSuiteResult = if let Some(name) = args.name {
        runner.run_named(&name).await?
    } else if let Some(tag) = args.tag {
        runner.run_tagged(&tag).await?
    } else {
        runner.run_all().await?
    };

    if results.total == 0 {
        return Err(E2eError::SpecParse("no specs selected".to_string()));
    }

    // Write results
    runner.write_results(&results)?;

    Ok(results.failed == 0)
}
