//! Narrative drift dashboard in the terminal
//!
//! # Usage
//!
//! ```bash
//! # Point at the analytics service (defaults to http://localhost:8000/v1)
//! export DRIFT_API_URL="http://localhost:8000/v1"
//!
//! # Interactive dashboard
//! cargo run -p drift-cli -- --ticker msft
//!
//! # Fetch once, print, exit non-zero when the dashboard failed
//! cargo run -p drift-cli -- --ticker msft --once
//! ```

mod commands;

use clap::Parser;
use commands::Input;
use drift_dashboard::{
    DashboardConfig, DashboardHandle, Formatter, FormatterFactory, Layout, Orchestrator, Status,
};
use drift_utils::{LogFormat, init_tracing_with};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "drift")]
#[command(about = "Financial narrative drift dashboard", long_about = None)]
struct Args {
    /// Base URL of the analytics service
    #[arg(long)]
    base_url: Option<String>,

    /// Ticker to load on start
    #[arg(short, long)]
    ticker: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Load the initial ticker, print the settled dashboard and exit
    #[arg(long)]
    once: bool,

    /// One status line per update instead of the full dashboard
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<DashboardConfig> {
        let mut builder = DashboardConfig::builder();
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url.clone());
        }
        if let Some(ticker) = &self.ticker {
            builder = builder.initial_ticker(ticker.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        Ok(builder.with_env()?.build()?)
    }

    fn layout(&self) -> Layout {
        if self.compact {
            Layout::Compact
        } else {
            Layout::Terminal
        }
    }
}

fn print_banner(config: &DashboardConfig) {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║               Financial Narrative Drift Engine               ║
║                                                              ║
║  Type a ticker (e.g. MSFT) to load its signals.              ║
║    /retry  - Refetch the current ticker                      ║
║    /help   - Show help                                       ║
║    /exit   - Exit                                            ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
    println!("Service: {}", config.base_url);
    println!();
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    print!("drift> ");
    stdout.flush()
}

async fn run_once(handle: &DashboardHandle, formatter: &dyn Formatter) -> anyhow::Result<ExitCode> {
    let state = handle.settled().await?;
    println!("{}", formatter.format_state(&state));

    Ok(match state.status() {
        Status::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

async fn run_repl(handle: &DashboardHandle, formatter: &dyn Formatter) -> anyhow::Result<()> {
    let mut snapshots = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", formatter.format_state(&snapshots.borrow_and_update()));
    prompt()?;

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let rendered = formatter.format_state(&snapshots.borrow_and_update());
                println!("\n{rendered}");
                prompt()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!("\nGoodbye!");
                    break;
                };

                match Input::parse(&line) {
                    Ok(Input::Ticker(raw)) => match handle.set_ticker(raw).await {
                        Ok(Some(generation)) => debug!(%generation, "Ticker accepted"),
                        Ok(None) => {
                            println!("Already showing that ticker. Use /retry to refetch.");
                            prompt()?;
                        }
                        Err(e) => {
                            println!("{}", formatter.format_error(&e.to_string()));
                            prompt()?;
                        }
                    },
                    Ok(Input::Retry) => {
                        if handle.retry().await?.is_none() {
                            println!("{}", formatter.format_error("No ticker selected yet"));
                            prompt()?;
                        }
                    }
                    Ok(Input::Help) => {
                        println!("{}", formatter.format_help());
                        prompt()?;
                    }
                    Ok(Input::Exit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Err(commands::InputError::Empty) => prompt()?,
                    Err(e) => {
                        println!("{}", formatter.format_error(&e.to_string()));
                        prompt()?;
                    }
                }
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = dotenvy::dotenv();
    init_tracing_with("warn,drift_dashboard=info", LogFormat::from_env());

    let args = Args::parse();
    let config = args.config()?;
    let formatter = FormatterFactory::create(args.layout());

    info!(base_url = %config.base_url, ticker = %config.initial_ticker, "Starting drift dashboard");

    let (handle, task) = Orchestrator::from_config(&config)?.spawn();
    handle.set_ticker(config.initial_ticker.as_str()).await?;

    let code = if args.once {
        run_once(&handle, formatter.as_ref()).await?
    } else {
        print_banner(&config);
        run_repl(&handle, formatter.as_ref()).await?;
        ExitCode::SUCCESS
    };

    // The task may already be gone if the snapshot channel closed
    let _ = handle.shutdown().await;
    task.await?;
    Ok(code)
}
