mod api;
mod config;
mod dashboard;
mod metrics;
mod models;
mod render;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::api::HttpDashboardApi;
use crate::config::AppConfig;
use crate::dashboard::Dashboard;
use crate::render::render_dashboard;

#[derive(Parser)]
#[command(name = "stock-dashboard", about = "Terminal stock dashboard", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the API base URL from config
    #[arg(long, env = "DASH_BASE_URL", global = true)]
    base_url: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// List the companies served by the API
    Companies,

    /// Load one symbol and print a single frame
    Show {
        /// Ticker symbol, e.g. AAPL
        symbol: String,
    },

    /// Interactive mode: type a symbol per line (empty line refreshes, `q` quits)
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "stock_dashboard=info,warn",
        1 => "stock_dashboard=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    info!("API base URL: {}", config.api.base_url);

    let api = HttpDashboardApi::new(&config.api).context("Failed to build API client")?;
    let settle_timeout = config.dashboard.settle_timeout();
    let mut dash = Dashboard::new(Arc::new(api), config.dashboard);

    match cli.command {
        Command::Companies => {
            dash.load_companies();
            dash.settle().await;

            let syms = dash.companies();
            if syms.is_empty() {
                println!("No companies available.");
            } else {
                println!("{} companies:", syms.len());
                for s in syms {
                    println!("  {}", s);
                }
            }
        }

        Command::Show { symbol } => {
            let _t = utils::Timer::start(format!("Dashboard load for {}", symbol));
            dash.load_companies();
            dash.select(symbol);

            if tokio::time::timeout(settle_timeout, dash.settle()).await.is_err() {
                warn!("Gave up waiting after {:?}; rendering what has arrived", settle_timeout);
            }
            println!("{}", render_dashboard(&dash));
        }

        Command::Watch => watch(dash).await?,
    }

    Ok(())
}

async fn watch(mut dash: Dashboard) -> Result<()> {
    dash.load_companies();
    print_frame(&dash);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "q" | "quit" => break,
                    "" => {
                        if !dash.refresh() {
                            info!("Nothing selected yet");
                            continue;
                        }
                    }
                    symbol => dash.select(symbol),
                }
            }
            Some(event) = dash.next_event() => {
                if !dash.apply(event) {
                    continue;
                }
            }
        }
        print_frame(&dash);
    }

    Ok(())
}

fn print_frame(dash: &Dashboard) {
    println!("═════════════════════════════════════════════════════════════");
    println!("{}", render_dashboard(dash));
}
