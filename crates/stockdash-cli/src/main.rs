//! Terminal stock dashboard
//!
//! Browse categories of quotes and request an AI analysis of one stock at a
//! time. Analysis runs in the background; the prompt stays usable while it
//! is in flight.

mod commands;
mod dashboard;
mod render;

use anyhow::Context;
use clap::Parser;
use commands::Command;
use dashboard::{Dashboard, Flow};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use stockdash_core::{
    AnalysisOrchestrator, AnalysisService, DashboardConfig, HttpAnalysisClient, Interval,
    MarketDataFetcher,
};
use stockdash_utils::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "stockdash")]
#[command(about = "Stock dashboard with on-demand AI analysis", long_about = None)]
struct Args {
    /// Analysis service base URL
    #[arg(long)]
    analysis_url: Option<String>,

    /// Quote provider base URL
    #[arg(long)]
    quote_url: Option<String>,

    /// Seconds to wait for an analysis before giving up
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Lookback window in days
    #[arg(long)]
    days_back: Option<u32>,

    /// Indicator sampling interval (1min, 5min, 15min, 30min, 60min, 1D, 1W, 1M)
    #[arg(long)]
    interval: Option<Interval>,

    /// Number of indicator samples
    #[arg(long)]
    limit: Option<u32>,

    /// Category to load on startup
    #[arg(short, long, default_value = "tech")]
    category: String,

    /// Analyze one symbol from the startup category, print the result and exit
    #[arg(short, long, value_name = "SYMBOL")]
    analyze: Option<String>,
}

impl Args {
    fn dashboard_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = DashboardConfig::default()
            .with_env()
            .context("Invalid environment configuration")?;

        if let Some(url) = &self.analysis_url {
            config.analysis_base_url.clone_from(url);
        }
        if let Some(url) = &self.quote_url {
            config.quote_base_url.clone_from(url);
        }
        if let Some(secs) = self.timeout_secs {
            config.analysis_timeout = Duration::from_secs(secs);
        }
        if let Some(days) = self.days_back {
            config.analysis_params.days_back = days;
        }
        if let Some(interval) = self.interval {
            config.analysis_params.technical_interval = interval;
        }
        if let Some(limit) = self.limit {
            config.analysis_params.technical_limit = limit;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (app, env_error) = match AppConfig::from_env() {
        Ok(app) => (app, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    stockdash_utils::init_tracing_with(app.default_log_filter());
    if let Some(e) = env_error {
        warn!(error = %e, environment = %app.environment, "Ignoring invalid environment setting");
    }

    let args = Args::parse();
    let config = args.dashboard_config()?;

    info!(
        environment = %app.environment,
        analysis_url = %config.analysis_base_url,
        quote_url = %config.quote_base_url,
        timeout_secs = config.analysis_timeout.as_secs(),
        "Starting {}",
        app.app_name
    );

    let service: Arc<dyn AnalysisService> = Arc::new(
        HttpAnalysisClient::new(&config.analysis_base_url)
            .context("Failed to create analysis client")?,
    );
    let fetcher =
        MarketDataFetcher::from_config(&config).context("Failed to create quote provider")?;
    let orchestrator = AnalysisOrchestrator::new(Arc::clone(&service), &config);
    let mut dashboard = Dashboard::new(fetcher, service, orchestrator);

    let startup = Command::List {
        category: Some(args.category.clone()),
    };

    if let Some(symbol) = args.analyze {
        return run_once(&mut dashboard, startup, &symbol).await;
    }

    print_flow(dashboard.handle(startup).await);
    println!("Type `help` for commands.");
    run_repl(&mut dashboard).await
}

/// Load the category, analyze `symbol` and print the outcome
async fn run_once(dashboard: &mut Dashboard, startup: Command, symbol: &str) -> anyhow::Result<()> {
    dashboard.handle(startup).await?;
    let command = Command::Analyze {
        symbol: Some(symbol.to_uppercase()),
    };
    print_flow(dashboard.handle(command).await);

    let state = dashboard.settle().await;
    println!("{}", dashboard.status());
    info!(%state, "Analysis finished");
    dashboard
        .analysis_outcome()
        .with_context(|| format!("Analysis of {symbol} did not succeed"))
}

async fn run_repl(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt(dashboard.is_loading())?;

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let flow = match Command::parse(&line) {
                    Ok(command) => dashboard.handle(command).await,
                    Err(e) => Err(e),
                };
                if matches!(flow, Ok(Flow::Exit)) {
                    break;
                }
                print_flow(flow);
            }
            output = dashboard.wait_for_analysis(), if dashboard.is_loading() => {
                println!("\n{output}");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_flow(flow: stockdash_core::Result<Flow>) {
    match flow {
        Ok(Flow::Continue(output)) => println!("{output}"),
        Ok(Flow::Exit) => {}
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
        }
    }
}

fn prompt(loading: bool) -> anyhow::Result<()> {
    let marker = if loading { "stockdash (analyzing)> " } else { "stockdash> " };
    print!("{marker}");
    std::io::stdout().flush().context("Failed to flush stdout")
}
