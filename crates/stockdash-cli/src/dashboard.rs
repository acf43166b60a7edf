//! Dashboard state: the loaded category plus the analysis orchestrator

use crate::commands::{Command, SelectTarget};
use crate::render;
use chrono::{DateTime, Local};
use std::sync::Arc;
use stockdash_core::{
    AnalysisOrchestrator, AnalysisService, CategoryLoad, DashError, LifecycleState,
    MarketDataFetcher, Result, Stock, TriggerOutcome, catalog,
};
use tracing::debug;

/// Result of handling one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Exit,
}

/// Presentation layer: forwards user events and renders state
pub struct Dashboard {
    fetcher: MarketDataFetcher,
    service: Arc<dyn AnalysisService>,
    orchestrator: AnalysisOrchestrator,
    category: Option<&'static str>,
    stocks: Vec<Stock>,
    loaded_at: Option<DateTime<Local>>,
}

impl Dashboard {
    pub fn new(
        fetcher: MarketDataFetcher,
        service: Arc<dyn AnalysisService>,
        orchestrator: AnalysisOrchestrator,
    ) -> Self {
        Self {
            fetcher,
            service,
            orchestrator,
            category: None,
            stocks: Vec::new(),
            loaded_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.lifecycle().is_loading()
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn orchestrator(&self) -> &AnalysisOrchestrator {
        &self.orchestrator
    }

    /// Handle a command, rendering its outcome
    ///
    /// User mistakes come back as errors; the caller prints them and carries on.
    pub async fn handle(&mut self, command: Command) -> Result<Flow> {
        debug!(?command, "Handling command");
        self.orchestrator.poll_completions();

        let output = match command {
            Command::Categories => render::categories(self.fetcher.categories(), self.category),
            Command::List { category: Some(key) } => self.open(&key, false).await?,
            Command::List { category: None } => self.current_listing()?,
            Command::Refresh => {
                let key = self.category.ok_or_else(no_category)?;
                self.open(key, true).await?
            }
            Command::Select { target } => {
                let stock = self.resolve(&target)?;
                self.orchestrator.select_stock(stock);
                self.status()
            }
            Command::Analyze { symbol } => {
                if let Some(symbol) = symbol {
                    let stock = self.resolve(&SelectTarget::Symbol(symbol))?;
                    self.orchestrator.select_stock(stock);
                }
                self.analyze()
            }
            Command::Status => self.status(),
            Command::Cancel => {
                if self.orchestrator.cancel() {
                    self.status()
                } else {
                    "Nothing to cancel.".to_string()
                }
            }
            Command::Health => match self.service.health().await {
                Ok(()) => format!("Analysis service ({}) is healthy.", self.service.name()),
                Err(error) => format!("Analysis service is unavailable: {error}"),
            },
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(Flow::Exit),
        };

        Ok(Flow::Continue(output))
    }

    /// Wait for the running analysis and render its outcome
    pub async fn wait_for_analysis(&mut self) -> String {
        self.orchestrator.wait_for_outcome().await;
        self.status()
    }

    pub fn status(&self) -> String {
        render::lifecycle(self.orchestrator.lifecycle(), self.orchestrator.deadline())
    }

    fn analyze(&mut self) -> String {
        match self.orchestrator.trigger_analysis() {
            TriggerOutcome::Started { .. } => self.status(),
            TriggerOutcome::AlreadyLoading => {
                "An analysis is already running; wait for it or `cancel` it.".to_string()
            }
            TriggerOutcome::NoSelection => {
                "Select a stock first with `select <symbol>`.".to_string()
            }
        }
    }

    async fn open(&mut self, key: &str, refresh: bool) -> Result<String> {
        let category = catalog::find(key)
            .ok_or_else(|| DashError::InvalidInput(format!("Unknown category: {key}")))?;

        let load = if refresh {
            self.fetcher.reload_category(category.key).await
        } else {
            self.fetcher.load_category(category.key).await
        };
        Ok(self.apply_load(category.key, load))
    }

    fn apply_load(&mut self, key: &'static str, load: CategoryLoad) -> String {
        self.category = Some(key);
        self.stocks = load.stocks;
        self.loaded_at = Some(Local::now());

        // Keep the selection's snapshot in step with the refreshed list
        let refreshed = self.orchestrator.lifecycle().selected().and_then(|selected| {
            self.stocks
                .iter()
                .find(|s| s.symbol == selected.symbol)
                .cloned()
        });
        if let Some(stock) = refreshed {
            self.orchestrator.select_stock(stock);
        }

        match load.error {
            Some(error) => render::fetch_error(key, &error),
            None => self.listing(key),
        }
    }

    fn current_listing(&self) -> Result<String> {
        let key = self.category.ok_or_else(no_category)?;
        Ok(self.listing(key))
    }

    fn listing(&self, key: &str) -> String {
        let title = catalog::find(key).map_or(key, |c| c.title);
        let selected = self
            .orchestrator
            .lifecycle()
            .selected()
            .map(|s| s.symbol.as_str());
        render::stocks(title, &self.stocks, selected, self.loaded_at)
    }

    /// Find a stock among the ones currently on screen
    fn resolve(&self, target: &SelectTarget) -> Result<Stock> {
        if self.stocks.is_empty() {
            return Err(no_category());
        }
        let found = match target {
            SelectTarget::Row(row) => row.checked_sub(1).and_then(|i| self.stocks.get(i)),
            SelectTarget::Symbol(symbol) => self
                .stocks
                .iter()
                .find(|s| s.symbol.eq_ignore_ascii_case(symbol)),
        };
        found.cloned().ok_or_else(|| {
            let what = match target {
                SelectTarget::Row(row) => format!("row {row}"),
                SelectTarget::Symbol(symbol) => symbol.clone(),
            };
            DashError::InvalidInput(format!("{what} is not in the current list"))
        })
    }

    /// Wait for any running analysis, then report the state it ended in
    pub async fn settle(&mut self) -> LifecycleState {
        self.orchestrator.wait_for_outcome().await
    }

    /// Outcome of the last analysis as a result, for non-interactive runs
    pub fn analysis_outcome(&self) -> Result<()> {
        let lifecycle = self.orchestrator.lifecycle();
        match lifecycle.state() {
            LifecycleState::Success => Ok(()),
            LifecycleState::Failed => Err(lifecycle.error().cloned().map_or_else(
                || DashError::InvalidInput("Analysis failed".to_string()),
                DashError::Analysis,
            )),
            state => Err(DashError::InvalidInput(format!(
                "No analysis completed (state: {state})"
            ))),
        }
    }
}

fn no_category() -> DashError {
    DashError::InvalidInput("No category loaded. Use `list <category>` first.".to_string())
}
