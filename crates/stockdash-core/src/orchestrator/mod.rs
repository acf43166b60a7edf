//! Analysis request orchestrator
//!
//! Owns the [`AnalysisLifecycle`] and drives it through
//! `Idle → Selected → Loading → Success | Failed`.
//!
//! Each outbound request runs in its own tokio task that races the service
//! call against the deadline with [`tokio::time::timeout`]. The task reports
//! exactly one [`Completion`] tagged with the generation it was issued under.
//! Completions are applied only while their generation is current, so a
//! response for a superseded request can never touch the lifecycle.
//!
//! All mutation goes through `&mut self`; the presentation layer reads the
//! lifecycle through [`AnalysisOrchestrator::lifecycle`].
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdash_core::{AnalysisOrchestrator, DashboardConfig, HttpAnalysisClient, Stock};
//! use std::sync::Arc;
//!
//! let config = DashboardConfig::default();
//! let service = Arc::new(HttpAnalysisClient::new(&config.analysis_base_url)?);
//! let mut orchestrator = AnalysisOrchestrator::new(service, &config);
//!
//! orchestrator.select_stock(Stock::new("AAPL", "Apple Inc.", 175.5, 1.2, 0.69));
//! orchestrator.trigger_analysis();
//! let state = orchestrator.wait_for_outcome().await;
//! ```

mod lifecycle;

pub use lifecycle::{AnalysisLifecycle, LifecycleState};

use crate::api::AnalysisService;
use crate::config::DashboardConfig;
use crate::error::AnalysisError;
use crate::model::{AnalysisParams, AnalysisRequest, AnalysisResult, Stock};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Outcome of one request, tagged with the generation it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generation: u64,
    pub symbol: String,
    pub outcome: Result<AnalysisResult, AnalysisError>,
}

/// What [`AnalysisOrchestrator::trigger_analysis`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A request was issued under this generation
    Started { generation: u64 },
    /// A request is already in flight; nothing was issued
    AlreadyLoading,
    /// No stock is selected; nothing was issued
    NoSelection,
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Drives analysis requests for the selected stock
pub struct AnalysisOrchestrator {
    service: Arc<dyn AnalysisService>,
    params: AnalysisParams,
    deadline: Duration,
    lifecycle: AnalysisLifecycle,
    in_flight: Option<InFlight>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    requests_issued: u64,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator using the deadline and request parameters from `config`
    pub fn new(service: Arc<dyn AnalysisService>, config: &DashboardConfig) -> Self {
        Self::with_params(service, config.analysis_params, config.analysis_timeout)
    }

    pub fn with_params(
        service: Arc<dyn AnalysisService>,
        params: AnalysisParams,
        deadline: Duration,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            service,
            params,
            deadline,
            lifecycle: AnalysisLifecycle::default(),
            in_flight: None,
            completions_tx,
            completions_rx,
            requests_issued: 0,
        }
    }

    /// Current lifecycle, for rendering
    pub fn lifecycle(&self) -> &AnalysisLifecycle {
        &self.lifecycle
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Total number of requests handed to the service
    pub fn requests_issued(&self) -> u64 {
        self.requests_issued
    }

    /// Record `stock` as the analysis candidate
    ///
    /// Switching to a different symbol abandons any in-flight request and
    /// resets to `Selected`. Re-selecting the current symbol only refreshes
    /// the stored snapshot.
    pub fn select_stock(&mut self, stock: Stock) {
        let same_symbol = self
            .lifecycle
            .selected()
            .is_some_and(|current| current.symbol.eq_ignore_ascii_case(&stock.symbol));

        if same_symbol {
            self.lifecycle.refresh_selection(stock);
            return;
        }

        self.abandon_in_flight();
        let generation = self.lifecycle.generation() + 1;
        info!(symbol = %stock.symbol, generation, "Stock selected");
        self.lifecycle.select(stock, generation);
    }

    /// Issue one analysis request for the selected stock
    ///
    /// No-op while a request is in flight or when nothing is selected.
    pub fn trigger_analysis(&mut self) -> TriggerOutcome {
        let Some(stock) = self.lifecycle.selected() else {
            debug!("Analysis triggered without a selection");
            return TriggerOutcome::NoSelection;
        };

        if self.lifecycle.is_loading() {
            debug!(
                symbol = %stock.symbol,
                generation = self.lifecycle.generation(),
                "Analysis already in flight"
            );
            return TriggerOutcome::AlreadyLoading;
        }

        let request = self.params.request_for(stock.symbol.clone());
        let generation = self.lifecycle.generation() + 1;

        self.abandon_in_flight();
        self.lifecycle.begin_loading(generation);

        info!(
            symbol = %request.symbol,
            generation,
            deadline_secs = self.deadline.as_secs(),
            "Requesting analysis"
        );

        let handle = tokio::spawn(run_request(
            Arc::clone(&self.service),
            request,
            self.deadline,
            generation,
            self.completions_tx.clone(),
        ));
        self.in_flight = Some(InFlight { generation, handle });
        self.requests_issued += 1;

        TriggerOutcome::Started { generation }
    }

    /// Abandon the in-flight request and return to `Selected`
    ///
    /// Returns false when nothing was loading.
    pub fn cancel(&mut self) -> bool {
        if !self.lifecycle.is_loading() {
            return false;
        }
        let Some(stock) = self.lifecycle.selected().cloned() else {
            return false;
        };

        self.abandon_in_flight();
        let generation = self.lifecycle.generation() + 1;
        info!(symbol = %stock.symbol, generation, "Analysis cancelled");
        self.lifecycle.select(stock, generation);
        true
    }

    /// Apply one completion; returns whether the lifecycle changed
    ///
    /// Completions from any generation other than the current loading one
    /// are discarded.
    pub fn apply(&mut self, completion: Completion) -> bool {
        let current = self.lifecycle.generation();
        if completion.generation != current || !self.lifecycle.is_loading() {
            debug!(
                symbol = %completion.symbol,
                generation = completion.generation,
                current,
                "Discarding stale analysis completion"
            );
            return false;
        }

        self.in_flight = None;
        match completion.outcome {
            Ok(result) => {
                info!(symbol = %completion.symbol, generation = current, "Analysis succeeded");
                self.lifecycle.succeed(result);
            }
            Err(error) => {
                warn!(symbol = %completion.symbol, generation = current, %error, "Analysis failed");
                self.lifecycle.fail(error);
            }
        }
        true
    }

    /// Apply every completion that has already arrived, without waiting
    ///
    /// Returns the number that changed the lifecycle.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the current request resolves
    ///
    /// Returns immediately when not loading. Cancel-safe: dropping the
    /// future loses no completion.
    pub async fn wait_for_outcome(&mut self) -> LifecycleState {
        while self.lifecycle.is_loading() {
            let Some(completion) = self.completions_rx.recv().await else {
                break;
            };
            self.apply(completion);
        }
        self.lifecycle.state()
    }

    fn abandon_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            debug!(generation = in_flight.generation, "Aborting in-flight analysis");
            in_flight.handle.abort();
        }
    }
}

impl Drop for AnalysisOrchestrator {
    fn drop(&mut self) {
        self.abandon_in_flight();
    }
}

async fn run_request(
    service: Arc<dyn AnalysisService>,
    request: AnalysisRequest,
    deadline: Duration,
    generation: u64,
    completions: mpsc::UnboundedSender<Completion>,
) {
    let call = AssertUnwindSafe(service.analyze(&request)).catch_unwind();

    let outcome = match tokio::time::timeout(deadline, call).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(_)) => Err(AnalysisError::TransportFailure(format!(
            "{} panicked while handling the request",
            service.name()
        ))),
        Err(_) => Err(AnalysisError::Timeout(deadline)),
    };

    // The orchestrator may already be gone
    let _ = completions.send(Completion {
        generation,
        symbol: request.symbol,
        outcome,
    });
}
