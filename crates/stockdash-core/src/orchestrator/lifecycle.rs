//! Analysis lifecycle state owned by the orchestrator

use crate::error::AnalysisError;
use crate::model::{AnalysisResult, Stock};
use std::fmt;

/// State tag of the analysis lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    #[default]
    Idle,
    Selected,
    Loading,
    Success,
    Failed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Phase with its payload; a result and an error can never coexist
#[derive(Debug, Clone, Default, PartialEq)]
enum Phase {
    #[default]
    Idle,
    Selected,
    Loading,
    Success(Box<AnalysisResult>),
    Failed(AnalysisError),
}

/// Read view of the current analysis cycle
///
/// `Idle` is the only state without a selected stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisLifecycle {
    phase: Phase,
    selected: Option<Stock>,
    generation: u64,
}

impl AnalysisLifecycle {
    pub fn state(&self) -> LifecycleState {
        match self.phase {
            Phase::Idle => LifecycleState::Idle,
            Phase::Selected => LifecycleState::Selected,
            Phase::Loading => LifecycleState::Loading,
            Phase::Success(_) => LifecycleState::Success,
            Phase::Failed(_) => LifecycleState::Failed,
        }
    }

    pub fn selected(&self) -> Option<&Stock> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Success(result) => Some(&**result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.phase {
            Phase::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Generation of the current (or most recent) request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    pub(crate) fn select(&mut self, stock: Stock, generation: u64) {
        self.selected = Some(stock);
        self.phase = Phase::Selected;
        self.generation = generation;
    }

    /// Replace the snapshot of the already-selected stock, keeping the phase
    pub(crate) fn refresh_selection(&mut self, stock: Stock) {
        self.selected = Some(stock);
    }

    pub(crate) fn begin_loading(&mut self, generation: u64) {
        self.phase = Phase::Loading;
        self.generation = generation;
    }

    pub(crate) fn succeed(&mut self, result: AnalysisResult) {
        self.phase = Phase::Success(Box::new(result));
    }

    pub(crate) fn fail(&mut self, error: AnalysisError) {
        self.phase = Phase::Failed(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::AAPL_ANALYSIS;
    use std::time::Duration;

    fn aapl() -> Stock {
        Stock::new("AAPL", "Apple Inc.", 175.5, 1.2, 0.69)
    }

    #[test]
    fn test_initial_state() {
        let lifecycle = AnalysisLifecycle::default();
        assert_eq!(lifecycle.state(), LifecycleState::Idle);
        assert!(lifecycle.selected().is_none());
        assert_eq!(lifecycle.generation(), 0);
    }

    #[test]
    fn test_result_and_error_exclusive() {
        let mut lifecycle = AnalysisLifecycle::default();
        lifecycle.select(aapl(), 1);
        lifecycle.begin_loading(2);
        lifecycle.succeed(AnalysisResult::from_json(AAPL_ANALYSIS).unwrap());
        assert!(lifecycle.result().is_some());
        assert!(lifecycle.error().is_none());

        lifecycle.begin_loading(3);
        assert!(lifecycle.result().is_none());
        lifecycle.fail(AnalysisError::Timeout(Duration::from_secs(30)));
        assert!(lifecycle.result().is_none());
        assert_eq!(lifecycle.state(), LifecycleState::Failed);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(LifecycleState::Loading.to_string(), "loading");
    }
}
