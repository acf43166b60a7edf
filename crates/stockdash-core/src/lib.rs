//! Stock dashboard core
//!
//! This crate provides everything behind the dashboard's screens:
//!
//! - A static category catalog mapping category keys to symbols and display names
//! - Quote fetching from a market-data provider, one batched call per category,
//!   with tolerant normalization and a short-lived cache
//! - A client for the remote analysis service (`POST /analyze`, `GET /health`)
//! - The analysis orchestrator, which owns the request lifecycle
//!   (`Idle → Selected → Loading → Success | Failed`), enforces the deadline,
//!   classifies failures and discards responses from superseded requests
//!
//! # Example
//!
//! ```rust,ignore
//! use stockdash_core::{AnalysisOrchestrator, DashboardConfig, HttpAnalysisClient, MarketDataFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = DashboardConfig::default().with_env()?;
//!     let fetcher = MarketDataFetcher::from_config(&config)?;
//!     let service = Arc::new(HttpAnalysisClient::new(&config.analysis_base_url)?);
//!     let mut orchestrator = AnalysisOrchestrator::new(service, &config);
//!
//!     let stocks = fetcher.fetch_category("tech").await?;
//!     orchestrator.select_stock(stocks[0].clone());
//!     orchestrator.trigger_analysis();
//!     orchestrator.wait_for_outcome().await;
//!
//!     println!("{:?}", orchestrator.lifecycle().result());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod market;
pub mod model;
pub mod orchestrator;

// Re-export main types for convenience
pub use api::{AnalysisService, HttpAnalysisClient, HttpQuoteProvider, QuoteProvider, RawQuote};
pub use catalog::{CATEGORIES, Category};
pub use config::DashboardConfig;
pub use error::{AnalysisError, AnalysisErrorKind, DashError, FetchError, Result};
pub use market::{CategoryLoad, MarketDataFetcher};
pub use model::{
    AnalysisParams, AnalysisRequest, AnalysisResult, Interval, SemanticAnalysis, Stock,
    StockEcho, TechnicalAnalysis,
};
pub use orchestrator::{
    AnalysisLifecycle, AnalysisOrchestrator, Completion, LifecycleState, TriggerOutcome,
};
