//! Market data: quote normalization and per-category fetching

pub mod fetcher;
pub mod normalizer;

pub use fetcher::{CategoryLoad, MarketDataFetcher};
pub use normalizer::{normalize, normalize_category};
