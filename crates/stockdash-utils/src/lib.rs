//! Shared utilities for stockdash
//!
//! This crate provides common functionality used across the stockdash workspace,
//! including logging setup and application-level configuration.

pub mod config;
pub mod logging;

pub use config::{AppConfig, Environment};
pub use logging::{init_tracing, init_tracing_with};
