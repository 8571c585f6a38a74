//! Shared types, errors, and configuration for Finstat.
//!
//! This crate provides common pieces used by the engine and its front ends:
//! - Typed IDs for stable line item references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AgingConfig, AppConfig, EngineConfig, LogFormat, LoggingConfig, RatioConfig};
pub use error::{AppError, AppResult};
