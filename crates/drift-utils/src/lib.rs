//! Shared utilities for drift-rs
//!
//! This crate provides common functionality used across the drift-rs workspace,
//! including logging setup and typed access to environment configuration.

pub mod config;
pub mod logging;

pub use config::{ConfigError, env_parse, env_string};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
