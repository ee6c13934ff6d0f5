//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, HTTP,
//! filesystem access, configuration loading and log setup.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod http;
pub mod logging;

pub use command_runner::TokioCommandRunner;
pub use config::YamlConfigStore;
pub use fs::TempRulesWriter;
pub use http::UreqFetcher;
