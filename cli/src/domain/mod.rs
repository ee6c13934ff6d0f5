//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod matcher;
pub mod naming;
pub mod platform;
pub mod poll;
pub mod security_group;

pub use config::{Credentials, SuiteConfig};
pub use error::{CfError, ConfigError, DecodeError, PolicyError};
pub use matcher::Matcher;
pub use naming::{NameKind, random_name};
pub use poll::{
    HoldSuccess, Observation, PollFailure, PollPolicy, PollState, PollSuccess, secs_f64,
};
pub use security_group::{Protocol, SecurityRule, render_rules};
