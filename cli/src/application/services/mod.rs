//! Application services: use-case orchestration.
//!
//! Each service module composes domain logic with port trait calls. Services
//! import only from `crate::domain` and `crate::application::ports`, never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod cf;
pub mod poller;
pub mod probes;
pub mod scenarios;

pub use cf::{CfCli, PushSpec, Role};
pub use poller::{holds_throughout, poll_until};
pub use scenarios::{ScenarioContext, ScenarioId, run_suite};
