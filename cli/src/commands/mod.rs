//! Command implementations

pub mod config;
pub mod list;
pub mod poll;
pub mod run;
pub mod version;
