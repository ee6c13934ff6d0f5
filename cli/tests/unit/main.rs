//! Unit tests for the cats CLI
//!
//! These tests use scripted ports and tokio's paused clock, so they run fast
//! without spawning processes or touching the network.

mod helpers;
mod mocks;

mod config_store;
