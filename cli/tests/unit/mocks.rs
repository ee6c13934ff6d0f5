//! Shared mock infrastructure for unit tests.
//!
//! Scripted implementations of the application ports. Responses are chosen
//! by the first matching rule; a rule with several responses hands them out
//! in order and then repeats the last one.

#![allow(dead_code, clippy::expect_used)]

use std::any::Any;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use cats_cli::application::ports::{CommandRunner, HttpFetcher, ProgressReporter, RulesFileWriter};

use crate::helpers::ok_output;

struct Script<T> {
    key: String,
    responses: VecDeque<T>,
}

fn next<T: Clone>(script: &mut Script<T>) -> T {
    if script.responses.len() > 1 {
        script.responses.pop_front().expect("non-empty script")
    } else {
        script.responses.front().cloned().expect("non-empty script")
    }
}

// ── Mock: command runner ──────────────────────────────────────────────────────

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    /// Arguments joined with single spaces.
    pub args: String,
    pub timeout: Duration,
}

/// `CommandRunner` answering by argument prefix. Unscripted commands succeed
/// with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    scripts: Mutex<Vec<Script<Output>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose joined arguments start with `prefix`.
    pub fn on(self, prefix: &str, responses: Vec<Output>) -> Self {
        assert!(!responses.is_empty(), "script for {prefix:?} needs a response");
        self.scripts.lock().expect("lock").push(Script {
            key: prefix.to_string(),
            responses: responses.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    /// Joined arguments of every call, in order.
    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.args).collect()
    }

    /// Position of the first command starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, Duration::from_secs(30))
            .await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let joined = args.join(" ");
        self.calls.lock().expect("lock").push(Call {
            program: program.to_string(),
            args: joined.clone(),
            timeout,
        });
        let mut scripts = self.scripts.lock().expect("lock");
        match scripts.iter_mut().find(|s| joined.starts_with(&s.key)) {
            Some(script) => Ok(next(script)),
            None => Ok(ok_output(b"")),
        }
    }
}

// ── Mock: HTTP fetcher ────────────────────────────────────────────────────────

/// `HttpFetcher` answering by URL substring. Unscripted URLs are refused.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<Vec<Script<Result<String, String>>>>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `fragment` with these bodies, in order.
    pub fn on(self, fragment: &str, bodies: &[&str]) -> Self {
        self.script(fragment, bodies.iter().map(|b| Ok((*b).to_string())).collect())
    }

    /// Answer URLs containing `fragment` with bodies or transport errors.
    pub fn script(self, fragment: &str, responses: Vec<Result<String, String>>) -> Self {
        assert!(!responses.is_empty(), "script for {fragment:?} needs a response");
        self.scripts.lock().expect("lock").push(Script {
            key: fragment.to_string(),
            responses: responses.into(),
        });
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("lock").clone()
    }
}

impl HttpFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.urls.lock().expect("lock").push(url.to_string());
        let mut scripts = self.scripts.lock().expect("lock");
        match scripts.iter_mut().find(|s| url.contains(&s.key)) {
            Some(script) => next(script).map_err(anyhow::Error::msg),
            None => anyhow::bail!("GET {url}: connection refused"),
        }
    }
}

// ── Mock: rules writer ────────────────────────────────────────────────────────

/// Keeps rules documents in memory and hands out a fixed path.
#[derive(Default)]
pub struct MemoryRulesWriter {
    written: Mutex<Vec<String>>,
}

impl MemoryRulesWriter {
    pub fn written(&self) -> Vec<String> {
        self.written.lock().expect("lock").clone()
    }
}

impl RulesFileWriter for MemoryRulesWriter {
    fn write_rules(&self, contents: &str) -> Result<(PathBuf, Box<dyn Any>)> {
        self.written.lock().expect("lock").push(contents.to_string());
        Ok((PathBuf::from("/tmp/CATS-sg-rules.json"), Box::new(())))
    }
}

// ── Mock: progress reporter ──────────────────────────────────────────────────

/// Records every event as `"step: ..."`, `"success: ..."` or `"warn: ..."`.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events
            .lock()
            .expect("lock")
            .push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("warn: {message}"));
    }
}
