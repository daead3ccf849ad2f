//! Fake process runner and database for orchestrator and importer tests.
//!
//! Both fakes record every call so tests can assert ordering, and can be
//! scripted to fail on invocations matching a substring, without spawning
//! processes or opening connections.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use mintpipe::db::Database;
use mintpipe::errors::{PipelineError, Result};
use mintpipe::exec::{CommandSpec, ProcessRunner, StdoutMode};
use mintpipe::fs::FileSystem;
use mintpipe::fs::mock::MockFileSystem;

/// A fake process runner that:
/// - records every `CommandSpec` it was asked to run
/// - writes scripted SQL into the capture file (on the mock filesystem) for
///   capturing specs, like raster2pgsql writing its staging output
/// - fails with a scripted exit code when the command line contains a given
///   substring.
pub struct FakeRunner {
    fs: MockFileSystem,
    staged_sql: String,
    fail_matching: Option<(String, i32)>,
    invocations: Arc<Mutex<Vec<CommandSpec>>>,
}

impl FakeRunner {
    pub fn new(fs: MockFileSystem) -> Self {
        Self {
            fs,
            staged_sql: "SELECT 1;".to_string(),
            fail_matching: None,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// SQL text written into the capture file of every capturing invocation.
    pub fn with_staged_sql(mut self, sql: &str) -> Self {
        self.staged_sql = sql.to_string();
        self
    }

    /// Fail (with `code`) any invocation whose command line contains `needle`.
    pub fn failing_on(mut self, needle: &str, code: i32) -> Self {
        self.fail_matching = Some((needle.to_string(), code));
        self
    }

    /// Command lines of all invocations, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(CommandSpec::display)
            .collect()
    }

    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<()> {
        self.invocations.lock().unwrap().push(spec.clone());

        // The real tool creates its output file even when it fails. The
        // staging filename is prepended as a comment so tests can tell the
        // staged batches apart.
        if let StdoutMode::CaptureTo(path) = &spec.stdout {
            let contents = format!("-- {}\n{}", path.display(), self.staged_sql);
            self.fs.write(path, contents.as_bytes())?;
        }

        if let Some((needle, code)) = &self.fail_matching {
            if spec.display().contains(needle) {
                return Err(PipelineError::ProcessExit {
                    command: spec.display(),
                    code: *code,
                });
            }
        }
        Ok(())
    }
}

/// A fake database recording executed batches and parameterized scripts.
#[derive(Clone, Default)]
pub struct FakeDatabase {
    batches: Arc<Mutex<Vec<String>>>,
    scripts: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    fail_batch_matching: Arc<Mutex<Option<String>>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any `batch_execute` whose SQL contains `needle`.
    pub fn failing_batches_on(self, needle: &str) -> Self {
        *self.fail_batch_matching.lock().unwrap() = Some(needle.to_string());
        self
    }

    pub fn batches(&self) -> Vec<String> {
        self.batches.lock().unwrap().clone()
    }

    /// `(sql, params)` pairs from `execute_with_params`, in order.
    pub fn scripts(&self) -> Vec<(String, Vec<String>)> {
        self.scripts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn batch_execute(&self, sql: &str) -> Result<()> {
        self.batches.lock().unwrap().push(sql.to_string());

        if let Some(needle) = self.fail_batch_matching.lock().unwrap().as_deref() {
            if sql.contains(needle) {
                return Err(PipelineError::Other(anyhow!(
                    "scripted batch failure on `{needle}`"
                )));
            }
        }
        Ok(())
    }

    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> Result<()> {
        self.scripts.lock().unwrap().push((
            sql.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));
        Ok(())
    }
}
