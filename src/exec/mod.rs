// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the external commands the
//! pipeline depends on (the simulation model and `raster2pgsql`), using
//! `tokio::process::Command`.
//!
//! - [`forward`] drains and relays child stdout/stderr line-by-line.
//! - [`runner`] provides the `ProcessRunner` trait and the concrete
//!   `OsProcessRunner` used in production; tests replace it with a fake that
//!   records invocations instead of spawning processes.

pub mod forward;
pub mod runner;

pub use runner::{CommandSpec, OsProcessRunner, ProcessRunner, StdoutMode};
