//! Mirror git repositories from source remotes to target remotes.
//!
//! ## How it works
//!
//! `gms` reads a list of (source, target) repository pairs and keeps one
//! local **mirror** clone per pair under `repos/`. Every pair gets its own
//! **scheduler**: after the one-time setup (clone the source as a mirror,
//! point pushes at the target) it runs fetch-then-push cycles on a fixed
//! interval, either forever or exactly once. All git work is delegated to
//! the `git` binary through a **command runner**.
//!
//! ```ignore
//! +--------+  fetch  +--------------+  push   +--------+
//! | source | ------> | local mirror | ------> | target |
//! +--------+         +--------------+         +--------+
//! ```
//!

/// Command line arguments.
pub mod args;
/// A command runner spawns external programs (e.g. [a child process](commands::process::ProcessCommandRunner)).
pub mod commands;
/// The configuration file with the repository pairs to sync.
pub mod config;
/// Terminal logger setup.
pub mod logger;
/// The local mirror clone of a repository pair: identity, setup and cleanup.
pub mod mirror;
/// The per-pair scheduler, that runs the fetch and push cycles.
pub mod scheduler;
/// The main entrypoint, that starts a scheduler for every unique pair.
pub mod start;

use thiserror::Error;

/// Failures that can end the program from the main entrypoint.
#[derive(Debug, Error)]
pub enum MainError {
    #[error("cannot load the configuration: {0}")]
    FailedConfig(#[from] config::ConfigError),
    #[error("cannot set the logger timezones")]
    FailedLoggerTimezones,
    #[error("cannot initialize the logger: {0}")]
    FailedLogger(#[from] log::SetLoggerError),
    #[error("cannot register the signal handlers: {0}")]
    FailedSignals(#[from] std::io::Error),
    #[error("{0}")]
    FailedStart(#[from] start::StartError),
}
