use mockall::automock;
use std::path::Path;
use thiserror::Error;

/// A command runner that spawns real child processes.
pub mod process;

/// A custom error describing the error cases for running external commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The program could not be started at all, usually because the
    /// executable is missing or not permitted to run.
    #[error("cannot start {command}: {source}")]
    Startup {
        command: String,
        source: std::io::Error,
    },
    /// The program ran and exited with a non-zero exit code.
    #[error("{command} failed with exit code {code}")]
    NonZeroExitcode { code: i32, command: String },
}

/// Runs an external program and waits until it terminates.
///
/// Every destructive filesystem and version-control operation goes through
/// this seam, so the sync logic can be tested without spawning processes.
#[automock]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` inside `directory`, blocking until it exits.
    fn run<'a>(&self, program: &str, args: &[&'a str], directory: &Path)
        -> Result<(), CommandError>;
}

/// Render a command line the way it could be pasted into a shell,
/// for error messages and logs.
pub fn render_command(program: &str, args: &[&str]) -> String {
    shlex::try_join(std::iter::once(program).chain(args.iter().copied()))
        .unwrap_or_else(|_| format!("{program} {}", args.join(" ")))
}
