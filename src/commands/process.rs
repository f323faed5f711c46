use super::{render_command, CommandError, CommandRunner};
use duct::cmd;
use log::trace;
use std::path::Path;

/// Runs programs as child processes with inherited standard streams,
/// so their output shows up live on the terminal.
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    /// Spawn the program and block until it terminates. There is no timeout:
    /// a hanging child hangs the calling scheduler, but nothing else.
    fn run<'a>(&self, program: &str, args: &[&'a str], directory: &Path) -> Result<(), CommandError> {
        let command = render_command(program, args);
        trace!("Running {command:?} in {}.", directory.display());

        let output = cmd(program, args)
            .dir(directory)
            .unchecked()
            .run()
            .map_err(|source| CommandError::Startup {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CommandError::NonZeroExitcode {
                code: output.status.code().unwrap_or(-1),
                command,
            })
        }
    }
}
