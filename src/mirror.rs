use crate::{
    commands::{CommandError, CommandRunner},
    config::SyncTarget,
};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::{fs, io, path::Path};
use thiserror::Error;

/// The directory under the working directory that holds the local mirrors.
pub const REPOS_DIRECTORY: &str = "repos";

/// Derive the stable directory name for a repository pair.
///
/// The hash covers the source *and* the target: two pairs mirroring the
/// same source to different targets have to live in separate directories,
/// otherwise they would overwrite each other's push remote. The newline
/// separator can never appear in a URL, which keeps pairs like ("a", "bc")
/// and ("ab", "c") apart.
pub fn identity(target: &SyncTarget) -> String {
    let mut hasher = Sha256::new();
    hasher.update(target.source.as_bytes());
    hasher.update(b"\n");
    hasher.update(target.target.as_bytes());
    hex::encode(hasher.finalize())
}

/// A custom error describing the error cases for the mirror store.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The mirror directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateFailed { path: String, source: io::Error },
    /// One of the external commands failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Manages the on-disk mirror clone for one repository pair.
pub struct MirrorStore<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> MirrorStore<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        MirrorStore { runner }
    }

    /// Remove the local mirror if it exists. A missing directory is not an error.
    pub fn clean(&self, path: &Path) -> Result<(), MirrorError> {
        if !path.exists() {
            debug!("Nothing to clean at {}.", path.display());
            return Ok(());
        }

        info!("Removing local mirror at {}.", path.display());
        let path_str = path.to_string_lossy();
        self.runner.run("rm", &["-rf", &path_str], Path::new("."))?;

        Ok(())
    }

    /// Create the mirror directory and fill it with a mirror clone of the
    /// source, capturing every branch and tag.
    pub fn clone_mirror(&self, path: &Path, source: &str) -> Result<(), MirrorError> {
        info!("Cloning {source} into {}.", path.display());
        fs::create_dir_all(path).map_err(|err| MirrorError::CreateFailed {
            path: path.display().to_string(),
            source: err,
        })?;

        let path_str = path.to_string_lossy();
        self.runner
            .run("git", &["clone", "--mirror", source, &path_str], Path::new("."))?;

        Ok(())
    }

    /// Point pushes of the default remote at the target,
    /// while fetches keep coming from the source.
    pub fn set_push_target(&self, path: &Path, target: &str) -> Result<(), MirrorError> {
        info!("Setting push target to {target}.");
        self.runner.run(
            "git",
            &["remote", "set-url", "--push", "origin", target],
            path,
        )?;

        Ok(())
    }

    /// Run the full setup sequence for a pair: clean, clone, set the push
    /// target. The first failing step aborts the rest.
    pub fn setup(&self, path: &Path, target: &SyncTarget) -> Result<(), MirrorError> {
        self.clean(path)?;
        self.clone_mirror(path, &target.source)?;
        self.set_push_target(path, &target.target)?;

        Ok(())
    }
}
