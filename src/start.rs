use crate::{
    commands::process::ProcessCommandRunner,
    config::{Config, SyncTarget},
    mirror,
    scheduler::SyncScheduler,
};
use log::{debug, error, warn};
use std::{
    collections::HashSet,
    sync::{atomic::AtomicBool, Arc},
    thread,
    time::Duration,
};
use thiserror::Error;

/// A custom error implementation for the start function
#[derive(Debug, Error)]
pub enum StartError {
    #[error("You have to configure at least one repository pair to sync.")]
    NoRepositories,
}

/// Drop configured pairs that derive the same identity as an earlier one.
///
/// Two schedulers must never share a local mirror directory, so duplicates
/// are merged into the first occurrence with a warning.
pub fn unique_targets(targets: &[SyncTarget]) -> Vec<SyncTarget> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for target in targets {
        if seen.insert(mirror::identity(target)) {
            unique.push(target.clone());
        } else {
            warn!("Duplicate repository pair {target}, keeping only the first one.");
        }
    }

    unique
}

/// Build one scheduler per unique repository pair in the configuration.
pub fn schedulers_from_config(config: &Config, shutdown: &Arc<AtomicBool>) -> Vec<SyncScheduler> {
    unique_targets(&config.sync_repositories)
        .into_iter()
        .map(|target| {
            SyncScheduler::new(
                target,
                Box::new(ProcessCommandRunner),
                Duration::from_secs(config.sync_interval_seconds),
                config.only_run_once,
                config.clean_repo_on_run,
                Arc::clone(shutdown),
            )
        })
        .collect()
}

/// Run every scheduler on its own thread and wait for all of them.
///
/// Each thread is its own failure domain: a scheduler that fails its setup
/// only takes down its own pair, every other pair keeps its schedule. With
/// only single-shot pairs this returns after the last cycle, otherwise it
/// runs until the process is signalled.
pub fn start(schedulers: Vec<SyncScheduler>) -> Result<(), StartError> {
    if schedulers.is_empty() {
        return Err(StartError::NoRepositories);
    }

    let mut handles = Vec::new();
    for mut scheduler in schedulers {
        handles.push(thread::spawn(move || {
            if let Err(err) = scheduler.run() {
                error!("Stopped syncing {}: {err}.", scheduler.target());
            }
        }));
    }

    debug!("Waiting on the schedulers.");
    for handle in handles {
        let _ = handle.join();
    }

    Ok(())
}
