use crate::{
    commands::{CommandError, CommandRunner},
    config::SyncTarget,
    mirror::{self, MirrorError, MirrorStore},
};
use log::{debug, error, info};
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::sleep,
    time::{Duration, Instant},
};
use thiserror::Error;

/// How often the interval wait rechecks the shutdown flag.
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// The lifecycle of one repository pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchedulerState {
    Uninitialized,
    SettingUp,
    /// The one-time setup failed, the pair will never run a cycle.
    FailedSetup,
    Ready,
    RunningCycle,
    /// A single-shot pair finished its only cycle.
    Done,
}

/// A custom error describing the error cases for the SyncScheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The one-time mirror setup failed.
    #[error("setup failed: {0}")]
    FailedSetup(#[from] MirrorError),
}

/// Drives the recurring fetch and push cycle for one repository pair.
///
/// The trigger is strictly sequential: a cycle runs to completion, then the
/// scheduler waits out the remainder of the interval, measured from the
/// cycle start. Two cycles of the same pair can therefore never overlap,
/// even when a cycle takes longer than the interval; the period between
/// cycle starts is the longer of the interval and the cycle itself.
pub struct SyncScheduler {
    target: SyncTarget,
    directory: PathBuf,
    runner: Box<dyn CommandRunner>,
    interval: Duration,
    once: bool,
    clean_on_run: bool,
    shutdown: Arc<AtomicBool>,
    state: SchedulerState,
}

impl SyncScheduler {
    /// Creates a new scheduler with its mirror under [`mirror::REPOS_DIRECTORY`].
    pub fn new(
        target: SyncTarget,
        runner: Box<dyn CommandRunner>,
        interval: Duration,
        once: bool,
        clean_on_run: bool,
        shutdown: Arc<AtomicBool>,
    ) -> SyncScheduler {
        SyncScheduler::new_in(
            Path::new(mirror::REPOS_DIRECTORY),
            target,
            runner,
            interval,
            once,
            clean_on_run,
            shutdown,
        )
    }

    /// Creates a new scheduler with its mirror under the given root directory.
    pub fn new_in(
        repos_root: &Path,
        target: SyncTarget,
        runner: Box<dyn CommandRunner>,
        interval: Duration,
        once: bool,
        clean_on_run: bool,
        shutdown: Arc<AtomicBool>,
    ) -> SyncScheduler {
        let directory = repos_root.join(mirror::identity(&target));

        SyncScheduler {
            target,
            directory,
            runner,
            interval,
            once,
            clean_on_run,
            shutdown,
            state: SchedulerState::Uninitialized,
        }
    }

    pub fn target(&self) -> &SyncTarget {
        &self.target
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Setup only runs when requested or when the mirror is missing.
    /// An existing mirror is reused as-is, trusting that it was set up
    /// by an earlier run of this program.
    fn setup_needed(&self) -> bool {
        self.clean_on_run || !self.directory.exists()
    }

    fn setup(&mut self) -> Result<(), SchedulerError> {
        self.state = SchedulerState::SettingUp;
        info!("Setting up the local mirror for {}.", self.target);

        let store = MirrorStore::new(self.runner.as_ref());
        if let Err(err) = store.setup(&self.directory, &self.target) {
            self.state = SchedulerState::FailedSetup;
            return Err(err.into());
        }

        Ok(())
    }

    /// Run one cycle: fetch from the source, then force-push every ref to
    /// the target. The push is skipped if the fetch failed.
    fn run_cycle(&self) -> Result<(), CommandError> {
        debug!("Fetching updates from {}.", self.target.source);
        self.runner
            .run("git", &["fetch", "-p", "origin"], &self.directory)?;

        debug!("Pushing updates to {}.", self.target.target);
        self.runner
            .run("git", &["push", "--mirror", "--force"], &self.directory)?;

        Ok(())
    }

    /// Sleep until the next cycle is due, waking up early on shutdown.
    fn wait_for_next_cycle(&self, cycle_started: Instant) {
        while !self.shutdown.load(Ordering::Relaxed) {
            let elapsed = cycle_started.elapsed();
            if elapsed >= self.interval {
                break;
            }
            sleep((self.interval - elapsed).min(SHUTDOWN_POLL));
        }
    }

    /// Run the scheduler until it is done or the process shuts down.
    ///
    /// Only a failed setup is returned as an error: a failed cycle is
    /// logged and the pair stays on its schedule, the next tick is the
    /// retry. The first cycle starts immediately after setup.
    pub fn run(&mut self) -> Result<(), SchedulerError> {
        if self.setup_needed() {
            self.setup()?;
        } else {
            debug!("Local mirror for {} already exists, reusing it.", self.target);
        }
        self.state = SchedulerState::Ready;

        while !self.shutdown.load(Ordering::Relaxed) {
            let cycle_started = Instant::now();

            self.state = SchedulerState::RunningCycle;
            match self.run_cycle() {
                Ok(()) => info!("Synchronized {}.", self.target),
                Err(err) => error!("Sync cycle for {} failed: {err}.", self.target),
            }

            if self.once {
                self.state = SchedulerState::Done;
                break;
            }

            self.state = SchedulerState::Ready;
            self.wait_for_next_cycle(cycle_started);
        }

        Ok(())
    }
}
