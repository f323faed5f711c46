use duration_string::DurationString;
use gumdrop::Options;

/// Mirror git repositories from source remotes to target remotes.
#[derive(Debug, Options)]
pub struct Args {
    /// The configuration file to load (default: config.json).
    #[options(free)]
    pub config: Option<String>,

    /// Run one sync cycle for every repository, then exit. Useful for cronjobs.
    #[options()]
    pub once: bool,

    /// Remove the local mirrors and clone them again before the first cycle.
    #[options(no_short)]
    pub clean: bool,

    /// Override the sync interval from the configuration file.
    ///
    /// Can be a number postfixed with s(econd), m(inutes), h(ours), d(ays)
    #[options(no_short)]
    pub every: Option<DurationString>,

    /// Only print errors.
    #[options()]
    pub quiet: bool,

    /// Increase verbosity, can be set multiple times (-v debug, -vv tracing)
    #[options(count)]
    pub verbose: u8,

    /// Print the current version.
    #[options(short = "V")]
    pub version: bool,

    /// Print this help.
    #[options()]
    pub help: bool,
}

pub fn parse_args() -> Args {
    Args::parse_args_default_or_exit()
}
