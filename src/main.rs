use gms_bin::{
    args::{parse_args, Args},
    config::{Config, DEFAULT_CONFIG_PATH},
    logger::init_logger,
    start::{schedulers_from_config, start},
    MainError,
};
use log::debug;
use signal_hook::{consts::TERM_SIGNALS, flag};
use std::{
    process,
    sync::{atomic::AtomicBool, Arc},
    time::Duration,
};

fn main() {
    let args = parse_args();

    if args.version {
        println!("gms {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(err) = run(args) {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), MainError> {
    init_logger(&args)?;

    let path = args
        .config
        .unwrap_or_else(|| String::from(DEFAULT_CONFIG_PATH));
    let mut config = Config::load(&path)?;

    // Command line flags win over the configuration file.
    if args.once {
        config.only_run_once = true;
    }
    if args.clean {
        config.clean_repo_on_run = true;
    }
    if let Some(every) = args.every {
        let duration: Duration = every.into();
        config.sync_interval_seconds = duration.as_secs().max(1);
    }

    // The first signal lets the running cycles finish, a second one exits.
    let shutdown = Arc::new(AtomicBool::new(false));
    for signal in TERM_SIGNALS {
        flag::register_conditional_shutdown(*signal, 1, Arc::clone(&shutdown))?;
        flag::register(*signal, Arc::clone(&shutdown))?;
    }

    debug!(
        "Loaded {} repository pairs from {path}.",
        config.sync_repositories.len()
    );

    let schedulers = schedulers_from_config(&config, &shutdown);
    start(schedulers)?;

    Ok(())
}
