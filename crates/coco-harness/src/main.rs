//! Coco harness - runs the routine smoke suite and prints the verdicts
//!
//! The process exits 0 once the suite has run, whatever the verdicts. Only a
//! provider that cannot be set up at all makes it exit 1.

use clap::{Arg, ArgMatches, Command};
use coco_harness::{HarnessConfig, RoutineSource, Runner, SUITE, load_routines};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = config_from(&matches);

    if let Err(e) = run(&config) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn cli() -> Command {
    Command::new("coco-harness")
        .version("0.1.0")
        .about("Smoke test for the coco, loopysum and even routines")
        .arg(
            Arg::new("delay-ms")
                .long("delay-ms")
                .value_name("MS")
                .help("Startup delay before the first test")
                .value_parser(clap::value_parser!(u64))
                .default_value("2000"),
        )
        .arg(
            Arg::new("routines")
                .long("routines")
                .value_name("SOURCE")
                .help("Where the routines come from")
                .value_parser(["script", "reference", "linked"])
                .default_value("script"),
        )
        .arg(
            Arg::new("script")
                .long("script")
                .value_name("FILE")
                .help("Controller Code file defining the routines")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn config_from(matches: &ArgMatches) -> HarnessConfig {
    let defaults = HarnessConfig::default();
    HarnessConfig {
        startup_delay: matches
            .get_one::<u64>("delay-ms")
            .map_or(defaults.startup_delay, |ms| Duration::from_millis(*ms)),
        source: matches
            .get_one::<String>("routines")
            .and_then(|source| source.parse::<RoutineSource>().ok())
            .unwrap_or(defaults.source),
        script: matches.get_one::<PathBuf>("script").cloned(),
    }
}

fn run(config: &HarnessConfig) -> anyhow::Result<()> {
    let mut routines = load_routines(config)?;

    let stdout = std::io::stdout();
    let mut runner = Runner::new(stdout.lock()).with_startup_delay(config.startup_delay);
    runner.run(routines.as_mut(), &SUITE)?;
    Ok(())
}
