use std::process;
use std::thread;

use clap::Parser;
use log::{error, info};

use dining_monitor::config::Config;
use dining_monitor::philosopher::{Philosopher, Report};
use dining_monitor::{shutdown, Error, Monitor, Result};

fn run(config: Config) -> Result<Vec<Report>> {
    config.validate()?;
    let monitor = Monitor::new(config.philosophers)?;
    let shutdown = shutdown::install(monitor.clone())?;

    info!("seating {} philosopher(s)", config.philosophers);
    let mut v = Vec::new();
    for id in 0..config.philosophers {
        let philosopher = Philosopher::new(id, monitor.clone(), config.clone());
        v.push(thread::spawn(move || philosopher.run()));
    }

    let mut reports = Vec::new();
    let mut panicked = None;
    for (id, t) in v.into_iter().enumerate() {
        match t.join() {
            Ok(report) => reports.push(report),
            Err(_) => panicked = panicked.or(Some(id)),
        }
    }
    shutdown.close();

    match panicked {
        Some(id) => Err(Error::ActorPanicked(id)),
        None => Ok(reports),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Config::parse()) {
        Ok(reports) => {
            let meals: u64 = reports.iter().map(|r| r.meals).sum();
            let talks: u64 = reports.iter().map(|r| r.talks).sum();
            info!("all philosophers left: {meals} meal(s), {talks} talk(s)");
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
