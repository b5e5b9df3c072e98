//! aqimon binary entry point
//!
//! `main` stays small: parse the CLI, initialize logging, load the config,
//! wire the sensor and publisher together, and map the outcome to an exit
//! code. Exit codes: 0 on normal completion, 2 on a config failure, 1 on a
//! runtime failure in interactive mode.

mod cli;
mod config;
mod monitor;
mod sds011;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use aqimon_connectors::{AioClient, AioConfig};
use monitor::{Feeds, IterationError, LoopConfig, Monitor, StdSleeper};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();

    let cfg = match config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(2);
        }
    };

    match run(&args, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cli::Args, cfg: &config::Config) -> Result<(), IterationError> {
    info!("starting aqimon {} ({:?} mode)", aqimon_core::VERSION, args.mode());

    let sensor = sds011::Sds011::open(&cfg.sensor.device)?;
    info!("opened SDS011 on {}", cfg.sensor.device);

    let publisher = AioClient::new(
        AioConfig::new(&cfg.adafruit.username, &cfg.adafruit.key).timeout_secs(30),
    )?;

    let loop_cfg = LoopConfig {
        warmup: Duration::from_secs(cfg.sensor.warmup_secs),
        interval: Duration::from_secs(cfg.monitor.interval_secs),
        feeds: Feeds {
            pm2_5: cfg.adafruit.pm2_5_feed.clone(),
            pm10: cfg.adafruit.pm10_feed.clone(),
            aqi: cfg.adafruit.aqi_feed.clone(),
        },
    };

    Monitor::new(sensor, publisher, StdSleeper, args.mode(), loop_cfg).run()
}
