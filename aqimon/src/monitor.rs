//! The monitor loop
//!
//! Acquire one sample, derive the AQI, publish each metric, then either
//! finish (interactive) or wait out the poll interval and go again
//! (daemon). Two states only:
//!
//! ```text
//! Running ──iteration──▶ Running   (daemon: sleep, re-enter)
//! Running ──iteration──▶ Done      (interactive: one shot)
//! ```
//!
//! Failure policy: a failed read or publish in daemon mode is logged and
//! the loop continues on the normal interval - no retry inside an
//! iteration, no backoff. In interactive mode the first failure is the
//! process result. Every published sample corresponds to exactly one
//! acquisition and no feed is published twice for the same sample.

use std::thread;
use std::time::Duration;

use log::{error, info, warn};
use thiserror::Error;

use aqimon_connectors::{PublishError, Publisher};
use aqimon_core::{Sample, SensorError, SensorReader};

/// Process mode, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One iteration, then exit; failures surface to the user
    Interactive,
    /// Poll forever; failures are logged and the loop continues
    Daemon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Done,
}

/// Feed keys for the three published metrics
#[derive(Debug, Clone)]
pub struct Feeds {
    pub pm2_5: String,
    pub pm10: String,
    pub aqi: String,
}

/// Loop pacing and fan-out targets
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Fan spin-up time between wake and read
    pub warmup: Duration,
    /// Wait between daemon-mode iterations, after the publish
    pub interval: Duration,
    pub feeds: Feeds,
}

/// What went wrong in one iteration
#[derive(Debug, Error)]
pub enum IterationError {
    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),
    #[error("telemetry publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Timed wait between loop phases
///
/// Indirection exists so daemon-mode tests can run without real delays.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Plain blocking wait
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// The composed loop: sensor in, converter in the middle, publisher out
pub struct Monitor<R, P, S> {
    reader: R,
    publisher: P,
    sleeper: S,
    mode: Mode,
    cfg: LoopConfig,
    state: State,
}

impl<R: SensorReader, P: Publisher, S: Sleeper> Monitor<R, P, S> {
    pub fn new(reader: R, publisher: P, sleeper: S, mode: Mode, cfg: LoopConfig) -> Self {
        Self {
            reader,
            publisher,
            sleeper,
            mode,
            cfg,
            state: State::Running,
        }
    }

    /// Drive the loop to its terminal state
    ///
    /// Returns only in interactive mode or if the daemon loop is unwound
    /// by a signal killing the process.
    pub fn run(&mut self) -> Result<(), IterationError> {
        loop {
            let outcome = self.step();
            if self.state == State::Done {
                let stats = self.publisher.stats();
                info!(
                    "finished: {} values published, {} failed",
                    stats.messages_sent, stats.messages_failed
                );
                return outcome;
            }
            if let Err(e) = &outcome {
                error!("iteration failed, continuing: {e}");
            }
        }
    }

    /// One full iteration plus the state transition
    fn step(&mut self) -> Result<(), IterationError> {
        let outcome = self.iteration();
        match self.mode {
            Mode::Interactive => self.state = State::Done,
            Mode::Daemon => self.sleeper.sleep(self.cfg.interval),
        }
        outcome
    }

    fn iteration(&mut self) -> Result<(), IterationError> {
        let sample = self.acquire()?;
        info!("{sample}");
        self.publish(&sample)?;
        Ok(())
    }

    /// Wake, warm up, read, and put the sensor back to sleep
    fn acquire(&mut self) -> Result<Sample, SensorError> {
        self.reader.wake()?;
        self.sleeper.sleep(self.cfg.warmup);

        let result = self.reader.read();

        // Rest the fan even when the read failed; a reading already in
        // hand is still valid if only the sleep command errors
        if let Err(e) = self.reader.sleep() {
            warn!("failed to put sensor to sleep: {e}");
        }

        Ok(result?.with_aqi())
    }

    /// Fan the sample out to the three feeds, each exactly once
    ///
    /// Interactive mode stops at the first failure. Daemon mode still
    /// attempts the remaining feeds so one flaky feed does not starve the
    /// others, then reports the first failure for the iteration.
    fn publish(&mut self, sample: &Sample) -> Result<(), PublishError> {
        let continue_on_error = self.mode == Mode::Daemon;

        let mut metrics = vec![
            (self.cfg.feeds.pm2_5.clone(), f64::from(sample.pm2_5)),
            (self.cfg.feeds.pm10.clone(), f64::from(sample.pm10)),
        ];
        if let Some(index) = sample.aqi {
            metrics.push((self.cfg.feeds.aqi.clone(), f64::from(index)));
        }

        let mut first_err = None;
        for (feed, value) in metrics {
            match self.publisher.publish(&feed, value) {
                Ok(()) => {}
                Err(e) if continue_on_error => {
                    error!("publish to {feed} failed: {e}");
                    first_err.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
