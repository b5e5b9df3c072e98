//! Command line interface

use std::path::PathBuf;

use clap::Parser;

use crate::config;
use crate::monitor::Mode;

/// Read PM2.5/PM10 from an SDS011 sensor and publish the readings and the
/// derived AQI to Adafruit IO feeds.
#[derive(Debug, Parser)]
#[command(name = "aqimon", version)]
pub struct Args {
    /// Poll the sensor on a fixed interval until stopped; the default is a
    /// single reading
    #[arg(short = 'd', long)]
    pub daemon: bool,

    /// Path to the credentials/config file
    #[arg(short = 'c', long, default_value = config::DEFAULT_PATH)]
    pub config: PathBuf,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.daemon {
            Mode::Daemon
        } else {
            Mode::Interactive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_interactive() {
        let args = Args::parse_from(["aqimon"]);
        assert_eq!(args.mode(), Mode::Interactive);
        assert_eq!(args.config, PathBuf::from(config::DEFAULT_PATH));
    }

    #[test]
    fn daemon_flag_selects_daemon_mode() {
        let args = Args::parse_from(["aqimon", "-d"]);
        assert_eq!(args.mode(), Mode::Daemon);

        let args = Args::parse_from(["aqimon", "--daemon"]);
        assert_eq!(args.mode(), Mode::Daemon);
    }

    #[test]
    fn config_path_override() {
        let args = Args::parse_from(["aqimon", "-c", "/tmp/aqimon.toml"]);
        assert_eq!(args.config, PathBuf::from("/tmp/aqimon.toml"));
    }
}
