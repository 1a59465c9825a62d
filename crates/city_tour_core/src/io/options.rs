use std::{env, path::Path, time::Duration};

use city_tour_derive::{CliOptions, CliValue, KvDisplay};
use log::LevelFilter;

use crate::{Error, Result};

/// Runtime options for the `city-tour` binary.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// Which solver runs: `heuristic`, `exact`, or both side by side.
    #[cli(long = "mode", parse_with = "SolveMode::parse")]
    pub mode: SolveMode,
    /// Wall-clock budget for the exact solver in seconds. 0 disables the limit.
    #[cli(long = "exact-time-limit")]
    pub exact_time_limit: f64,
    /// Generate this many random cities instead of reading an instance. 0 reads input.
    #[cli(long = "random-cities")]
    pub random_cities: usize,
    /// Seed for random instance generation.
    #[cli(long = "seed")]
    pub seed: u64,
    /// Structured logging level.
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    /// Logging output format.
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Include timestamps in log lines.
    #[cli(long = "log-timestamp", flag)]
    pub log_timestamp: bool,
    /// Optional output file path for logs. Empty means stderr.
    #[cli(long = "log-output")]
    #[kv(fmt = "or_dash")]
    pub log_output: String,
    /// Optional instance file path. Empty means stdin.
    #[cli(long = "input")]
    #[kv(fmt = "or_dash")]
    pub input: String,
    /// Optional tour output file path. Empty means stdout.
    #[cli(long = "output")]
    #[kv(fmt = "or_dash")]
    pub output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "mode")]
pub enum SolveMode {
    #[cli(alias = "nn")]
    Heuristic,
    #[cli(alias = "held-karp")]
    Exact,
    Compare,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            mode: SolveMode::Heuristic,
            exact_time_limit: 0.0,
            random_cities: 0,
            seed: 42,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: true,
            log_output: String::new(),
            input: String::new(),
            output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::invalid_input(Self::usage()));
            }

            let Some(raw_name) = arg.strip_prefix("--") else {
                return Err(Error::invalid_input(format!(
                    "Unexpected argument: {arg}\n\n{}",
                    Self::usage()
                )));
            };

            if raw_name.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Invalid option name: {arg}\n\n{}",
                    Self::usage()
                )));
            }

            let (name, value) = Self::split_arg(raw_name, &mut args);
            if !options.apply_cli_option(&name, value)? {
                return Err(Error::invalid_input(format!(
                    "Unknown option: --{name}\n\n{}",
                    Self::usage()
                )));
            }
        }

        options.validate()?;
        Ok(options)
    }

    fn validate(&self) -> Result<()> {
        Duration::try_from_secs_f64(self.exact_time_limit).map_err(|e| {
            Error::invalid_input(format!(
                "Invalid value for --exact-time-limit: {} ({e})",
                self.exact_time_limit
            ))
        })?;
        if self.random_cities == 1 {
            return Err(Error::invalid_input(
                "Invalid value for --random-cities: 1 (expected 0 or at least 2)",
            ));
        }
        if self.random_cities > 0 && self.input_path().is_some() {
            return Err(Error::invalid_input(
                "--random-cities and --input cannot be combined",
            ));
        }
        Ok(())
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage:\n",
            "  city-tour [options] [--input instance.txt]\n",
            "  city-tour [options] < instance.txt\n",
            "  city-tour [options] --random-cities <n>\n\n",
            "Options:\n",
            "  --mode <heuristic|exact|compare>\n",
            "  --exact-time-limit <secs>\n",
            "  --random-cities <usize>\n",
            "  --seed <u64>\n",
            "  --log-level <error|warn|info|debug|trace|off>\n",
            "  --log-format <compact|pretty>\n",
            "  --log-timestamp[=<bool>]\n",
            "  --no-log-timestamp\n",
            "  --log-output <path>\n",
            "  --input <path>\n",
            "  --output <path>\n",
            "  --help\n",
            "\n",
            "Instance format (one directive per line, # starts a comment):\n",
            "  city <id> <x> <y> <name...>\n",
            "  road <from> <to> <distance>\n",
            "  cost <c0> <c1> ...            (one matrix row; exact mode only)\n",
            "\n",
            "Examples:\n",
            "  city-tour --input map.txt --output tour.txt\n",
            "  city-tour --mode=exact --exact-time-limit=30 < map.txt\n",
            "  city-tour --mode=compare --random-cities=12 --seed=7 --log-level=info\n",
            "  city-tour --log-level=debug --log-format=pretty --log-output run.log < map.txt\n",
        )
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        path_or_std(&self.log_output)
    }

    pub fn output_path(&self) -> Option<&Path> {
        path_or_std(&self.output)
    }

    pub fn input_path(&self) -> Option<&Path> {
        path_or_std(&self.input)
    }

    /// Exact solver budget, or `None` when unlimited.
    pub fn exact_time_limit(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.exact_time_limit)
            .ok()
            .filter(|limit| !limit.is_zero())
    }
}

fn path_or_std(raw: &str) -> Option<&Path> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        None
    } else {
        Some(Path::new(raw))
    }
}
