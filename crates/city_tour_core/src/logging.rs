use std::{
    fmt::Arguments,
    fs::File,
    io::{self, Write},
};

use env_logger::{Builder, Target, WriteStyle};
use log::Level;

use crate::{
    Error, Result,
    io::options::{LogFormat, SolverOptions},
};

/// Installs the global logger described by the `--log-*` options.
pub fn init_logger(options: &SolverOptions) -> Result<()> {
    let log_format = options.log_format;
    let log_timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| {
            if log_timestamp {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            write_record(
                buf,
                log_format,
                record.level(),
                record.target(),
                *record.args(),
            )
        });

    match options.log_output_path() {
        Some(log_path) => {
            let log_file = File::create(log_path).map_err(|e| {
                Error::other(format!(
                    "failed to create log output file {}: {e}",
                    log_path.display()
                ))
            })?;
            builder.target(Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn write_record<W: Write>(
    out: &mut W,
    format: LogFormat,
    level: Level,
    target: &str,
    args: Arguments<'_>,
) -> io::Result<()> {
    match format {
        LogFormat::Compact => writeln!(out, "{} {args}", level_tag(level)),
        LogFormat::Pretty => writeln!(out, "{} [{target}] {args}", level_tag(level)),
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

#[cfg(test)]
mod tests {
    use log::Level;

    use super::write_record;
    use crate::io::options::LogFormat;

    fn render(format: LogFormat) -> String {
        let mut out = Vec::new();
        write_record(
            &mut out,
            format,
            Level::Info,
            "city_tour_core::runner",
            format_args!("compare: gap={:.2}%", 12.5),
        )
        .expect("write");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn compact_lines_carry_level_and_message() {
        assert_eq!(render(LogFormat::Compact), "INFO compare: gap=12.50%\n");
    }

    #[test]
    fn pretty_lines_add_the_target() {
        assert_eq!(
            render(LogFormat::Pretty),
            "INFO [city_tour_core::runner] compare: gap=12.50%\n"
        );
    }
}
