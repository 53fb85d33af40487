// Sat Oct 17 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    pub fn init_logger(level: LevelFilter, use_color: bool) {
        let logger = Box::new(ConsoleLogger::new(level, use_color));
        log::set_boxed_logger(logger).ok();
        log::set_max_level(level);
    }

    /// Logs the run into `file_path`, replacing any earlier run's log.
    /// Warnings and errors still reach stderr at `console_level`.
    pub fn init_run_log(
        file_level: LevelFilter,
        console_level: LevelFilter,
        use_color: bool,
        file_path: &Path,
    ) -> std::io::Result<()> {
        let file = File::create(file_path)?;
        let logger = Box::new(RunLogger {
            file_level,
            file: Mutex::new(BufWriter::new(file)),
            console: ConsoleLogger::new(console_level.min(LevelFilter::Warn), use_color),
        });

        log::set_boxed_logger(logger).ok();
        log::set_max_level(file_level.max(console_level));
        Ok(())
    }

    pub fn level_from_verbosity(verbosity: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Off;
        }
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct ConsoleLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ConsoleLogger {
    fn new(level: LevelFilter, use_color: bool) -> Self {
        Self { level, use_color }
    }

    fn format_level(&self, level: Level) -> ColoredString {
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if self.use_color {
            let target = format!("[{}]", short_target(record.target()));
            eprintln!("{} {} {}", self.format_level(record.level()), target.dimmed(), record.args());
        } else {
            eprintln!("{}", plain_line(record));
        }
    }

    fn flush(&self) {}
}

struct RunLogger {
    file_level: LevelFilter,
    file: Mutex<BufWriter<File>>,
    console: ConsoleLogger,
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.file_level || self.console.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if record.level() <= self.file_level {
            if let Ok(mut file) = self.file.lock() {
                let _ = writeln!(file, "{}", plain_line(record));
            }
        }
        self.console.log(record);
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// `deffilter::engine::pipeline` → `pipeline`
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn plain_line(record: &Record) -> String {
    format!("{:5} [{}] {}", record.level(), short_target(record.target()), record.args())
}

/// Logs how long one pipeline stage took when dropped.
pub struct StageTimer {
    stage: &'static str,
    start: Instant,
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        log::debug!("{} stage done in {:.1}ms", self.stage, self.start.elapsed().as_secs_f64() * 1000.0);
    }
}

pub fn stage_timer(stage: &'static str) -> StageTimer {
    StageTimer {
        stage,
        start: Instant::now(),
    }
}

/// `RUST_LOG` in the environment wins over the command line flags.
pub fn init(verbosity: u8, quiet: bool, use_color: bool, log_file: Option<&Path>) -> std::io::Result<()> {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::init();
        return Ok(());
    }

    let level = LoggingUtils::level_from_verbosity(verbosity, quiet);
    match log_file {
        Some(path) => LoggingUtils::init_run_log(LevelFilter::Info.max(level), level, use_color, path),
        None => {
            LoggingUtils::init_logger(level, use_color);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_verbosity() {
        assert_eq!(LoggingUtils::level_from_verbosity(0, false), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_verbosity(2, false), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_verbosity(9, false), LevelFilter::Trace);
        assert_eq!(LoggingUtils::level_from_verbosity(3, true), LevelFilter::Off);
    }

    #[test]
    fn test_plain_line_uses_module_name() {
        let line = plain_line(
            &Record::builder()
                .level(Level::Warn)
                .target("deffilter::engine::pipeline")
                .args(format_args!("{} exports over budget", 12))
                .build(),
        );
        assert_eq!(line, "WARN  [pipeline] 12 exports over budget");
    }

    #[test]
    fn test_run_logger_writes_file_level_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let logger = RunLogger {
            file_level: LevelFilter::Info,
            file: Mutex::new(BufWriter::new(File::create(&path).unwrap())),
            console: ConsoleLogger::new(LevelFilter::Off, false),
        };

        for (level, text) in [(Level::Info, "kept"), (Level::Debug, "hidden")] {
            logger.log(
                &Record::builder()
                    .level(level)
                    .target("deffilter::filter::scoped")
                    .args(format_args!("{}", text))
                    .build(),
            );
        }
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "INFO  [scoped] kept\n");
    }
}
