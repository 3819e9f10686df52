//! Console logger for the `log` facade
//!
// Copyright (c) 2025 Tommy Olsen
// Licensed under the MIT License.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

pub fn init(logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(max_level))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    /// Show debug output
    pub verbose: bool,
    /// Only warnings and errors
    pub quiet: bool,
    /// Trace every decoded record (target "records")
    pub log_records: bool,
}

impl Logger {
    fn max_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Warn
        } else if self.verbose || self.log_records {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.max_level() {
            return false;
        }

        match metadata.target() {
            "records" => self.log_records,
            target => {
                let chunks: Vec<&str> = target.split("::").collect();
                match chunks[..] {
                    ["elf2readmemh", ..] => metadata.level() <= Level::Info || self.verbose,
                    _ => metadata.level() <= Level::Warn,
                }
            }
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        if record.level() <= Level::Warn {
            eprintln!("{} - {}", record.level(), record.args());
        } else if record.level() == Level::Info {
            println!("   {}", record.args());
        } else {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn metadata(level: Level, target: &str) -> Metadata<'_> {
        Metadata::builder().level(level).target(target).build()
    }

    #[test]
    fn test_default_shows_info_not_debug() {
        let logger = Logger::default();
        assert!(logger.enabled(&metadata(Level::Info, "elf2readmemh::convert")));
        assert!(logger.enabled(&metadata(Level::Warn, "elf2readmemh::parser")));
        assert!(!logger.enabled(&metadata(Level::Debug, "elf2readmemh::parser")));
        assert!(!logger.enabled(&metadata(Level::Debug, "records")));
    }

    #[test]
    fn test_quiet_keeps_warnings() {
        let logger = Logger { quiet: true, ..Logger::default() };
        assert!(logger.enabled(&metadata(Level::Warn, "elf2readmemh::parser")));
        assert!(!logger.enabled(&metadata(Level::Info, "elf2readmemh::convert")));
    }

    #[test]
    fn test_record_tracing_target() {
        let logger = Logger { log_records: true, ..Logger::default() };
        assert!(logger.enabled(&metadata(Level::Debug, "records")));
        assert!(!logger.enabled(&metadata(Level::Debug, "elf2readmemh::convert")));
    }

    #[test]
    fn test_foreign_targets_only_warn() {
        let logger = Logger { verbose: true, ..Logger::default() };
        assert!(!logger.enabled(&metadata(Level::Info, "some_crate::module")));
        assert!(logger.enabled(&metadata(Level::Error, "some_crate::module")));
    }
}
