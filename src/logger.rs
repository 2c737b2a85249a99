use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub static LOGGER: Logger = Logger;

/// Writes records to stderr so stdout only carries the summary and diffs.
pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}{}", format_level(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

fn format_level(level: Level) -> String {
    match level {
        Level::Error => style("error: ").bold().red().to_string(),
        Level::Warn => style("warning: ").yellow().to_string(),
        Level::Info => String::new(),
        Level::Debug => style("debug: ").blue().to_string(),
        Level::Trace => style("trace: ").magenta().to_string(),
    }
}

pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // a second init (e.g. from tests) keeps the first logger
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
