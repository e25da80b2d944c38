use std::io::Write;
use std::time::Instant;

use log::{Log, Metadata, Record};
use parking_lot::Mutex;

struct CmdtreeLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    start: Instant,
}

impl CmdtreeLogger {
    fn format(&self, record: &Record) -> String {
        let elapsed = self.start.elapsed().as_secs_f64();
        format!(
            "[{elapsed:.3}s] [{}] {} - {}",
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for CmdtreeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format(record);
        // stdout carries help and command output
        let _ = writeln!(std::io::stderr().lock(), "{line}");

        if let Some(ref file) = self.file {
            let _ = writeln!(file.lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Level from `RUST_LOG`, warnings by default
fn filter_from_env(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::LevelFilter::Warn)
}

/// Initialize the global logger. Must be called once before any logging.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let filter = filter_from_env(std::env::var("RUST_LOG").ok().as_deref());

    let logger = CmdtreeLogger {
        file: log_file.map(Mutex::new),
        filter,
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, LevelFilter};

    #[test]
    fn test_filter_from_env() {
        assert_eq!(filter_from_env(None), LevelFilter::Warn);
        assert_eq!(filter_from_env(Some("debug")), LevelFilter::Debug);
        assert_eq!(filter_from_env(Some("nonsense")), LevelFilter::Warn);
    }

    #[test]
    fn test_file_receives_enabled_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmdtree.log");
        let logger = CmdtreeLogger {
            file: Some(Mutex::new(std::fs::File::create(&path).unwrap())),
            filter: LevelFilter::Info,
            start: Instant::now(),
        };

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("cmdtree::test")
                .args(format_args!("resolved"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("cmdtree::test")
                .args(format_args!("hidden"))
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[INFO] cmdtree::test - resolved"));
        assert!(!contents.contains("hidden"));
    }
}
