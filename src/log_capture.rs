//! Test logger that keeps every record in memory so tests can assert on the
//! operator log. Tests run in parallel, so filter on something unique to the test.

use std::sync::{
    Mutex,
    Once,
};

use log::{
    Level,
    LevelFilter,
    Log,
    Metadata,
    Record,
};

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = RECORDS.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

pub(crate) fn init() {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

pub(crate) fn lines_containing(needle: &str) -> Vec<(Level, String)> {
    RECORDS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .iter()
        .filter(|(_, line)| line.contains(needle))
        .cloned()
        .collect()
}
