use std::{
    path::Path,
    sync::{mpsc, LazyLock, Mutex},
};

use anyhow::Result;
use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    {ContentLimit, FileRotate},
};
use log::Log;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Where formatted log lines are forwarded besides the log file, e.g. an
/// on-screen debug console.
static LOG_SINK: LazyLock<Mutex<Option<mpsc::Sender<String>>>> = LazyLock::new(|| Mutex::new(None));

pub struct MainLogger {
    write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>,
}

impl MainLogger {
    fn new(write_logger: Box<WriteLogger<FileRotate<AppendTimestamp>>>) -> Self {
        Self { write_logger }
    }
}

impl Log for MainLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.write_logger.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.write_logger.log(record);

        let message = format!(
            "{}:{} -- {}",
            record.level(),
            record.target(),
            record.args()
        );

        let mut sink = match LOG_SINK.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let delivered = match sink.as_ref() {
            Some(tx) => tx.send(message).is_ok(),
            None => {
                eprintln!("{message}");
                true
            }
        };
        // the receiving side went away, stop forwarding
        if !delivered {
            *sink = None;
        }
    }

    fn flush(&self) {
        self.write_logger.flush();
    }
}

pub fn init<P: AsRef<Path>>(log_dir: P) -> Result<()> {
    let path = log_dir.as_ref().join("main.log");
    let log = FileRotate::new(
        path,
        AppendTimestamp::default(FileLimit::MaxFiles(3)),
        ContentLimit::Lines(1000),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let write_logger = WriteLogger::new(LevelFilter::Info, config, log);
    log::set_boxed_logger(Box::new(MainLogger::new(write_logger)))?;
    log::set_max_level(LevelFilter::Info);
    Ok(())
}

pub fn set_sink(sink: mpsc::Sender<String>) {
    let mut guard = match LOG_SINK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = Some(sink);
}
