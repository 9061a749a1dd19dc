use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

/// Writer handed to the fmt subscriber: every line goes to stderr and, once
/// configured, is appended to the log file too.
#[derive(Clone, Default)]
struct TeeWriter {
    file: Arc<Mutex<Option<File>>>,
}

impl TeeWriter {
    fn with_file<R>(&self, f: impl FnOnce(&mut Option<File>) -> R) -> R {
        let mut guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for TeeWriter {
    type Writer = TeeWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = io::stderr().write(buf)?;
        self.with_file(|file| {
            if let Some(file) = file {
                let _ = file.write_all(&buf[..written]);
            }
        });
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.with_file(|file| match file {
            Some(file) => file.flush(),
            None => Ok(()),
        })
    }
}

static WRITER: OnceLock<TeeWriter> = OnceLock::new();

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let _ = tracing_log::LogTracer::init();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let writer = WRITER.get_or_init(TeeWriter::default).clone();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .try_init();
}

/// Start (or stop, with `None`) copying log output to `log_file`.
pub fn set_log_file(log_file: Option<&Path>) -> io::Result<()> {
    let file = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Some(OpenOptions::new().create(true).append(true).open(path)?)
        }
        None => None,
    };
    if let Some(writer) = WRITER.get() {
        writer.with_file(|slot| *slot = file);
    }
    Ok(())
}
