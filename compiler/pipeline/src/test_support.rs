//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use types::{CommandRequest, CommandResult};

use crate::runner::CommandExecutor;
use crate::Result;

type Effect = Box<dyn Fn(&CommandRequest) -> CommandResult>;

/// Records every request and answers with a caller-supplied effect.
pub(crate) struct RecordingExecutor {
    requests: RefCell<Vec<CommandRequest>>,
    effect: Effect,
}

impl RecordingExecutor {
    pub(crate) fn succeeding() -> Self { Self::with_effect(|_| CommandResult::default()) }

    pub(crate) fn with_effect(effect: impl Fn(&CommandRequest) -> CommandResult + 'static) -> Self {
        Self { requests: RefCell::new(Vec::new()), effect: Box::new(effect) }
    }

    pub(crate) fn requests(&self) -> Vec<CommandRequest> { self.requests.borrow().clone() }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.command.clone()).collect()
    }
}

impl std::fmt::Debug for RecordingExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingExecutor").field("requests", &self.requests).finish()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, request: &CommandRequest) -> Result<CommandResult> {
        self.requests.borrow_mut().push(request.clone());
        Ok((self.effect)(request))
    }
}

/// Write a generator manifest listing `entries` under `output_dir`.
pub(crate) fn write_manifest(output_dir: &Path, entries: &[&str]) {
    let manifest = path::manifest_path(output_dir);
    fs::create_dir_all(manifest.parent().expect("manifest has a parent")).expect("manifest dir");
    fs::write(manifest, entries.join("\n") + "\n").expect("write manifest");
}

/// The argument following `flag` in a generated command line.
pub(crate) fn flag_value<'a>(command: &'a str, flag: &str) -> Option<&'a str> {
    let mut words = command.split_whitespace();
    words.by_ref().find(|w| *w == flag)?;
    words.next()
}

/// Shared buffer that collects formatted log lines.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer { self.clone() }
}

/// Run `f` with a debug-level subscriber installed and return what it logged.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().expect("log buffer lock").clone())
        .expect("logs are utf-8");
    (result, logs)
}
