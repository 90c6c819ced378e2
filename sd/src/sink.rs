//! Shared output sink for dump text

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::warn;

/// Clonable handle to the dump output destination.
///
/// One dump cycle writes from two places: the triggering context (registered
/// subsystem callbacks) and the designated stack module's own task. The sink
/// serializes whole lines so the two contexts never interleave mid-line.
///
/// Write failures are logged and swallowed; a broken output destination must
/// never abort a diagnostic pass.
#[derive(Clone)]
pub struct DumpSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl DumpSink {
    /// Wrap any writable destination (stdout, a file, a duplicated fd).
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Create a sink that captures into memory, together with a reader for
    /// the captured text. Used by tests and by callers that post-process the
    /// dump before presenting it.
    pub fn in_memory() -> (Self, DumpBuffer) {
        let buffer = DumpBuffer::default();
        (Self::new(buffer.clone()), buffer)
    }

    /// Write one line of dump text.
    pub fn line(&self, text: impl AsRef<str>) {
        let mut writer = self.writer.lock().expect("dump sink mutex poisoned");
        if let Err(e) = writeln!(writer, "{}", text.as_ref()) {
            warn!("Failed to write dump line: {}", e);
        }
    }
}

impl fmt::Debug for DumpSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpSink").finish_non_exhaustive()
    }
}

/// In-memory capture destination backing [`DumpSink::in_memory`].
#[derive(Clone, Default)]
pub struct DumpBuffer {
    data: Arc<Mutex<Vec<u8>>>,
}

impl DumpBuffer {
    /// The text captured so far.
    pub fn contents(&self) -> String {
        let data = self.data.lock().expect("dump buffer mutex poisoned");
        String::from_utf8_lossy(&data).into_owned()
    }
}

impl Write for DumpBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.data.lock().expect("dump buffer mutex poisoned");
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
