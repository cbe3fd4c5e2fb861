use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A writable, closable destination that receives a copy of every emitted line.
pub trait Sink: Write + Send {
    /// Release the destination. The default flushes; owners of OS resources
    /// rely on drop for the rest.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}

impl Sink for fs::File {
    fn close(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_all()
    }
}

impl Sink for Vec<u8> {}

impl Sink for io::Sink {}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Open `path` for appending, creating it with mode 0755 when absent.
pub(crate) fn open_log_file(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o755);
    }

    options.open(path)
}

/// Reference-counted handle to an installed sink.
///
/// Loggers derived through `module` hold clones of the same handle, so closing
/// through any of them closes it for all. A closed handle swallows writes.
#[derive(Clone)]
pub struct SharedSink {
    inner: Arc<Mutex<Option<Box<dyn Sink>>>>,
}

impl SharedSink {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(Box::new(sink)))),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Box<dyn Sink>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write one newline-terminated line with a single `write_all`.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut slot = self.slot();
        let Some(sink) = slot.as_mut() else {
            return Ok(());
        };
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        sink.write_all(&buf)
    }

    /// Close and drop the sink. Closing an already closed handle is a no-op.
    pub fn close(&self) -> io::Result<()> {
        match self.slot().take() {
            Some(mut sink) => sink.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.slot().is_none()
    }

    pub fn same_as(&self, other: &SharedSink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// In-memory sink. Clones share the same buffer, so a test (or an embedding
/// application) can keep one clone and hand the other to a logger.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
    closed: Arc<Mutex<bool>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.is_closed() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "memory sink closed"));
        }
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn close(&mut self) -> io::Result<()> {
        *self.closed.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Ok(())
    }
}
