use crate::errors::Result;
use log::debug;
use std::io::Write;
use std::sync::Mutex;

/// Serialized writer for protocol replies.
///
/// Every reply is exactly one line, newline-terminated and flushed before
/// the call returns, so a GUI reading the stream never sees a partial or
/// interleaved line no matter how many workers are replying.
pub struct OutputSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
    /// Create a sink over an arbitrary writer
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Create a sink over standard output
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Write one reply line and flush
    pub fn send(&self, line: &str) -> Result<()> {
        self.send_many(&[line])
    }

    /// Write several reply lines under a single lock acquisition.
    ///
    /// Used for multi-line replies (the `uci` handshake) that must reach the
    /// GUI contiguous and in order even while other workers are replying.
    pub fn send_many(&self, lines: &[&str]) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for line in lines {
            writeln!(writer, "{}", line)?;
            debug!("sent: {}", line);
        }
        writer.flush()?;
        Ok(())
    }
}
