use crate::command_queue::CommandQueue;
use crate::lifecycle::EngineLifecycle;
use crossbeam::channel::{self, RecvTimeoutError};
use log::{debug, error, warn};
use std::io::BufRead;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The input side of the pipeline.
///
/// An inner thread blocks on the stream and feeds raw lines into a channel;
/// the producer thread polls that channel with a bounded timeout, so even
/// when the stream stays silent it observes a shutdown request within one
/// poll interval. Lines go onto the command queue exactly as read.
///
/// The producer stops on end of input, when the lifecycle leaves Running,
/// or right after forwarding the literal `exit` line, so nothing typed
/// after `exit` is ever enqueued. It never touches the lifecycle flag
/// itself; converting `exit` into a drain request is the consumers' job.
/// The inner reader may stay blocked on the stream until the process
/// exits; nothing in the pipeline ever waits on it.
pub struct LineSource;

impl LineSource {
    /// Spawn the producer thread over `reader`
    pub fn spawn<R>(
        reader: R,
        queue: CommandQueue,
        lifecycle: EngineLifecycle,
        poll_interval: Duration,
    ) -> std::io::Result<JoinHandle<()>>
    where
        R: BufRead + Send + 'static,
    {
        thread::Builder::new()
            .name("line-source".to_string())
            .spawn(move || Self::produce(reader, queue, lifecycle, poll_interval))
    }

    fn produce<R>(
        reader: R,
        queue: CommandQueue,
        lifecycle: EngineLifecycle,
        poll_interval: Duration,
    ) where
        R: BufRead + Send + 'static,
    {
        let (lines_tx, lines_rx) = channel::unbounded();

        let reader_thread = thread::Builder::new()
            .name("line-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if lines_tx.send(line).is_err() {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!("input read failed: {}", err);
                            break;
                        }
                    }
                }
                // Sender drops here; the disconnect is the EOF signal
            });
        if let Err(err) = reader_thread {
            error!("failed to start reader thread: {}", err);
            return;
        }

        loop {
            if !lifecycle.is_running() {
                debug!("line source stopping: shutdown in progress");
                return;
            }
            match lines_rx.recv_timeout(poll_interval) {
                Ok(line) => {
                    let sentinel = line.trim() == "exit";
                    debug!("queued: {}", line);
                    queue.push(line);
                    if sentinel {
                        debug!("line source stopping: exit received");
                        return;
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("line source stopping: input closed");
                    return;
                }
            }
        }
    }
}
