use crate::command_queue::CommandQueue;
use crate::config::EngineConfig;
use crate::dispatch::{CommandContext, CommandDispatcher};
use crate::errors::Result;
use crate::game_state::GameState;
use crate::lifecycle::EngineLifecycle;
use crate::line_source::LineSource;
use crate::output::OutputSink;
use crate::selector::{MoveSelector, RandomSelector};
use crate::workers::WorkerPool;
use log::{debug, error, info};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// The assembled engine: line source feeding a queue drained by command
/// workers, with replies going through the serialized output sink.
///
/// `run` blocks until the pipeline has shut down cleanly, which happens on
/// `quit`, `exit`, or the input stream closing. Whatever the trigger,
/// commands already queued at that point still execute and reply before
/// the workers exit.
pub struct UciEngine {
    config: EngineConfig,
    selector: Arc<dyn MoveSelector>,
}

impl UciEngine {
    /// Create an engine with the baseline random selector
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            selector: Arc::new(RandomSelector::new()),
        }
    }

    /// Replace the move selection strategy
    pub fn with_selector(mut self, selector: Arc<dyn MoveSelector>) -> Self {
        self.selector = selector;
        self
    }

    /// Run over standard input and output until shutdown
    pub fn run(&self) -> Result<()> {
        let stdin = std::io::BufReader::new(std::io::stdin());
        self.run_with_io(stdin, Box::new(std::io::stdout()))
    }

    /// Run over arbitrary streams until shutdown.
    ///
    /// The seam the integration tests drive scripted sessions through.
    pub fn run_with_io<R>(&self, reader: R, writer: Box<dyn Write + Send>) -> Result<()>
    where
        R: BufRead + Send + 'static,
    {
        let queue = CommandQueue::new();
        let lifecycle = EngineLifecycle::new();
        let context = CommandContext {
            state: Arc::new(GameState::new()),
            selector: Arc::clone(&self.selector),
            output: Arc::new(OutputSink::new(writer)),
            lifecycle: lifecycle.clone(),
            name: self.config.name.clone(),
            author: self.config.author.clone(),
        };
        let dispatcher = Arc::new(CommandDispatcher::new(context));

        let workers = WorkerPool::spawn(
            self.config.effective_workers(),
            queue.clone(),
            dispatcher,
            lifecycle.clone(),
            self.config.pop_timeout(),
        )?;
        info!("pipeline up: {} workers", workers.len());

        let producer = LineSource::spawn(
            reader,
            queue,
            lifecycle.clone(),
            self.config.poll_interval(),
        )?;

        // The producer returns on `exit`, on end of input, or once it
        // observes a drain. In every case no further line can arrive, so
        // requesting a drain here is what turns end-of-input into a clean
        // shutdown; after a `quit` it is a no-op.
        if producer.join().is_err() {
            error!("line source panicked");
        }
        if lifecycle.request_drain() {
            debug!("input finished, draining queue");
        }
        workers.join();

        info!("pipeline down");
        Ok(())
    }
}
