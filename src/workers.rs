use crate::command_queue::CommandQueue;
use crate::dispatch::CommandDispatcher;
use crate::lifecycle::{EngineLifecycle, LifecycleState};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Pool of identical command workers draining the queue.
///
/// Each worker pops with a bounded timeout and rechecks the lifecycle flag
/// whenever the queue stays empty, so a shutdown request is observed within
/// one timeout even with no input flowing. The worker that finds the queue
/// empty while draining performs the Draining -> Stopped transition; only a
/// Stopped flag makes workers exit, which is what guarantees that commands
/// queued before a `quit` still execute and reply.
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `count` workers over the queue
    pub fn spawn(
        count: usize,
        queue: CommandQueue,
        dispatcher: Arc<CommandDispatcher>,
        lifecycle: EngineLifecycle,
        pop_timeout: Duration,
    ) -> std::io::Result<Self> {
        let mut workers = Vec::with_capacity(count);
        for id in 0..count {
            let queue = queue.clone();
            let dispatcher = Arc::clone(&dispatcher);
            let lifecycle = lifecycle.clone();
            let handle = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, queue, dispatcher, lifecycle, pop_timeout))?;
            workers.push(handle);
        }
        Ok(Self { workers })
    }

    fn worker_loop(
        id: usize,
        queue: CommandQueue,
        dispatcher: Arc<CommandDispatcher>,
        lifecycle: EngineLifecycle,
        pop_timeout: Duration,
    ) {
        debug!("worker {} started", id);
        loop {
            if lifecycle.is_stopped() {
                break;
            }
            match queue.pop_timeout(pop_timeout) {
                Some(line) => dispatcher.dispatch(&line),
                None => match lifecycle.state() {
                    LifecycleState::Running => continue,
                    LifecycleState::Draining => {
                        if queue.is_empty() && lifecycle.finish_drain() {
                            debug!("worker {} drained the queue", id);
                            break;
                        }
                    }
                    LifecycleState::Stopped => break,
                },
            }
        }
        debug!("worker {} exiting", id);
    }

    /// Number of workers in the pool
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker to exit
    pub fn join(self) {
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::CommandContext;
    use crate::game_state::GameState;
    use crate::output::test_support::SharedBuf;
    use crate::output::OutputSink;
    use crate::selector::RandomSelector;

    const POP_TIMEOUT: Duration = Duration::from_millis(20);

    fn test_pipeline() -> (CommandQueue, Arc<CommandDispatcher>, EngineLifecycle, SharedBuf) {
        let buf = SharedBuf::new();
        let lifecycle = EngineLifecycle::new();
        let context = CommandContext {
            state: Arc::new(GameState::new()),
            selector: Arc::new(RandomSelector::new()),
            output: Arc::new(OutputSink::new(Box::new(buf.clone()))),
            lifecycle: lifecycle.clone(),
            name: "botSalmon".to_string(),
            author: "camaral".to_string(),
        };
        (
            CommandQueue::new(),
            Arc::new(CommandDispatcher::new(context)),
            lifecycle,
            buf,
        )
    }

    #[test]
    fn test_drain_executes_everything_already_queued() {
        let (queue, dispatcher, lifecycle, buf) = test_pipeline();
        queue.push("position startpos moves e2e4".to_string());
        queue.push("go".to_string());
        queue.push("quit".to_string());
        queue.push("isready".to_string());
        queue.push("go".to_string());

        let pool = WorkerPool::spawn(2, queue.clone(), dispatcher, lifecycle.clone(), POP_TIMEOUT)
            .unwrap();
        pool.join();

        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert!(queue.is_empty());

        let lines = buf.lines();
        let bestmoves = lines.iter().filter(|l| l.starts_with("bestmove ")).count();
        let readyoks = lines.iter().filter(|l| *l == "readyok").count();
        assert_eq!(bestmoves, 2);
        assert_eq!(readyoks, 1);
    }

    #[test]
    fn test_idle_workers_wait_for_the_signal() {
        let (queue, dispatcher, lifecycle, _) = test_pipeline();
        let pool = WorkerPool::spawn(2, queue.clone(), dispatcher, lifecycle.clone(), POP_TIMEOUT)
            .unwrap();
        assert_eq!(pool.len(), 2);

        // Several empty poll rounds; nobody may give up
        thread::sleep(POP_TIMEOUT * 4);
        assert_eq!(lifecycle.state(), LifecycleState::Running);

        queue.push("quit".to_string());
        pool.join();
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[test]
    fn test_single_worker_drains_alone() {
        let (queue, dispatcher, lifecycle, buf) = test_pipeline();
        queue.push("isready".to_string());
        queue.push("exit".to_string());

        let pool =
            WorkerPool::spawn(1, queue, dispatcher, lifecycle.clone(), POP_TIMEOUT).unwrap();
        pool.join();

        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert_eq!(buf.lines(), vec!["readyok"]);
    }
}
