//! # botSalmon
//!
//! A **multithreaded UCI chess engine front-end** that keeps the protocol
//! plumbing honest: a readiness-polled line source feeds a thread-safe
//! command queue drained by worker threads, with every reply flushed through
//! a serialized output sink. Chess rules are delegated entirely to the
//! [`chess`] crate; move choice sits behind a pluggable strategy trait with
//! a uniform random baseline.
//!
//! ## Features
//!
//! - **🔀 Concurrent command pipeline**: one producer, N workers, zero torn
//!   replies and zero lost commands
//! - **🛑 Drain-then-stop shutdown**: `quit`/`exit` stop input immediately
//!   but every command already queued still executes and replies
//! - **♟️ Delegated rules**: FEN parsing, legality and move generation come
//!   from the `chess` crate, never reimplemented here
//! - **🎲 Pluggable move choice**: swap the random baseline for a real
//!   search without touching the pipeline
//!
//! ## Quick Start
//!
//! ```rust
//! use botsalmon::{EngineConfig, UciEngine};
//! use std::io::Cursor;
//!
//! // Drive a scripted session; stdin/stdout work the same way
//! let engine = UciEngine::new(EngineConfig::default());
//! let script = Cursor::new("uci\nisready\nposition startpos moves e2e4\ngo\nquit\n");
//! engine.run_with_io(script, Box::new(Vec::<u8>::new())).unwrap();
//! ```

// Core modules
pub mod command_queue;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod game_state;
pub mod lifecycle;
pub mod line_source;
pub mod output;
pub mod selector;
pub mod workers;

// Re-export commonly used types
pub use command_queue::CommandQueue;
pub use config::EngineConfig;
pub use dispatch::{CommandContext, CommandDispatcher};
pub use engine::UciEngine;
pub use errors::{EngineError, Result};
pub use game_state::{GameState, PositionGuard};
pub use lifecycle::{EngineLifecycle, LifecycleState};
pub use line_source::LineSource;
pub use output::OutputSink;
pub use selector::{MoveSelector, RandomSelector, SearchLimits};
pub use workers::WorkerPool;
