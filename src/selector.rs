use crate::errors::{EngineError, Result};
use chess::{Board, ChessMove, MoveGen};
use rand::seq::SliceRandom;

/// Search constraints parsed from a `go` command.
///
/// The baseline selector ignores them, but they are part of the contract so
/// a time-aware search can slot in without touching the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub infinite: bool,
}

impl SearchLimits {
    /// Parse the argument tokens of a `go` command (everything after the
    /// command word). Unrecognized tokens are skipped.
    pub fn from_tokens(tokens: &[&str]) -> Self {
        let mut limits = SearchLimits::default();
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                "wtime" if i + 1 < tokens.len() => {
                    limits.wtime = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "btime" if i + 1 < tokens.len() => {
                    limits.btime = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "winc" if i + 1 < tokens.len() => {
                    limits.winc = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "binc" if i + 1 < tokens.len() => {
                    limits.binc = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "movestogo" if i + 1 < tokens.len() => {
                    limits.movestogo = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "depth" if i + 1 < tokens.len() => {
                    limits.depth = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "nodes" if i + 1 < tokens.len() => {
                    limits.nodes = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "movetime" if i + 1 < tokens.len() => {
                    limits.movetime = tokens[i + 1].parse().ok();
                    i += 2;
                }
                "infinite" => {
                    limits.infinite = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        limits
    }
}

/// Strategy interface for picking a move in a given position.
///
/// Implementations never mutate the position; `go` hands them a copy of the
/// board and publishes whatever they return. A position with no legal moves
/// is reported as [`EngineError::NoLegalMoves`] so the caller can emit the
/// null-move reply.
pub trait MoveSelector: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Pick a legal move in `board`
    fn choose(&self, board: &Board, limits: &SearchLimits) -> Result<ChessMove>;
}

/// Baseline selector: a uniform random draw over the legal moves
#[derive(Debug, Default)]
pub struct RandomSelector;

impl RandomSelector {
    pub fn new() -> Self {
        Self
    }
}

impl MoveSelector for RandomSelector {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&self, board: &Board, _limits: &SearchLimits) -> Result<ChessMove> {
        let moves: Vec<ChessMove> = MoveGen::new_legal(board).collect();
        moves
            .choose(&mut rand::thread_rng())
            .copied()
            .ok_or_else(|| EngineError::NoLegalMoves(board.to_string()))
    }
}
