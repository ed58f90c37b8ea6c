use crate::errors::{EngineError, Result};
use crate::invalid_fen;
use chess::{Board, ChessMove};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

/// Number of whitespace-separated fields in a complete FEN record
const FEN_FIELDS: usize = 6;

/// The shared game position.
///
/// Every read and write goes through [`GameState::lock`], which hands out a
/// guard holding the mutex, so a command handler keeps exclusive access to
/// the position for its whole critical section. Two workers can therefore
/// never interleave a reset with a move application.
pub struct GameState {
    board: Mutex<Board>,
}

impl GameState {
    /// Create a game state at the standard starting position
    pub fn new() -> Self {
        Self {
            board: Mutex::new(Board::default()),
        }
    }

    /// Take exclusive access to the position
    pub fn lock(&self) -> PositionGuard<'_> {
        PositionGuard {
            board: self
                .board
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        }
    }

    /// Copy of the current position
    pub fn snapshot(&self) -> Board {
        self.lock().board()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to the position for one command's critical section
pub struct PositionGuard<'a> {
    board: MutexGuard<'a, Board>,
}

impl PositionGuard<'_> {
    /// Reset to the standard starting position
    pub fn reset(&mut self) {
        *self.board = Board::default();
    }

    /// Replace the position from a FEN record.
    ///
    /// The record must carry exactly six fields and parse cleanly. On any
    /// failure the current position is left untouched.
    pub fn load_fen(&mut self, fen: &str) -> Result<()> {
        let fields = fen.split_whitespace().count();
        if fields != FEN_FIELDS {
            return Err(invalid_fen!(
                "expected {} fields, got {}: {}",
                FEN_FIELDS,
                fields,
                fen
            ));
        }
        let board =
            Board::from_str(fen).map_err(|_| EngineError::InvalidFen(fen.to_string()))?;
        *self.board = board;
        Ok(())
    }

    /// Apply one move given as UCI long algebraic or SAN text
    pub fn apply_move(&mut self, move_text: &str) -> Result<()> {
        let mv = parse_move(&self.board, move_text).ok_or_else(|| EngineError::IllegalMove {
            move_text: move_text.to_string(),
            position: self.board.to_string(),
        })?;
        let next = self.board.make_move_new(mv);
        *self.board = next;
        Ok(())
    }

    /// Apply a move list in order.
    ///
    /// Stops at the first move that does not apply; the moves before it
    /// stay applied.
    pub fn apply_moves(&mut self, moves: &[&str]) -> Result<()> {
        for move_text in moves {
            self.apply_move(move_text)?;
        }
        Ok(())
    }

    /// Copy of the position under the guard
    pub fn board(&self) -> Board {
        *self.board
    }

    /// FEN record for the position under the guard
    pub fn fen(&self) -> String {
        self.board.to_string()
    }
}

/// Parse move text against a position: UCI long algebraic first, SAN as a
/// fallback. Returns None when the text does not name a legal move.
fn parse_move(board: &Board, text: &str) -> Option<ChessMove> {
    if let Ok(mv) = ChessMove::from_str(text) {
        if board.legal(mv) {
            return Some(mv);
        }
    }
    ChessMove::from_san(board, text).ok()
}
