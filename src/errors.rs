use std::fmt;

/// Error types for the UCI command pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Command token (or `position` sub-mode) not in the dispatch table
    UnknownCommand(String),
    /// FEN string rejected before it touched the position
    InvalidFen(String),
    /// Move text that does not parse or is not legal in the current position
    IllegalMove {
        move_text: String,
        position: String,
    },
    /// The side to move has no legal moves (checkmate or stalemate)
    NoLegalMoves(String),
    /// Reply could not be written to the output stream
    Io(String),
    /// Configuration file or value rejected
    Config(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnknownCommand(cmd) => write!(f, "Unknown command: {}", cmd),
            EngineError::InvalidFen(fen) => write!(f, "Invalid FEN: {}", fen),
            EngineError::IllegalMove { move_text, position } => {
                write!(f, "Illegal move '{}' in position {}", move_text, position)
            }
            EngineError::NoLegalMoves(position) => {
                write!(f, "No legal moves in position {}", position)
            }
            EngineError::Io(msg) => write!(f, "I/O error: {}", msg),
            EngineError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

// Convenience type alias
pub type Result<T> = std::result::Result<T, EngineError>;

// Convert from common error types
impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::Config(format!("JSON error: {}", error))
    }
}

// Helper macros for error creation
#[macro_export]
macro_rules! invalid_fen {
    ($msg:expr) => {
        $crate::errors::EngineError::InvalidFen($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::EngineError::InvalidFen(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::errors::EngineError::Config($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::errors::EngineError::Config(format!($fmt, $($arg)*))
    };
}
