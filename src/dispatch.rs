use crate::errors::{EngineError, Result};
use crate::game_state::GameState;
use crate::lifecycle::EngineLifecycle;
use crate::output::OutputSink;
use crate::selector::{MoveSelector, SearchLimits};
use log::{debug, error};
use std::collections::HashMap;
use std::sync::Arc;

/// Shared services a command handler can touch
pub struct CommandContext {
    pub state: Arc<GameState>,
    pub selector: Arc<dyn MoveSelector>,
    pub output: Arc<OutputSink>,
    pub lifecycle: EngineLifecycle,
    pub name: String,
    pub author: String,
}

/// A command handler: the shared context plus the argument tokens
type Handler = fn(&CommandContext, &[&str]) -> Result<()>;

/// Table-driven command dispatcher.
///
/// The command word of each line is looked up in a handler table; adding a
/// command is one `insert`, with no branching chain to grow. Handlers run on
/// whatever worker popped the line.
pub struct CommandDispatcher {
    context: CommandContext,
    handlers: HashMap<&'static str, Handler>,
}

impl CommandDispatcher {
    pub fn new(context: CommandContext) -> Self {
        let mut handlers: HashMap<&'static str, Handler> = HashMap::new();
        handlers.insert("uci", handle_uci);
        handlers.insert("isready", handle_isready);
        handlers.insert("ucinewgame", handle_ucinewgame);
        handlers.insert("position", handle_position);
        handlers.insert("go", handle_go);
        handlers.insert("quit", handle_quit);
        handlers.insert("exit", handle_quit);
        Self { context, handlers }
    }

    /// Execute one raw command line.
    ///
    /// Every taxonomy error is logged and swallowed here; a malformed or
    /// unknown command never takes a worker down.
    pub fn dispatch(&self, line: &str) {
        debug!("command received: {}", line);
        if let Err(err) = self.execute(line) {
            error!("{}", err);
        }
    }

    fn execute(&self, line: &str) -> Result<()> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(());
        }
        match self.handlers.get(parts[0]) {
            Some(handler) => handler(&self.context, &parts[1..]),
            None => Err(EngineError::UnknownCommand(parts[0].to_string())),
        }
    }
}

fn handle_uci(ctx: &CommandContext, _args: &[&str]) -> Result<()> {
    let name = format!("id name {}", ctx.name);
    let author = format!("id author {}", ctx.author);
    ctx.output.send_many(&[&name, &author, "uciok"])
}

fn handle_isready(ctx: &CommandContext, _args: &[&str]) -> Result<()> {
    ctx.output.send("readyok")
}

fn handle_ucinewgame(ctx: &CommandContext, _args: &[&str]) -> Result<()> {
    ctx.state.lock().reset();
    Ok(())
}

fn handle_position(ctx: &CommandContext, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(EngineError::UnknownCommand("position".to_string()));
    }

    let moves_idx = args.iter().position(|&t| t == "moves");
    let moves = moves_idx.map(|i| &args[i + 1..]).unwrap_or(&[]);

    // One guard for the whole command: the base position and the move list
    // land atomically with respect to other workers.
    let mut guard = ctx.state.lock();
    match args[0] {
        "startpos" => guard.reset(),
        "fen" => {
            let end = moves_idx.unwrap_or(args.len());
            let fen = args[1..end].join(" ");
            guard.load_fen(&fen)?;
        }
        other => {
            return Err(EngineError::UnknownCommand(format!("position {}", other)));
        }
    }
    guard.apply_moves(moves)
}

fn handle_go(ctx: &CommandContext, args: &[&str]) -> Result<()> {
    let limits = SearchLimits::from_tokens(args);

    // Selection reads the position but never writes it back; the guard is
    // held across the whole reply so the move always matches a position
    // that was actually current.
    let guard = ctx.state.lock();
    match ctx.selector.choose(&guard.board(), &limits) {
        Ok(mv) => ctx.output.send(&format!("bestmove {}", mv)),
        Err(EngineError::NoLegalMoves(position)) => {
            debug!("no legal move in {}", position);
            ctx.output.send("bestmove 0000")
        }
        Err(err) => Err(err),
    }
}

fn handle_quit(ctx: &CommandContext, _args: &[&str]) -> Result<()> {
    if ctx.lifecycle.request_drain() {
        debug!("shutdown requested, draining queue");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleState;
    use crate::output::test_support::SharedBuf;
    use crate::selector::RandomSelector;
    use chess::{Board, ChessMove, MoveGen};
    use std::str::FromStr;

    fn test_dispatcher() -> (CommandDispatcher, SharedBuf, EngineLifecycle) {
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
        (CommandDispatcher::new(context), buf, lifecycle)
    }

    #[test]
    fn test_uci_handshake() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("uci");

        assert_eq!(
            buf.lines(),
            vec!["id name botSalmon", "id author camaral", "uciok"]
        );
    }

    #[test]
    fn test_isready() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("isready");
        assert_eq!(buf.lines(), vec!["readyok"]);
    }

    #[test]
    fn test_ucinewgame_resets_and_is_idempotent() {
        let (dispatcher, _, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4 e7e5");

        dispatcher.dispatch("ucinewgame");
        assert_eq!(dispatcher.context.state.snapshot(), Board::default());

        dispatcher.dispatch("ucinewgame");
        assert_eq!(dispatcher.context.state.snapshot(), Board::default());
    }

    #[test]
    fn test_position_startpos_with_moves() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4 e7e5");

        let mut expected = Board::default();
        expected = expected.make_move_new(ChessMove::from_str("e2e4").unwrap());
        expected = expected.make_move_new(ChessMove::from_str("e7e5").unwrap());
        assert_eq!(dispatcher.context.state.snapshot(), expected);
        assert!(buf.lines().is_empty());
    }

    #[test]
    fn test_position_bare_startpos_resets() {
        let (dispatcher, _, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4");
        dispatcher.dispatch("position startpos");
        assert_eq!(dispatcher.context.state.snapshot(), Board::default());
    }

    #[test]
    fn test_position_fen_with_moves() {
        let (dispatcher, _, _) = test_dispatcher();
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        dispatcher.dispatch(&format!("position fen {} moves d2d4", fen));

        let expected = Board::default().make_move_new(ChessMove::from_str("d2d4").unwrap());
        assert_eq!(dispatcher.context.state.snapshot(), expected);
    }

    #[test]
    fn test_malformed_fen_changes_nothing_and_stays_silent() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4");
        let before = dispatcher.context.state.snapshot();

        dispatcher.dispatch("position fen a b");

        assert_eq!(dispatcher.context.state.snapshot(), before);
        assert!(buf.lines().is_empty());
    }

    #[test]
    fn test_illegal_move_keeps_prefix() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4 e2e4 e7e5");

        let expected = Board::default().make_move_new(ChessMove::from_str("e2e4").unwrap());
        assert_eq!(dispatcher.context.state.snapshot(), expected);
        assert!(buf.lines().is_empty());
    }

    #[test]
    fn test_go_replies_with_a_legal_move() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4");
        dispatcher.dispatch("go movetime 100");

        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        let move_text = lines[0].strip_prefix("bestmove ").expect("bestmove reply");
        let mv = ChessMove::from_str(move_text).unwrap();

        let board = dispatcher.context.state.snapshot();
        let legal: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        assert!(legal.contains(&mv));
    }

    #[test]
    fn test_go_does_not_mutate_position() {
        let (dispatcher, _, _) = test_dispatcher();
        dispatcher.dispatch("position startpos moves e2e4 c7c5");
        let before = dispatcher.context.state.snapshot();

        dispatcher.dispatch("go");
        assert_eq!(dispatcher.context.state.snapshot(), before);
    }

    #[test]
    fn test_go_with_no_legal_moves_replies_null() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("position fen 7k/5Q2/5K2/8/8/8/8/8 b - - 0 1");
        dispatcher.dispatch("go");

        assert_eq!(buf.lines(), vec!["bestmove 0000"]);
    }

    #[test]
    fn test_unknown_command_stays_silent() {
        let (dispatcher, buf, _) = test_dispatcher();
        dispatcher.dispatch("flibber");
        dispatcher.dispatch("position teleport");
        dispatcher.dispatch("");

        assert!(buf.lines().is_empty());
        assert_eq!(dispatcher.context.state.snapshot(), Board::default());
    }

    #[test]
    fn test_quit_and_exit_request_drain() {
        let (dispatcher, buf, lifecycle) = test_dispatcher();
        dispatcher.dispatch("quit");
        assert_eq!(lifecycle.state(), LifecycleState::Draining);

        // Second request is a no-op, not an error
        dispatcher.dispatch("exit");
        assert_eq!(lifecycle.state(), LifecycleState::Draining);
        assert!(buf.lines().is_empty());
    }
}
