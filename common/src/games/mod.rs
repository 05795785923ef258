pub mod ai;
pub mod session;
pub mod tic_tac_toe;

/// Errors that can occur during game operations.
/// All of them leave the game untouched and are recovered by ignoring the input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cell {0} is out of range")]
    OutOfRange(usize),
    #[error("cell {0} is already occupied")]
    CellOccupied(usize),
    #[error("game is already over")]
    GameOver,
    #[error("not your turn")]
    NotYourTurn,
    #[error("waiting for the AI to move")]
    AiThinking,
    #[error("stale AI move (expected generation {expected}, found {found})")]
    StaleGeneration { expected: u64, found: u64 },
    #[error("no AI move is pending")]
    NoPendingMove,
}
