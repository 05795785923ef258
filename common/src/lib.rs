pub mod activation;
pub mod games;

pub use activation::{Activation, Key, Trigger};
pub use games::ai::choose_move;
pub use games::session::{GameEvent, GameSession, GameSnapshot, Mode, SessionConfig};
pub use games::tic_tac_toe::{apply_move, check_board, Board, BoardResult, GameState, Outcome, Player, Score};
pub use games::GameError;
