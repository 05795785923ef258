use serde::{Deserialize, Serialize};
use std::fmt;

use super::GameError;

/// One of the two sides of the board.
/// `X` is the herb (player A), `O` is the moon (player B, the AI in single player).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

/// Winning combinations, checked in this order
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // columns
    [0, 4, 8], [2, 4, 6],            // diagonals
];

/// Represents the 3x3 board as a flat array of 9 cells
/// Index mapping: [0,1,2,3,4,5,6,7,8]
/// Visual layout:
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; 9],
}

impl Board {
    pub fn new() -> Self {
        Self { cells: [None; 9] }
    }

    /// Build a board from raw cells, mostly useful for setting up positions
    pub fn from_cells(cells: [Option<Player>; 9]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Player>; 9] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty(&self, index: usize) -> bool {
        index < 9 && self.cells[index].is_none()
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.cells[i].is_none()).collect()
    }

    /// Check if the board is full (draw condition if no winner)
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Convert row and column (0-indexed) to board index
    pub fn coords_to_index(row: usize, col: usize) -> Option<usize> {
        if row < 3 && col < 3 {
            Some(row * 3 + col)
        } else {
            None
        }
    }

    /// Copy of the board with `player` placed at `index`, used by the AI to look ahead.
    /// Returns None when the cell is taken or out of range.
    pub fn with_move(&self, index: usize, player: Player) -> Option<Board> {
        if !self.is_empty(index) {
            return None;
        }
        let mut next = *self;
        next.cells[index] = Some(player);
        Some(next)
    }

    fn set(&mut self, index: usize, player: Player) {
        self.cells[index] = Some(player);
    }
}

/// Result of scanning a board for a finished game
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardResult {
    NoWinner,
    Winner(Player),
    Draw,
}

/// Scan the eight lines for three in a row, then fall back to draw detection.
pub fn check_board(board: &Board) -> BoardResult {
    for line in &LINES {
        let [a, b, c] = *line;
        if let Some(player) = board.get(a) {
            if board.get(b) == Some(player) && board.get(c) == Some(player) {
                return BoardResult::Winner(player);
            }
        }
    }

    if board.is_full() {
        BoardResult::Draw
    } else {
        BoardResult::NoWinner
    }
}

/// How a finished game ended
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    #[serde(rename = "win")]
    Win(Player),
    #[serde(rename = "draw")]
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(player) => write!(f, "{player} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Represents the complete state of a single game
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    /// Whose turn it is
    pub current_player: Player,
    /// Only set once the game is over and someone completed a line
    pub winner: Option<Player>,
    pub is_over: bool,
}

impl GameState {
    /// Create a new game with an empty board
    pub fn new(starting_player: Player) -> Self {
        Self {
            board: Board::new(),
            current_player: starting_player,
            winner: None,
            is_over: false,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_over {
            return None;
        }
        Some(match self.winner {
            Some(player) => Outcome::Win(player),
            None => Outcome::Draw,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Player::X)
    }
}

/// Running tally across games of one session
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub wins_x: u32,
    pub wins_o: u32,
    pub ties: u32,
}

impl Score {
    pub fn wins(&self, player: Player) -> u32 {
        match player {
            Player::X => self.wins_x,
            Player::O => self.wins_o,
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(Player::X) => self.wins_x += 1,
            Outcome::Win(Player::O) => self.wins_o += 1,
            Outcome::Draw => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins_x + self.wins_o + self.ties
    }
}

/// Validate and apply a move in place.
///
/// On error neither `state` nor `score` is touched. On success the returned
/// result tells whether the move finished the game; if it did not, the turn
/// passes to the other player.
pub fn apply_move(
    state: &mut GameState,
    score: &mut Score,
    index: usize,
    player: Player,
) -> Result<BoardResult, GameError> {
    if state.is_over {
        return Err(GameError::GameOver);
    }
    if index >= 9 {
        return Err(GameError::OutOfRange(index));
    }
    if !state.board.is_empty(index) {
        return Err(GameError::CellOccupied(index));
    }

    state.board.set(index, player);

    let result = check_board(&state.board);
    match result {
        BoardResult::Winner(winner) => {
            state.is_over = true;
            state.winner = Some(winner);
            score.record(Outcome::Win(winner));
        }
        BoardResult::Draw => {
            state.is_over = true;
            state.winner = None;
            score.record(Outcome::Draw);
        }
        BoardResult::NoWinner => {
            state.current_player = player.other();
        }
    }

    Ok(result)
}

#[cfg(test)]
pub(crate) fn board(layout: &str) -> Board {
    let mut cells = [None; 9];
    for (i, c) in layout.chars().filter(|c| !c.is_whitespace()).enumerate() {
        cells[i] = match c {
            'X' => Some(Player::X),
            'O' => Some(Player::O),
            _ => None,
        };
    }
    Board::from_cells(cells)
}
