//! Rule-based opponent.
//!
//! The AI looks a single move ahead: it takes a winning cell, otherwise blocks
//! the opponent's winning cell, otherwise prefers center, corners, then edges.
//! It does not see double threats, so a player who sets up a fork beats it.

use rand::seq::SliceRandom;
use rand::Rng;

use super::tic_tac_toe::{check_board, Board, BoardResult, Player};

const CENTER: usize = 4;
const CORNERS: [usize; 4] = [0, 2, 6, 8];
const EDGES: [usize; 4] = [1, 3, 5, 7];

/// Pick a cell for `ai`. Returns None only when the board is full.
pub fn choose_move<R: Rng + ?Sized>(board: &Board, ai: Player, human: Player, rng: &mut R) -> Option<usize> {
    if let Some(index) = completing_move(board, ai) {
        log::debug!("AI {ai} takes winning cell {index}");
        return Some(index);
    }

    if let Some(index) = completing_move(board, human) {
        log::debug!("AI {ai} blocks {human} at {index}");
        return Some(index);
    }

    if board.is_empty(CENTER) {
        return Some(CENTER);
    }

    random_empty(board, &CORNERS, rng).or_else(|| random_empty(board, &EDGES, rng))
}

/// First empty cell that would complete a line for `player`
fn completing_move(board: &Board, player: Player) -> Option<usize> {
    board.empty_cells().into_iter().find(|&index| {
        board
            .with_move(index, player)
            .map(|next| check_board(&next) == BoardResult::Winner(player))
            .unwrap_or(false)
    })
}

fn random_empty<R: Rng + ?Sized>(board: &Board, candidates: &[usize], rng: &mut R) -> Option<usize> {
    let open: Vec<usize> = candidates.iter().copied().filter(|&i| board.is_empty(i)).collect();
    open.choose(rng).copied()
}
