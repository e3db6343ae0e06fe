//! Adversarial move search
//!
//! Plain minimax over the 3x3 board. Terminal boards score +1 for a win by
//! the searching side, -1 for a loss and 0 for a tie. The whole tree is at
//! most 9! leaves, so no transposition table is kept.

use rand::Rng;
use rand::seq::IteratorRandom;

use super::board::{Board, Cell, Marker, Outcome, check_win};
use super::turn::Player;

const WIN: i8 = 1;
const LOSS: i8 = -1;

/// Score of a terminal board from `me`'s point of view
fn terminal_score(outcome: Outcome, me: Marker) -> i8 {
    match outcome {
        Outcome::Win(m) if m == me => WIN,
        Outcome::Win(_) => LOSS,
        Outcome::Tie => 0,
    }
}

/// Minimax value of `board` with `to_move` about to play, scored for `me`.
///
/// A node stops expanding once it reaches the best value it can get (+1 for
/// the maximizer, -1 for the minimizer); that cutoff never changes a value.
pub fn minimax(board: &mut Board, me: Marker, to_move: Marker) -> i8 {
    if let Some(outcome) = check_win(board) {
        return terminal_score(outcome, me);
    }

    let maximizing = to_move == me;
    let mut best = if maximizing { i8::MIN } else { i8::MAX };

    for cell in Cell::ALL {
        if !board.is_empty_at(cell) {
            continue;
        }
        board.place(cell, to_move);
        let score = minimax(board, me, to_move.other());
        board.clear(cell);

        if maximizing {
            best = best.max(score);
            if best == WIN {
                break;
            }
        } else {
            best = best.min(score);
            if best == LOSS {
                break;
            }
        }
    }

    best
}

/// Best move for `me` assuming optimal replies.
///
/// Among equally scored moves the first in row-major order wins. Returns
/// `None` on a full or already decided board.
pub fn best_move(board: &Board, me: Marker) -> Option<Cell> {
    if check_win(board).is_some() {
        return None;
    }

    let mut scratch = *board;
    let mut best: Option<(Cell, i8)> = None;

    for cell in Cell::ALL {
        if !scratch.is_empty_at(cell) {
            continue;
        }
        scratch.place(cell, me);
        let score = minimax(&mut scratch, me, me.other());
        scratch.clear(cell);

        if best.is_none_or(|(_, s)| score > s) {
            best = Some((cell, score));
        }
        if score == WIN {
            break;
        }
    }

    best.map(|(cell, _)| cell)
}

/// Pick a move for `player`: a uniformly random empty cell with probability
/// equal to the player's randomness weight, otherwise the searched move.
pub fn choose_move<R: Rng + ?Sized>(board: &Board, player: &Player, rng: &mut R) -> Option<Cell> {
    if check_win(board).is_some() {
        return None;
    }

    let randomness = player.role.randomness().clamp(0.0, 1.0);
    if randomness > 0.0 && rng.random_bool(randomness) {
        let cell = board.empty_cells().choose(rng);
        log::debug!("{} plays a random move: {:?}", player.name, cell);
        return cell;
    }

    let cell = best_move(board, player.marker);
    log::debug!("{} plays searched move: {:?}", player.name, cell);
    cell
}
