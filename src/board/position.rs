// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Index;
use strum::IntoEnumIterator;

use super::castling::{CastlingRights, RookFile};
use super::grid::Board;
use super::material::{Color, Material, Pair, Promotion};
use super::moves::{MoveContext, MoveKind, Transition};
use super::square::{Direction, Mask, Square};
use super::Turn;

use Color::*;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    InProgress,
    Checkmate,
    Stalemate,
}

impl GamePhase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(*self, GamePhase::InProgress)
    }
}

/// A snapshot of the game: the board plus everything that carries over
/// from one move to the next.
///
/// Positions are never edited in place. Each committed move or promotion
/// produces a new position via `with_move` or `with_promotion`, so a trial
/// that is abandoned leaves the original untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    turn: Color,
    last_double_step: Option<Square>,
    castling: Pair<CastlingRights>,
    pending_promotion: Option<Square>,
    phase: GamePhase,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::standard(), White)
    }

    /// A position with an arbitrary board and no castling, en passant or
    /// promotion history.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Self {
            board,
            turn,
            last_double_step: None,
            castling: Pair::default(),
            pending_promotion: None,
            phase: GamePhase::InProgress,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn contents(&self, square: Square) -> Option<Material> {
        self.board.contents(square)
    }
    #[inline]
    pub fn last_double_step(&self) -> Option<Square> {
        self.last_double_step
    }
    #[inline]
    pub fn castling(&self, color: Color) -> &CastlingRights {
        &self.castling[color]
    }
    #[inline]
    pub fn king_moved(&self, color: Color) -> bool {
        self.castling[color].king_moved()
    }
    #[inline]
    pub fn rook_moved(&self, color: Color, side: RookFile) -> bool {
        self.castling[color].rook_moved(side)
    }
    #[inline]
    pub fn pending_promotion(&self) -> bool {
        self.pending_promotion.is_some()
    }
    /// The square of the pawn waiting to be promoted.
    #[inline]
    pub fn promotion_square(&self) -> Option<Square> {
        self.pending_promotion
    }
    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The metadata the movement rules need besides the board.
    pub fn context(&self) -> MoveContext {
        MoveContext::new(self.turn, self.last_double_step, self.castling)
    }

    /// The position after committing `mv`.
    ///
    /// The turn passes to the other side unless `mv` brings a pawn to the
    /// far rank, in which case the position waits for `with_promotion`.
    pub fn with_move(&self, mv: &Transition) -> Self {
        let mut next = self.clone();
        let color = mv.material().color();
        next.board = *mv.board();
        next.last_double_step = match mv.kind() {
            MoveKind::DoubleAdvance => Some(mv.to()),
            _ => None,
        };
        if mv.material().piece().is_king() {
            next.castling[color].set_king_moved();
        }
        if let MoveKind::Castle(side) = mv.kind() {
            next.castling[color].set_rook_moved(side);
        }
        for side in Color::iter() {
            next.castling[side].update(mv.from());
            next.castling[side].update(mv.to());
        }
        if mv.is_promotion() {
            next.pending_promotion = Some(mv.to());
        } else {
            next.turn = !self.turn;
        }
        next
    }

    /// The position after replacing the waiting pawn with `promotion`.
    /// Must only be called while a promotion is pending.
    pub fn with_promotion(&self, promotion: Promotion) -> Self {
        debug_assert!(self.pending_promotion.is_some(), "no promotion pending");
        let mut next = self.clone();
        if let Some(square) = next.pending_promotion.take() {
            let pawn = next.board.remove(square);
            debug_assert!(matches!(pawn, Some(m) if m.piece().is_pawn()));
            if let Some(pawn) = pawn {
                next.board.place(square, pawn.with_piece(promotion.into()));
            }
            next.turn = !self.turn;
        }
        next
    }

    pub fn with_phase(&self, phase: GamePhase) -> Self {
        debug_assert!(!self.phase.is_terminal() || self.phase == phase);
        let mut next = self.clone();
        next.phase = phase;
        next
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.board[index]
    }
}

impl AsRef<Board> for Position {
    fn as_ref(&self) -> &Board {
        &self.board
    }
}

/// Squares strictly between `from` and `to` when they share a line,
/// otherwise the empty mask.
#[inline]
pub(super) fn between(from: Square, to: Square) -> Mask {
    let index = from.to_index() * 64 + to.to_index();
    SQUARES_BETWEEN[index]
}

pub(super) static SQUARES_BETWEEN: Lazy<[Mask; 64 * 64]> = Lazy::new(|| {
    // Returns a mask of squares between `start` and `end` (exclusive of both)
    // if they are not equal and in a line. Otherwise returns an empty mask.
    fn squares_between(start: Square, end: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(step) = (end - start).to_unit() {
            let mut next = start + step;
            while let Some(square) = next {
                if square == end {
                    break;
                }
                mask |= square;
                next = square + step;
            }
        }
        mask
    }

    let mut array = [Mask::empty(); 64 * 64];
    let mut visited = HashSet::new();
    for start in Square::iter() {
        let start_index = start.to_index();
        for end in Square::iter() {
            if start == end {
                continue;
            }
            let end_index = end.to_index();
            let index1 = start_index * 64 + end_index;
            let index2: usize = end_index * 64 + start_index;
            if visited.insert(index1) {
                visited.insert(index2);
                if ALL_LINES[start_index].contains(end) {
                    let mask = squares_between(start, end);
                    array[index1] = mask;
                    array[index2] = mask;
                }
            }
        }
    }
    array
});

/// Rank and file through each square.
pub(super) static HORIZONTALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        let mask = square.file().to_mask() | square.rank().to_mask();
        array[square] = mask;
    }
    array
});

/// Both diagonals through each square.
pub(super) static DIAGONALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        let mut mask = square.to_mask();
        Direction::diagonals().for_each(|dir| {
            let mut next = square + dir;
            while let Some(sq) = next {
                mask |= sq;
                next = sq + dir;
            }
        });
        array[square] = mask;
    }
    array
});

pub(super) static ALL_LINES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = HORIZONTALS[square] | DIAGONALS[square];
    }
    array
});

#[cfg(test)]
impl Position {
    /// Two bare kings on their home squares.
    pub fn kings_only() -> Self {
        Self::from_board(Board::empty(), White)
            .set_contents(Square::E1, Some(Material::WK))
            .set_contents(Square::E8, Some(Material::BK))
    }
    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self.board[square] = value;
        self
    }
    pub fn set_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }
    pub fn set_last_double_step(mut self, value: Option<Square>) -> Self {
        self.last_double_step = value;
        self
    }
    pub fn set_king_moved(mut self, color: Color) -> Self {
        self.castling[color].set_king_moved();
        self
    }
    pub fn set_rook_moved(mut self, color: Color, side: RookFile) -> Self {
        self.castling[color].set_rook_moved(side);
        self
    }
}
