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

//! Movement rules for each kind of piece.
//!
//! Every rule has the shape `(board, from, to, context) -> Option<Transition>`
//! and only answers whether the *geometry* of the move is legal. Whether the
//! move leaves the mover's king in check is decided by `legality::validate`.
//! A rule never touches the board it is given: on success it returns a
//! `Transition` owning a fresh copy of the board with the move applied.

use serde::{Deserialize, Serialize};

use super::attacks::{is_attacked, KING_MOVES, KNIGHT_MOVES};
use super::castling::{CastlingRights, RookFile};
use super::grid::Board;
use super::material::{Color, Material, Pair, Piece};
use super::position::{between, DIAGONALS, HORIZONTALS};
use super::square::{Direction, Offset, Rank, Square};
use super::Turn;

use Piece::*;

/// Cross-move state the movement rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveContext {
    turn: Color,
    last_double_step: Option<Square>,
    castling: Pair<CastlingRights>,
}

impl MoveContext {
    pub fn new(turn: Color, last_double_step: Option<Square>, castling: Pair<CastlingRights>) -> Self {
        Self {
            turn,
            last_double_step,
            castling,
        }
    }
    #[inline]
    pub fn last_double_step(&self) -> Option<Square> {
        self.last_double_step
    }
    #[inline]
    pub fn castling(&self, color: Color) -> &CastlingRights {
        &self.castling[color]
    }
}

impl Turn for MoveContext {
    fn turn(&self) -> Color {
        self.turn
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Standard,
    DoubleAdvance,
    EnPassant,
    Castle(RookFile),
}

/// A geometrically legal move together with the board it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    from: Square,
    to: Square,
    material: Material,
    captured: Option<Material>,
    kind: MoveKind,
    board: Board,
}

impl Transition {
    // Moves the piece on `from` to `to` on a copy of `board`.
    fn new(board: &Board, from: Square, to: Square, kind: MoveKind) -> Option<Self> {
        let mut result = *board;
        let material = result.remove(from)?;
        let captured = result.place(to, material);
        Some(Self {
            from,
            to,
            material,
            captured,
            kind,
            board: result,
        })
    }

    #[inline]
    pub fn from(&self) -> Square {
        self.from
    }
    #[inline]
    pub fn to(&self) -> Square {
        self.to
    }
    /// The piece that moved.
    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }
    #[inline]
    pub fn captured(&self) -> Option<Material> {
        self.captured
    }
    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }
    /// The board after the move.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    /// A pawn reached the far rank and must be promoted.
    pub fn is_promotion(&self) -> bool {
        self.material.piece().is_pawn() && self.to.rank().is_back_rank(!self.material.color())
    }
}

/// Geometric legality of moving whatever stands on `from` to `to`.
///
/// Rejects an empty source, a piece of the side not to move, a null move
/// and a destination occupied by a piece of the mover's own color, then
/// defers to the rule for the piece.
pub fn try_move(board: &Board, from: Square, to: Square, ctx: &MoveContext) -> Option<Transition> {
    let material = board.contents(from)?;
    if material.color() != ctx.turn() || from == to {
        return None;
    }
    if matches!(board.contents(to), Some(target) if target.color() == material.color()) {
        return None;
    }
    match material.piece() {
        Pawn => pawn_move(board, from, to, ctx),
        Knight => knight_move(board, from, to, ctx),
        Bishop => bishop_move(board, from, to, ctx),
        Rook => rook_move(board, from, to, ctx),
        Queen => queen_move(board, from, to, ctx),
        King => king_move(board, from, to, ctx),
    }
}

pub fn pawn_move(board: &Board, from: Square, to: Square, ctx: &MoveContext) -> Option<Transition> {
    let color = board.contents(from)?.color();
    let forward: Offset = Direction::forward(color).into();
    let offset = to - from;
    // rows advanced in the pawn's own direction
    match (offset.x.abs(), offset.y * forward.y) {
        (0, 1) => {
            if board.is_occupied(to) {
                return None;
            }
            Transition::new(board, from, to, MoveKind::Standard)
        }
        (0, 2) => {
            let middle = (from + forward)?;
            if from.rank() != Rank::pawn_rank(color) || board.is_occupied(middle) || board.is_occupied(to) {
                return None;
            }
            Transition::new(board, from, to, MoveKind::DoubleAdvance)
        }
        (1, 1) => match board.contents(to) {
            Some(target) if target.color() != color => Transition::new(board, from, to, MoveKind::Standard),
            Some(_) => None,
            None => en_passant(board, from, to, ctx),
        },
        _ => None,
    }
}

// The pawn that just advanced two squares stands beside `from`, on the
// target's file. It is captured on its own square, not on `to`.
fn en_passant(board: &Board, from: Square, to: Square, ctx: &MoveContext) -> Option<Transition> {
    let color = board.contents(from)?.color();
    if from.rank() != Rank::en_passant_rank(color) {
        return None;
    }
    let victim = Square::new(to.file(), from.rank());
    if ctx.last_double_step() != Some(victim) {
        return None;
    }
    if board.contents(victim) != Some(Material::new(!color, Pawn)) {
        return None;
    }
    let mut result = Transition::new(board, from, to, MoveKind::EnPassant)?;
    result.captured = result.board.remove(victim);
    Some(result)
}

pub fn knight_move(board: &Board, from: Square, to: Square, _ctx: &MoveContext) -> Option<Transition> {
    if !KNIGHT_MOVES[from].contains(to) {
        return None;
    }
    Transition::new(board, from, to, MoveKind::Standard)
}

pub fn bishop_move(board: &Board, from: Square, to: Square, _ctx: &MoveContext) -> Option<Transition> {
    if from == to || !DIAGONALS[from].contains(to) || !is_clear(board, from, to) {
        return None;
    }
    Transition::new(board, from, to, MoveKind::Standard)
}

pub fn rook_move(board: &Board, from: Square, to: Square, _ctx: &MoveContext) -> Option<Transition> {
    if from == to || !HORIZONTALS[from].contains(to) || !is_clear(board, from, to) {
        return None;
    }
    Transition::new(board, from, to, MoveKind::Standard)
}

pub fn queen_move(board: &Board, from: Square, to: Square, ctx: &MoveContext) -> Option<Transition> {
    bishop_move(board, from, to, ctx).or_else(|| rook_move(board, from, to, ctx))
}

pub fn king_move(board: &Board, from: Square, to: Square, ctx: &MoveContext) -> Option<Transition> {
    if KING_MOVES[from].contains(to) {
        return Transition::new(board, from, to, MoveKind::Standard);
    }
    if from.rank() != to.rank() {
        return None;
    }
    let side = RookFile::towards(from, to)?;
    castle(board, from, side, ctx)
}

fn castle(board: &Board, from: Square, side: RookFile, ctx: &MoveContext) -> Option<Transition> {
    let king = board.contents(from)?;
    let color = king.color();
    let rights = ctx.castling(color);
    if from != rights.king_src() || !rights.may_castle(side) {
        return None;
    }
    let rook_src = rights.rook_src(side);
    if board.contents(rook_src) != Some(Material::new(color, Rook)) {
        return None;
    }
    if !(rights.blocking_lane(side) & board.occupied()).is_empty() {
        return None;
    }
    if is_attacked(board, from, color) {
        return None;
    }
    // every square is tested with the king standing on it
    for square in rights.attacking_lane(side).iter() {
        let mut scratch = *board;
        scratch.remove(from);
        scratch.place(square, king);
        if is_attacked(&scratch, square, color) {
            return None;
        }
    }
    let mut result = Transition::new(board, from, rights.king_dest(side), MoveKind::Castle(side))?;
    let rook = result.board.remove(rook_src)?;
    result.board.place(rights.rook_dest(side), rook);
    Some(result)
}

fn is_clear(board: &Board, from: Square, to: Square) -> bool {
    (between(from, to) & board.occupied()).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position::Position;
    use crate::board::square::Mask;
    use strum::IntoEnumIterator;
    use Color::*;
    use Square::*;

    fn destinations(position: &Position, from: Square) -> Mask {
        let ctx = position.context();
        Mask::from_squares(
            Square::iter().filter(|&to| try_move(position.board(), from, to, &ctx).is_some()),
        )
    }

    fn play(position: &Position, from: Square, to: Square) -> Transition {
        try_move(position.board(), from, to, &position.context()).expect("move should be legal")
    }

    #[test]
    fn test_white_pawn_advance() {
        let position = Position::new();
        let mask = destinations(&position, E2);
        assert_eq!(mask, Mask::from_squares([E3, E4]));
    }
    #[test]
    fn test_black_pawn_advance() {
        let position = Position::new().set_turn(Black);
        let mask = destinations(&position, E7);
        assert_eq!(mask, Mask::from_squares([E6, E5]));
    }
    #[test]
    fn test_pawn_never_moves_backwards() {
        let position = Position::kings_only().set_contents(D4, Some(Material::WP));
        let mask = destinations(&position, D4);
        assert_eq!(mask, Mask::from_squares([D5]));
    }
    #[test]
    fn test_white_pawn_advance_blocked() {
        let position = Position::new().set_contents(E3, Some(Material::BB));
        let mask = destinations(&position, E2);
        assert!(!mask.contains(E3));
        assert!(!mask.contains(E4));
    }
    #[test]
    fn test_white_pawn_double_advance_blocked() {
        let position = Position::new().set_contents(E4, Some(Material::BB));
        let mask = destinations(&position, E2);
        assert!(mask.contains(E3));
        assert!(!mask.contains(E4));
    }
    #[test]
    fn test_double_advance_only_from_home_rank() {
        let position = Position::kings_only().set_contents(C3, Some(Material::WP));
        let mask = destinations(&position, C3);
        assert_eq!(mask, Mask::from_squares([C4]));
    }
    #[test]
    fn test_double_advance_kind() {
        let position = Position::new();
        let mv = play(&position, D2, D4);
        assert_eq!(mv.kind(), MoveKind::DoubleAdvance);
        let mv = play(&position, D2, D3);
        assert_eq!(mv.kind(), MoveKind::Standard);
    }
    #[test]
    fn test_white_pawn_capture() {
        let position = Position::new()
            .set_contents(D3, Some(Material::BB))
            .set_contents(F3, Some(Material::WN))
            .set_contents(B3, None);
        let mask = destinations(&position, E2);
        assert!(mask.contains(D3));
        assert!(!mask.contains(F3));
        let mask = destinations(&position, C2);
        assert!(mask.contains(D3));
        assert!(!mask.contains(B3));
        let mv = play(&position, E2, D3);
        assert_eq!(mv.captured(), Some(Material::BB));
        assert_eq!(mv.board().contents(D3), Some(Material::WP));
        assert_eq!(mv.board().contents(E2), None);
    }
    #[test]
    fn test_black_pawn_capture() {
        let position = Position::new()
            .set_turn(Black)
            .set_contents(D6, Some(Material::WB))
            .set_contents(F6, Some(Material::BN));
        let mask = destinations(&position, E7);
        assert!(mask.contains(D6));
        assert!(!mask.contains(F6));
        let mv = play(&position, E7, D6);
        assert_eq!(mv.board().contents(D6), Some(Material::BP));
        assert_eq!(mv.board().contents(E7), None);
    }
    #[test]
    fn test_pawn_reaching_last_rank_is_promotion() {
        let position = Position::kings_only()
            .set_contents(B7, Some(Material::WP))
            .set_contents(A8, Some(Material::BR));
        let mv = play(&position, B7, A8);
        assert!(mv.is_promotion());
        let mv = play(&position, B7, B8);
        assert!(mv.is_promotion());
        let mv = play(&position, E1, E2);
        assert!(!mv.is_promotion());
    }
    #[test]
    fn test_white_en_passant() {
        let position = Position::kings_only()
            .set_last_double_step(Some(B5))
            .set_contents(B5, Some(Material::BP))
            .set_contents(A5, Some(Material::WP));
        let mask = destinations(&position, A5);
        assert!(mask.contains(B6));
        let mv = play(&position, A5, B6);
        assert_eq!(mv.kind(), MoveKind::EnPassant);
        assert_eq!(mv.captured(), Some(Material::BP));
        assert_eq!(mv.board().contents(B6), Some(Material::WP));
        assert_eq!(mv.board().contents(B5), None);
        assert_eq!(mv.board().contents(A5), None);
    }
    #[test]
    fn test_black_en_passant() {
        let position = Position::kings_only()
            .set_turn(Black)
            .set_last_double_step(Some(B4))
            .set_contents(B4, Some(Material::WP))
            .set_contents(A4, Some(Material::BP));
        let mv = play(&position, A4, B3);
        assert_eq!(mv.board().contents(B3), Some(Material::BP));
        assert_eq!(mv.board().contents(B4), None);
        assert_eq!(mv.board().contents(A4), None);
    }
    #[test]
    fn test_en_passant_needs_double_step_beside() {
        let position = Position::kings_only()
            .set_contents(B5, Some(Material::BP))
            .set_contents(A5, Some(Material::WP));
        assert!(!destinations(&position, A5).contains(B6));
        // a double step on another file does not help
        let position = position
            .set_contents(H5, Some(Material::BP))
            .set_last_double_step(Some(H5));
        assert!(!destinations(&position, A5).contains(B6));
    }
    #[test]
    fn test_en_passant_needs_capturing_rank() {
        let position = Position::kings_only()
            .set_last_double_step(Some(B4))
            .set_contents(B4, Some(Material::BP))
            .set_contents(A4, Some(Material::WP));
        assert!(!destinations(&position, A4).contains(B5));
    }
    #[test]
    fn test_king_moves_one_square() {
        let position = Position::new().set_contents(E2, None);
        let mask = destinations(&position, E1);
        assert_eq!(mask, Mask::from_squares([E2]));
    }
    #[test]
    fn test_king_blocked() {
        let position = Position::new();
        assert!(destinations(&position, E1).is_empty());
    }
    #[test]
    fn test_short_castle() {
        let position = Position::new()
            .set_contents(F1, None)
            .set_contents(G1, None);
        assert!(destinations(&position, E1).contains(G1));
        let mv = play(&position, E1, G1);
        assert_eq!(mv.kind(), MoveKind::Castle(RookFile::KingSide));
        assert_eq!(mv.board().contents(G1), Some(Material::WK));
        assert_eq!(mv.board().contents(F1), Some(Material::WR));
        assert_eq!(mv.board().contents(E1), None);
        assert_eq!(mv.board().contents(H1), None);
    }
    #[test]
    fn test_long_castle() {
        let position = Position::new()
            .set_turn(Black)
            .set_contents(B8, None)
            .set_contents(C8, None)
            .set_contents(D8, None);
        let mv = play(&position, E8, C8);
        assert_eq!(mv.kind(), MoveKind::Castle(RookFile::QueenSide));
        assert_eq!(mv.board().contents(C8), Some(Material::BK));
        assert_eq!(mv.board().contents(D8), Some(Material::BR));
        assert_eq!(mv.board().contents(E8), None);
        assert_eq!(mv.board().contents(A8), None);
    }

    fn castling_ready() -> Position {
        Position::kings_only()
            .set_contents(A1, Some(Material::WR))
            .set_contents(H1, Some(Material::WR))
    }

    #[test]
    fn test_castle_ready_both_sides() {
        let mask = destinations(&castling_ready(), E1);
        assert!(mask.contains(G1));
        assert!(mask.contains(C1));
    }
    #[test]
    fn test_castle_after_king_moved() {
        let position = castling_ready().set_king_moved(White);
        let mask = destinations(&position, E1);
        assert!(!mask.contains(G1));
        assert!(!mask.contains(C1));
    }
    #[test]
    fn test_castle_after_rook_moved() {
        let position = castling_ready().set_rook_moved(White, RookFile::KingSide);
        let mask = destinations(&position, E1);
        assert!(!mask.contains(G1));
        assert!(mask.contains(C1));
    }
    #[test]
    fn test_castle_without_rook() {
        let position = castling_ready().set_contents(A1, None);
        assert!(!destinations(&position, E1).contains(C1));
        let position = castling_ready().set_contents(A1, Some(Material::WQ));
        assert!(!destinations(&position, E1).contains(C1));
        let position = castling_ready().set_contents(H1, Some(Material::BR));
        assert!(!destinations(&position, E1).contains(G1));
    }
    #[test]
    fn test_castle_lane_blocked() {
        let position = castling_ready().set_contents(B1, Some(Material::WN));
        let mask = destinations(&position, E1);
        assert!(!mask.contains(C1));
        assert!(mask.contains(G1));
        let position = castling_ready().set_contents(G1, Some(Material::BN));
        assert!(!destinations(&position, E1).contains(G1));
    }
    #[test]
    fn test_castle_out_of_check() {
        let position = castling_ready().set_contents(E5, Some(Material::BR));
        let mask = destinations(&position, E1);
        assert!(!mask.contains(G1));
        assert!(!mask.contains(C1));
    }
    #[test]
    fn test_castle_through_check() {
        let position = castling_ready().set_contents(F5, Some(Material::BR));
        let mask = destinations(&position, E1);
        assert!(!mask.contains(G1));
        assert!(mask.contains(C1));
    }
    #[test]
    fn test_castle_into_check() {
        let position = castling_ready().set_contents(C5, Some(Material::BR));
        let mask = destinations(&position, E1);
        assert!(!mask.contains(C1));
        assert!(mask.contains(G1));
    }
    #[test]
    fn test_long_castle_allowed_when_b1_attacked() {
        let position = castling_ready().set_contents(B5, Some(Material::BR));
        assert!(destinations(&position, E1).contains(C1));
    }
    #[test]
    fn test_castle_through_diagonal_check() {
        let position = castling_ready().set_contents(H3, Some(Material::BB));
        assert!(!destinations(&position, E1).contains(G1));
    }
    #[test]
    fn test_queen_destinations() {
        let position = Position::new()
            .set_contents(C1, None)
            .set_contents(C2, None)
            .set_contents(D2, None);
        let mask = destinations(&position, D1);
        assert_eq!(mask.len(), 10);
        assert!(mask.contains(C1));
        assert!(!mask.contains(B1));
        assert!(mask.contains(B3));
        assert!(mask.contains(D6));
        assert!(mask.contains(D7));
        assert!(!mask.contains(D8));
        assert!(!mask.contains(E2));
    }
    #[test]
    fn test_queen_blocked() {
        assert!(destinations(&Position::new(), D1).is_empty());
    }
    #[test]
    fn test_knight_destinations() {
        let mask = destinations(&Position::new(), G1);
        assert_eq!(mask, Mask::from_squares([F3, H3]));
    }
    #[test]
    fn test_knight_blocked() {
        let position = Position::new()
            .set_contents(F3, Some(Material::WP))
            .set_contents(H3, Some(Material::WP));
        assert!(destinations(&position, G1).is_empty());
    }
    #[test]
    fn test_rook_destinations() {
        let position = Position::new()
            .set_contents(A2, None)
            .set_contents(B1, None);
        let mask = destinations(&position, A1);
        assert_eq!(mask.len(), 7);
        assert!(mask.contains(B1));
        assert!(!mask.contains(B2));
        assert!(mask.contains(A3));
        assert!(mask.contains(A7));
        assert!(!mask.contains(A8));
    }
    #[test]
    fn test_bishop_destinations() {
        let position = Position::new()
            .set_contents(C2, None)
            .set_contents(D2, None);
        let mask = destinations(&position, C1);
        assert_eq!(mask.len(), 5);
        assert!(!mask.contains(B2));
        assert!(!mask.contains(C2));
        assert!(mask.contains(D2));
        assert!(mask.contains(E3));
        assert!(mask.contains(H6));
    }
    #[test]
    fn test_empty_source_rejected() {
        let position = Position::new();
        assert!(try_move(position.board(), E4, E5, &position.context()).is_none());
    }
    #[test]
    fn test_only_side_to_move() {
        let position = Position::new();
        assert!(try_move(position.board(), E7, E5, &position.context()).is_none());
        assert!(try_move(position.board(), B8, C6, &position.context()).is_none());
        let position = position.set_turn(Black);
        assert!(try_move(position.board(), E7, E5, &position.context()).is_some());
        assert!(try_move(position.board(), E2, E4, &position.context()).is_none());
    }
    #[test]
    fn test_source_board_untouched() {
        let position = Position::new();
        let before = *position.board();
        let mv = play(&position, G1, F3);
        assert_eq!(*position.board(), before);
        assert_ne!(*mv.board(), before);
    }
}
