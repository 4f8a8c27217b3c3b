// Copyright 2026 Tobin Edwards
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
use strum::IntoEnumIterator;

use super::grid::Board;
use super::material::{Color, Piece};
use super::square::{Direction, Mask, Offset, Square};

use Piece::*;

/// Is `square` attacked by the opponent of `defending`?
///
/// Looks outward from `square` along every pattern an enemy piece could
/// attack it from: pawn diagonals, knight leaps, the four diagonal and four
/// straight rays (each stopped by the first occupied square), and the
/// adjacent squares for the enemy king. The contents of `square` itself
/// are ignored.
pub fn is_attacked(board: &Board, square: Square, defending: Color) -> bool {
    let attacker = !defending;
    let holds = |from: Square, pieces: &[Piece]| -> bool {
        matches!(board.contents(from), Some(m) if m.color() == attacker && pieces.contains(&m.piece()))
    };

    // an attacking pawn stands one step behind `square` from its own side
    let forward: Offset = Direction::forward(attacker).into();
    for x in [-1, 1] {
        if let Some(from) = square + Offset::new(x, -forward.y) {
            if holds(from, &[Pawn]) {
                return true;
            }
        }
    }

    if KNIGHT_MOVES[square].iter().any(|from| holds(from, &[Knight])) {
        return true;
    }
    if KING_MOVES[square].iter().any(|from| holds(from, &[King])) {
        return true;
    }

    let ray_hit = |dir: Direction, pieces: &[Piece]| -> bool {
        let mut next = square + dir;
        while let Some(from) = next {
            if board.is_occupied(from) {
                return holds(from, pieces);
            }
            next = from + dir;
        }
        false
    };
    Direction::diagonals().any(|dir| ray_hit(dir, &[Bishop, Queen]))
        || Direction::horizontals().any(|dir| ray_hit(dir, &[Rook, Queen]))
}

/// Is the king of `color` attacked on `board`?
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .king(color)
        .is_some_and(|king| is_attacked(board, king, color))
}

pub(super) static KING_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = Mask::from_squares(Direction::iter().filter_map(|dir| square + dir));
    }
    array
});

pub(super) static KNIGHT_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    const OFFSETS: [Offset; 8] = [
        Offset::new(-2, -1),
        Offset::new(-2, 1),
        Offset::new(2, -1),
        Offset::new(2, 1),
        Offset::new(-1, -2),
        Offset::new(-1, 2),
        Offset::new(1, -2),
        Offset::new(1, 2),
    ];
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] =
            Mask::from_squares(OFFSETS.into_iter().filter_map(|offset| square + offset));
    }
    array
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::material::Material;
    use Square::*;

    fn lone(square: Square, material: Material) -> Board {
        let mut board = Board::empty();
        board.place(square, material);
        board
    }

    fn attacked_by(board: &Board, defending: Color) -> Mask {
        Mask::from_squares(Square::iter().filter(|&sq| is_attacked(board, sq, defending)))
    }

    #[test]
    fn test_knight_attacks() {
        let board = lone(D4, Material::BN);
        let mask = attacked_by(&board, Color::White);
        assert_eq!(mask, Mask::from_squares([B3, B5, C2, C6, E2, E6, F3, F5]));
        // own pieces are never reported as attacked by their own side
        assert!(attacked_by(&board, Color::Black).is_empty());
    }
    #[test]
    fn test_king_attacks() {
        let board = lone(A1, Material::WK);
        let mask = attacked_by(&board, Color::Black);
        assert_eq!(mask, Mask::from_squares([A2, B1, B2]));
    }
    #[test]
    fn test_pawn_attacks_depend_on_color() {
        let board = lone(D4, Material::WP);
        assert_eq!(attacked_by(&board, Color::Black), Mask::from_squares([C5, E5]));
        let board = lone(D4, Material::BP);
        assert_eq!(attacked_by(&board, Color::White), Mask::from_squares([C3, E3]));
    }
    #[test]
    fn test_pawn_attacks_last_rank() {
        let board = lone(B2, Material::BP);
        assert!(is_attacked(&board, A1, Color::White));
        assert!(is_attacked(&board, C1, Color::White));
        assert!(!is_attacked(&board, B1, Color::White));
    }
    #[test]
    fn test_rook_attacks() {
        let board = lone(D4, Material::BR);
        let mask = attacked_by(&board, Color::White);
        assert_eq!(mask.len(), 14);
        assert!(mask.contains(D8));
        assert!(mask.contains(A4));
        assert!(!mask.contains(E5));
    }
    #[test]
    fn test_bishop_attacks() {
        let board = lone(D4, Material::WB);
        let mask = attacked_by(&board, Color::Black);
        assert_eq!(mask.len(), 13);
        assert!(mask.contains(A1));
        assert!(mask.contains(H8));
        assert!(mask.contains(A7));
        assert!(mask.contains(G1));
        assert!(!mask.contains(D5));
    }
    #[test]
    fn test_queen_attacks() {
        let board = lone(D4, Material::BQ);
        assert_eq!(attacked_by(&board, Color::White).len(), 27);
    }
    #[test]
    fn test_ray_stops_at_blocker() {
        let mut board = lone(A1, Material::BR);
        board.place(A4, Material::WP);
        assert!(is_attacked(&board, A2, Color::White));
        assert!(is_attacked(&board, A4, Color::White));
        assert!(!is_attacked(&board, A5, Color::White));
        board.place(A4, Material::BP);
        assert!(!is_attacked(&board, A5, Color::White));
    }
    #[test]
    fn test_diagonal_ray_ignores_rooks() {
        let board = lone(A1, Material::BR);
        assert!(!is_attacked(&board, B2, Color::White));
        let board = lone(A1, Material::BB);
        assert!(!is_attacked(&board, A2, Color::White));
    }
    #[test]
    fn test_in_check() {
        let board = Board::empty()
            .set_contents(E1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK))
            .set_contents(E5, Some(Material::BR));
        assert!(in_check(&board, Color::White));
        assert!(!in_check(&board, Color::Black));
    }
}
