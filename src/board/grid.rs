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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use super::material::{Color, Material, Piece};
use super::square::{File, Mask, Rank, Square};

use Piece::*;

/// The contents of the 64 squares, stored row by row from Black's back rank.
///
/// `Board` is `Copy`: every trial move works on its own copy and can never
/// leak into the board it was copied from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([[Option<Material>; 8]; 8]);

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self([[None; 8]; 8])
    }

    /// The standard starting arrangement.
    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut board = Self::empty();
        for color in Color::iter() {
            for (file, piece) in File::iter().zip(BACK_RANK) {
                board.place(Square::new(file, Rank::back_rank(color)), Material::new(color, piece));
                board.place(Square::new(file, Rank::pawn_rank(color)), Material::new(color, Pawn));
            }
        }
        board
    }

    #[inline]
    pub fn contents(&self, square: Square) -> Option<Material> {
        self.0[square.row()][square.col()]
    }
    #[inline]
    pub fn is_occupied(&self, square: Square) -> bool {
        self.contents(square).is_some()
    }

    /// Puts `material` on `square`, returning whatever was there.
    pub fn place(&mut self, square: Square, material: Material) -> Option<Material> {
        self.0[square.row()][square.col()].replace(material)
    }
    pub fn remove(&mut self, square: Square) -> Option<Material> {
        self.0[square.row()][square.col()].take()
    }

    pub fn occupied(&self) -> Mask {
        Mask::from_squares(Square::iter().filter(|&square| self.is_occupied(square)))
    }
    pub fn occupied_by(&self, color: Color) -> Mask {
        Mask::from_squares(self.pieces(color).map(|(square, _)| square))
    }

    /// Every square holding a piece of `color`, with the piece.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Material)> + '_ {
        Square::iter().filter_map(move |square| match self.contents(square) {
            Some(material) if material.color() == color => Some((square, material)),
            _ => None,
        })
    }

    /// The square of `color`'s king. A board is expected to hold exactly
    /// one king per side.
    pub fn king(&self, color: Color) -> Option<Square> {
        let king = Material::new(color, King);
        let mut kings = Square::iter().filter(|&square| self.contents(square) == Some(king));
        let square = kings.next();
        debug_assert!(square.is_some(), "no {color} king on the board");
        debug_assert!(kings.next().is_none(), "more than one {color} king on the board");
        square
    }
}

impl Index<Square> for Board {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.row()][index.col()]
    }
}

impl IndexMut<Square> for Board {
    #[inline]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.row()][index.col()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.iter() {
            for cell in row.iter() {
                match cell {
                    Some(material) => write!(f, "{}", material.glyph())?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl Board {
    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self[square] = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Square::*;

    #[test]
    fn test_standard_arrangement() {
        let board = Board::standard();
        assert_eq!(board.contents(E1), Some(Material::WK));
        assert_eq!(board.contents(D8), Some(Material::BQ));
        assert_eq!(board.contents(A2), Some(Material::WP));
        assert_eq!(board.contents(H7), Some(Material::BP));
        assert_eq!(board.contents(E4), None);
        assert_eq!(board.occupied().len(), 32);
        assert_eq!(board.occupied_by(Color::White).len(), 16);
        assert_eq!(board.king(Color::Black), Some(E8));
    }
    #[test]
    fn test_copies_are_independent() {
        let board = Board::standard();
        let mut scratch = board;
        let pawn = scratch.remove(E2);
        scratch.place(E4, pawn.unwrap());
        assert_eq!(board.contents(E2), Some(Material::WP));
        assert_eq!(board.contents(E4), None);
        assert_eq!(scratch.contents(E4), Some(Material::WP));
    }
    #[test]
    fn test_display_glyph_grid() {
        let board = Board::empty()
            .set_contents(A8, Some(Material::BK))
            .set_contents(H1, Some(Material::WK));
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "♚.......");
        assert_eq!(lines[7], ".......♔");
    }
    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_missing_king_is_loud() {
        let board = Board::empty().set_contents(E1, Some(Material::WK));
        let _ = board.king(Color::Black);
    }
    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_second_king_is_loud() {
        let board = Board::empty()
            .set_contents(E1, Some(Material::WK))
            .set_contents(D1, Some(Material::WK))
            .set_contents(E8, Some(Material::BK));
        let _ = board.king(Color::White);
    }
}
