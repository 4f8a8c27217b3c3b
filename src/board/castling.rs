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

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use super::material::{Color, Pair};
use super::position::between;
use super::square::{File, Mask, Rank, Square};

use File::*;

/// The two rooks a side can castle with, named after the wing they start on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RookFile {
    KingSide,
    QueenSide,
}

impl RookFile {
    /// The castling wing a two-square king step towards `to` belongs to.
    pub fn towards(from: Square, to: Square) -> Option<Self> {
        match to.col() as isize - from.col() as isize {
            2 => Some(RookFile::KingSide),
            -2 => Some(RookFile::QueenSide),
            _ => None,
        }
    }
    #[inline]
    pub const fn rook_file(&self) -> File {
        match self {
            RookFile::KingSide => FileH,
            RookFile::QueenSide => FileA,
        }
    }
    #[inline]
    pub const fn king_dest_file(&self) -> File {
        match self {
            RookFile::KingSide => FileG,
            RookFile::QueenSide => FileC,
        }
    }
    #[inline]
    pub const fn rook_dest_file(&self) -> File {
        match self {
            RookFile::KingSide => FileF,
            RookFile::QueenSide => FileD,
        }
    }
}

/// What one side still needs to know to castle: whether its king has
/// moved and whether each original rook has left (or lost) its square.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    color: Color,
    king_moved: bool,
    king_side_rook_moved: bool,
    queen_side_rook_moved: bool,
}

impl CastlingRights {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            king_moved: false,
            king_side_rook_moved: false,
            queen_side_rook_moved: false,
        }
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
    #[inline]
    pub fn rank(&self) -> Rank {
        Rank::back_rank(self.color)
    }
    #[inline]
    pub fn king_moved(&self) -> bool {
        self.king_moved
    }
    #[inline]
    pub fn rook_moved(&self, side: RookFile) -> bool {
        match side {
            RookFile::KingSide => self.king_side_rook_moved,
            RookFile::QueenSide => self.queen_side_rook_moved,
        }
    }
    /// Neither the king nor the rook on `side` has moved.
    #[inline]
    pub fn may_castle(&self, side: RookFile) -> bool {
        !self.king_moved && !self.rook_moved(side)
    }

    #[inline]
    pub fn king_src(&self) -> Square {
        Square::new(FileE, self.rank())
    }
    #[inline]
    pub fn rook_src(&self, side: RookFile) -> Square {
        Square::new(side.rook_file(), self.rank())
    }
    #[inline]
    pub fn king_dest(&self, side: RookFile) -> Square {
        Square::new(side.king_dest_file(), self.rank())
    }
    #[inline]
    pub fn rook_dest(&self, side: RookFile) -> Square {
        Square::new(side.rook_dest_file(), self.rank())
    }
    /// Squares that must be empty: strictly between king and rook.
    pub fn blocking_lane(&self, side: RookFile) -> Mask {
        between(self.king_src(), self.rook_src(side))
    }
    /// Squares the king passes through, destination included.
    pub fn attacking_lane(&self, side: RookFile) -> Mask {
        let king_dest = self.king_dest(side);
        between(self.king_src(), king_dest) | king_dest
    }

    pub fn set_king_moved(&mut self) {
        self.king_moved = true;
    }
    pub fn set_rook_moved(&mut self, side: RookFile) {
        match side {
            RookFile::KingSide => self.king_side_rook_moved = true,
            RookFile::QueenSide => self.queen_side_rook_moved = true,
        }
    }
    /// Records that `square` was vacated or landed on. Either way the
    /// original rook can no longer castle from there.
    pub fn update(&mut self, square: Square) {
        if square == self.rook_src(RookFile::KingSide) {
            self.king_side_rook_moved = true;
        }
        if square == self.rook_src(RookFile::QueenSide) {
            self.queen_side_rook_moved = true;
        }
    }
}

impl Default for Pair<CastlingRights> {
    fn default() -> Self {
        Pair::new(
            CastlingRights::new(Color::White),
            CastlingRights::new(Color::Black),
        )
    }
}
