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

//! Chess board and move rules for a two-player game on one device
//!
//! The board half of the crate knows the rules of standard chess and
//! nothing about who is tapping the screen. The following features are
//! supported:
//!
//! [x] Movement for all six piece types
//! [x] Castling on both wings with the full set of conditions
//! [x] En passant, valid only on the ply right after the double step
//! [x] Pawn promotion with an explicit choice of piece
//! [x] Rejection of any move that leaves the mover's king in check
//! [x] Checkmate and stalemate detection
//! [ ] Repetition, fifty-move rule and insufficient material
//! [ ] Chess960 starting positions
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square
//!   on an 8-by-8 board. Row 0 is Black's back rank (`Rank8`) and
//!   column 0 is the a-file, so `A8` has index 0 and `H1` index 63.
//!   Each square is named using the letter of the file followed by
//!   the number of the rank (e.g. `A1` .. `H8`).
//!
//! * A `Mask` is a 64-bit (u64) value in which each bit maps to a
//!   square on the board. Masks are used for line lookups and for
//!   reporting the legal destinations of a piece. They can be combined
//!   using bitwise `|`, `|=` and `&` operators.
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants and `Color` is either `White` or `Black`. The
//!   `Promotion` type has only the four variants a pawn may become,
//!   so promoting to a king or a pawn cannot be expressed.
//!
//! * A `Board` is a plain 8x8 grid of optional material. It is `Copy`,
//!   so trying a move never touches the board it was tried on.
//!
//! * A `Position` holds the board plus the state that carries between
//!   moves: whose turn it is, the last double pawn step, castling rights,
//!   a pending promotion and the game phase. Positions are replaced,
//!   never mutated, through `with_move`, `with_promotion` and `with_phase`.
//!
//! * `try_move` applies the movement rules and yields a `Transition`
//!   holding the resulting board. `validate` adds the self-check rule
//!   and `terminal_state` decides whether the side to move is mated,
//!   stalemated or still playing.
//!

mod attacks;
mod castling;
mod grid;
mod legality;
mod material;
mod moves;
mod position;
mod square;
mod terminal;

pub use attacks::*;
pub use castling::*;
pub use grid::*;
pub use legality::*;
pub use material::*;
pub use moves::*;
pub use position::*;
pub use square::*;
pub use terminal::*;

pub trait Turn {
    fn turn(&self) -> Color;
}
