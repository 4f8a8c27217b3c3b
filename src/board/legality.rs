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

use log::trace;
use strum::IntoEnumIterator;

use super::attacks::in_check;
use super::moves::{try_move, Transition};
use super::position::Position;
use super::square::{Mask, Square};
use super::Turn;

/// A move by the side to move that is geometrically legal and does not
/// leave (or put) that side's king in check.
///
/// The move is played on the transition's own copy of the board and the
/// king is looked up there, so moving the king itself is covered too.
pub fn validate(position: &Position, from: Square, to: Square) -> Option<Transition> {
    let material = position.contents(from)?;
    if material.color() != position.turn() {
        return None;
    }
    let mv = try_move(position.board(), from, to, &position.context())?;
    if in_check(mv.board(), material.color()) {
        trace!("{from}{to} rejected: leaves the {} king in check", material.color());
        return None;
    }
    Some(mv)
}

/// Every square the piece on `from` may legally move to.
pub fn legal_destinations(position: &Position, from: Square) -> Mask {
    Mask::from_squares(Square::iter().filter(|&to| validate(position, from, to).is_some()))
}
