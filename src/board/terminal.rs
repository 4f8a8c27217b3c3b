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

use strum::IntoEnumIterator;

use super::attacks::in_check;
use super::legality::validate;
use super::position::{GamePhase, Position};
use super::square::Square;
use super::Turn;

/// Is the king of the side to move attacked?
pub fn is_check(position: &Position) -> bool {
    in_check(position.board(), position.turn())
}

/// Does the side to move have at least one legal move? Stops at the first.
pub fn can_move(position: &Position) -> bool {
    let board = position.board();
    board
        .pieces(position.turn())
        .any(|(from, _)| Square::iter().any(|to| validate(position, from, to).is_some()))
}

/// Checkmate or stalemate when the side to move has no legal move,
/// otherwise `InProgress`.
pub fn terminal_state(position: &Position) -> GamePhase {
    if can_move(position) {
        GamePhase::InProgress
    } else if is_check(position) {
        GamePhase::Checkmate
    } else {
        GamePhase::Stalemate
    }
}
