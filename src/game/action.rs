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
use std::fmt;
use thiserror::Error;

use crate::{Promotion, Square};

/// One input to a game session.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Select(Square),
    Move { from: Square, to: Square },
    Promote(Promotion),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Select(square) => write!(f, "select {square}"),
            Action::Move { from, to } => write!(f, "{from}{to}"),
            Action::Promote(promotion) => write!(f, "promote to {promotion}"),
        }
    }
}

/// Why a session refused an action. A refused action never changes the
/// session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("The game is over")]
    GameOver,
    #[error("A pawn on {0} is waiting to be promoted")]
    PromotionPending(Square),
    #[error("No pawn is waiting to be promoted")]
    NoPromotionPending,
    #[error("No piece is selected")]
    NothingSelected,
    #[error("{0} does not hold a piece of the side to move")]
    NotYourPiece(Square),
    #[error("Not a legal move: {0}{1}")]
    IllegalMove(Square, Square),
    #[error("Row {0}, column {1} is off the board")]
    OffBoard(usize, usize),
}
