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

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::action::{Action, Rejection};
use super::{GameId, GameResult};
use crate::{
    is_check, legal_destinations, terminal_state, validate, Board, Color, GamePhase, Mask, Piece,
    Position, Promotion, Square, Turn,
};

/// A single game played by two people on one device.
///
/// The session turns taps on squares into selections and moves, and holds
/// the only authoritative `Position`. Every action is evaluated against the
/// current state and either replaces it wholesale or is refused with a
/// `Rejection`, leaving the game exactly as it was.
///
/// A pawn reaching the far rank leaves the game waiting for `promote`
/// with the turn unchanged. After every completed move the game either
/// continues or ends in checkmate or stalemate, and a finished game
/// refuses everything.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    position: Position,
    selected: Option<Square>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameId::default())
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new(id: GameId) -> Self {
        Self::from_position(id, Position::new())
    }

    /// A game continuing from `position`. The phase is recomputed unless a
    /// promotion is still pending.
    pub fn from_position(id: GameId, position: Position) -> Self {
        let position = if position.pending_promotion() || position.phase().is_terminal() {
            position
        } else {
            let phase = terminal_state(&position);
            position.with_phase(phase)
        };
        Self {
            id,
            position,
            selected: None,
        }
    }

    /// Rebuild a game by applying `actions` in order. Fails on the first
    /// action the game refuses.
    pub fn replay(id: GameId, actions: &[Action]) -> Result<Self> {
        let mut game = Self::new(id);
        for (i, action) in actions.iter().enumerate() {
            game.commit(*action)
                .with_context(|| format!("replay of game {id} failed at action {i} ({action})"))?;
        }
        Ok(game)
    }

    /// Handle a tap on the square at `row`, `col` (row 0 is Black's back
    /// rank, column 0 the a-file).
    ///
    /// A tap on a piece of the side to move selects it, replacing any
    /// earlier selection. Any other tap is a move of the selected piece.
    /// A refused move keeps the selection.
    pub fn select_or_move(&mut self, row: usize, col: usize) -> Result<()> {
        let square = Square::from_coords(row, col).ok_or(Rejection::OffBoard(row, col))?;
        self.ensure_open()?;
        let action = match (self.selected, self.position.contents(square)) {
            (_, Some(material)) if material.color() == self.turn() => Action::Select(square),
            (Some(from), _) => Action::Move { from, to: square },
            (None, Some(_)) => return Err(Rejection::NotYourPiece(square).into()),
            (None, None) => return Err(Rejection::NothingSelected.into()),
        };
        self.commit(action)
    }

    /// Replace the pawn waiting on the far rank.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if no pawn is waiting and the game is not over.
    /// Release builds refuse the call with `Rejection::NoPromotionPending`.
    pub fn promote(&mut self, promotion: Promotion) -> Result<()> {
        debug_assert!(
            self.pending_promotion() || self.phase().is_terminal(),
            "promote called with no pawn waiting"
        );
        self.commit(Action::Promote(promotion))
    }

    /// Like `promote`, for callers holding a `Piece`. Kings and pawns are
    /// refused.
    pub fn promote_to(&mut self, piece: Piece) -> Result<()> {
        let promotion = Promotion::try_from(piece)?;
        self.promote(promotion)
    }

    /// The game after `action`, or the reason it is refused.
    pub fn apply(&self, action: Action) -> Result<Self, Rejection> {
        match action {
            Action::Select(square) => {
                self.ensure_open()?;
                self.ensure_ours(square)?;
                Ok(Self {
                    selected: Some(square),
                    ..self.clone()
                })
            }
            Action::Move { from, to } => {
                self.ensure_open()?;
                self.ensure_ours(from)?;
                let mv = validate(&self.position, from, to).ok_or(Rejection::IllegalMove(from, to))?;
                let mut position = self.position.with_move(&mv);
                if !position.pending_promotion() {
                    let phase = terminal_state(&position);
                    position = position.with_phase(phase);
                }
                Ok(self.advance(position))
            }
            Action::Promote(promotion) => {
                if self.position.phase().is_terminal() {
                    return Err(Rejection::GameOver);
                }
                if !self.position.pending_promotion() {
                    return Err(Rejection::NoPromotionPending);
                }
                let position = self.position.with_promotion(promotion);
                let phase = terminal_state(&position);
                Ok(self.advance(position.with_phase(phase)))
            }
        }
    }

    fn advance(&self, position: Position) -> Self {
        Self {
            id: self.id,
            position,
            selected: None,
        }
    }

    fn commit(&mut self, action: Action) -> Result<()> {
        match self.apply(action) {
            Ok(next) => {
                debug!("game {}: {action}", self.id);
                if next.phase() != self.phase() {
                    debug!("game {}: {:?} with {} to move", self.id, next.phase(), next.turn());
                }
                *self = next;
                Ok(())
            }
            Err(rejection) => {
                match rejection {
                    Rejection::NoPromotionPending => warn!("game {}: {action} refused: {rejection}", self.id),
                    _ => debug!("game {}: {action} refused: {rejection}", self.id),
                }
                Err(rejection.into())
            }
        }
    }

    fn ensure_open(&self) -> Result<(), Rejection> {
        if self.position.phase().is_terminal() {
            return Err(Rejection::GameOver);
        }
        match self.position.promotion_square() {
            Some(square) => Err(Rejection::PromotionPending(square)),
            None => Ok(()),
        }
    }

    fn ensure_ours(&self, square: Square) -> Result<(), Rejection> {
        match self.position.contents(square) {
            Some(material) if material.color() == self.turn() => Ok(()),
            _ => Err(Rejection::NotYourPiece(square)),
        }
    }

    #[inline]
    pub fn id(&self) -> GameId {
        self.id
    }
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }
    #[inline]
    pub fn board(&self) -> &Board {
        self.position.board()
    }
    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }
    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.position.phase()
    }
    #[inline]
    pub fn pending_promotion(&self) -> bool {
        self.position.pending_promotion()
    }
    #[inline]
    pub fn promotion_square(&self) -> Option<Square> {
        self.position.promotion_square()
    }
    pub fn is_check(&self) -> bool {
        is_check(&self.position)
    }
    pub fn result(&self) -> Option<GameResult> {
        GameResult::from_phase(self.phase(), self.turn())
    }

    /// Where the selected piece may go. Empty when nothing is selected or
    /// the game is not accepting moves.
    pub fn legal_destinations(&self) -> Mask {
        match self.selected {
            Some(from) if self.ensure_open().is_ok() => legal_destinations(&self.position, from),
            _ => Mask::empty(),
        }
    }
}

impl Turn for Game {
    #[inline]
    fn turn(&self) -> Color {
        self.position.turn()
    }
}

impl AsRef<Position> for Game {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}
