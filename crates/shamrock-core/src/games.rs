//! Rounds in progress in the games corner.
//!
//! Quiz and memory rounds are kept server-side so that scoring cannot be
//! forged by the client. A round is dropped once finished, or once it has
//! been open for [`ROUND_TTL`] without finishing.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shamrock_progression::{AnswerFeedback, FlipOutcome, MemoryBoard, QuestionView, QuizRound};
use shamrock_types::{GameRoundId, MiniGame};

use tracing::debug;

use crate::error::CoreError;

/// What a client needs to render a fresh round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RoundStart {
    /// A quiz round; shows its first question.
    Quiz {
        /// Round id.
        id: GameRoundId,
        /// First question.
        question: Option<QuestionView>,
    },
    /// A face-down memory board.
    Memory {
        /// Round id.
        id: GameRoundId,
        /// Number of cards.
        cards: usize,
    },
}

/// How long an unfinished round is kept.
pub const ROUND_TTL: Duration = Duration::hours(1);

enum Round {
    Quiz(QuizRound),
    Memory(MemoryBoard),
}

struct OpenRound {
    round: Round,
    started_at: DateTime<Utc>,
}

/// Open rounds keyed by id.
#[derive(Default)]
pub struct GameRegistry {
    rounds: HashMap<GameRoundId, OpenRound>,
}

impl GameRegistry {
    /// Start a round of `game`, dropping rounds abandoned before `now`
    /// minus [`ROUND_TTL`]. The sanctuary has no round; it is scored in one
    /// submission.
    pub fn start(&mut self, game: MiniGame, now: DateTime<Utc>) -> Result<RoundStart, CoreError> {
        self.sweep(now);
        let mut rng = rand::rng();
        let (id, round, start) = if game == MiniGame::SpeciesMatch {
            let board = MemoryBoard::deal(&mut rng);
            let start = RoundStart::Memory {
                id: board.id(),
                cards: board.len(),
            };
            (board.id(), Round::Memory(board), start)
        } else {
            let quiz = QuizRound::start(game, &mut rng)?;
            let start = RoundStart::Quiz {
                id: quiz.id(),
                question: quiz.current_question(),
            };
            (quiz.id(), Round::Quiz(quiz), start)
        };
        self.rounds.insert(id, OpenRound { round, started_at: now });
        Ok(start)
    }

    fn sweep(&mut self, now: DateTime<Utc>) {
        let before = self.rounds.len();
        self.rounds.retain(|_, open| now.signed_duration_since(open.started_at) < ROUND_TTL);
        let dropped = before.saturating_sub(self.rounds.len());
        if dropped > 0 {
            debug!(dropped, open = self.rounds.len(), "Dropped abandoned game rounds");
        }
    }

    /// Answer the current question of quiz round `id`.
    ///
    /// Returns the feedback and the next question, if any. The feedback
    /// carries the reward once the round is finished.
    pub fn answer(
        &mut self,
        id: GameRoundId,
        response: &str,
    ) -> Result<(AnswerFeedback, Option<QuestionView>), CoreError> {
        let round = match self.rounds.get_mut(&id).map(|open| &mut open.round) {
            Some(Round::Quiz(round)) => round,
            Some(Round::Memory(_)) => {
                return Err(CoreError::WrongGameKind { id, expected: "quiz" });
            }
            None => return Err(CoreError::GameNotFound(id)),
        };
        let feedback = round.answer(response)?;
        let next = round.current_question();
        if feedback.finished {
            self.rounds.remove(&id);
        }
        Ok((feedback, next))
    }

    /// Flip card `index` on memory round `id`.
    pub fn flip(&mut self, id: GameRoundId, index: usize) -> Result<FlipOutcome, CoreError> {
        let board = match self.rounds.get_mut(&id).map(|open| &mut open.round) {
            Some(Round::Memory(board)) => board,
            Some(Round::Quiz(_)) => {
                return Err(CoreError::WrongGameKind { id, expected: "memory" });
            }
            None => return Err(CoreError::GameNotFound(id)),
        };
        let outcome = board.flip(index)?;
        if board.is_finished() {
            self.rounds.remove(&id);
        }
        Ok(outcome)
    }

    /// Face-up view of memory round `id`.
    pub fn board(&self, id: GameRoundId) -> Result<Vec<Option<String>>, CoreError> {
        match self.rounds.get(&id).map(|open| &open.round) {
            Some(Round::Memory(board)) => Ok(board.visible()),
            Some(Round::Quiz(_)) => Err(CoreError::WrongGameKind { id, expected: "memory" }),
            None => Err(CoreError::GameNotFound(id)),
        }
    }

    /// Number of rounds in progress.
    pub fn open_rounds(&self) -> usize {
        self.rounds.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quiz(start: RoundStart) -> Option<(GameRoundId, Option<QuestionView>)> {
        match start {
            RoundStart::Quiz { id, question } => Some((id, question)),
            RoundStart::Memory { .. } => None,
        }
    }

    fn memory(start: RoundStart) -> Option<(GameRoundId, usize)> {
        match start {
            RoundStart::Memory { id, cards } => Some((id, cards)),
            RoundStart::Quiz { .. } => None,
        }
    }

    #[test]
    fn quiz_round_is_dropped_when_finished() {
        let mut games = GameRegistry::default();
        let (id, question) = quiz(games.start(MiniGame::NatureTrivia, Utc::now()).unwrap()).unwrap();
        assert_eq!(question.unwrap().total, 3);

        let mut last = None;
        for _ in 0..3 {
            let (feedback, _) = games.answer(id, "no idea").unwrap();
            last = Some(feedback);
        }
        let last = last.unwrap();
        assert!(last.finished);
        assert_eq!(last.reward, Some(10));
        assert_eq!(games.open_rounds(), 0);
        assert!(matches!(games.answer(id, "x"), Err(CoreError::GameNotFound(_))));
    }

    #[test]
    fn species_match_deals_a_board() {
        let mut games = GameRegistry::default();
        let (id, cards) = memory(games.start(MiniGame::SpeciesMatch, Utc::now()).unwrap()).unwrap();
        assert_eq!(cards, 16);
        assert!(games.board(id).unwrap().iter().all(Option::is_none));
        assert!(matches!(games.answer(id, "fox"), Err(CoreError::WrongGameKind { .. })));
    }

    #[test]
    fn sanctuary_has_no_round() {
        let mut games = GameRegistry::default();
        assert!(games.start(MiniGame::Sanctuary, Utc::now()).is_err());
        assert_eq!(games.open_rounds(), 0);
    }

    #[test]
    fn abandoned_rounds_are_dropped_on_the_next_start() {
        let mut games = GameRegistry::default();
        let morning = Utc::now();
        let (stale, _) = quiz(games.start(MiniGame::NatureTrivia, morning).unwrap()).unwrap();
        let (fresh, _) = memory(games.start(MiniGame::SpeciesMatch, morning + Duration::minutes(50)).unwrap()).unwrap();
        assert_eq!(games.open_rounds(), 2);

        games
            .start(MiniGame::NatureTrivia, morning + ROUND_TTL + Duration::seconds(1))
            .unwrap();
        assert_eq!(games.open_rounds(), 2);
        assert!(matches!(games.answer(stale, "x"), Err(CoreError::GameNotFound(_))));
        assert!(games.board(fresh).is_ok());
    }
}
