//! Mini-games in the games corner.
//!
//! Quiz games ([`QuizRound`]) draw a random round from a fixed pool and are
//! scored server-side. Species Match is a memory board ([`MemoryBoard`]).
//! The Wildlife Sanctuary is a 5x5 grid scored by biodiversity points.
//!
//! Every game pays a fixed completion reward regardless of how many answers
//! were right. Rewards credit shamrocks only; they never count as completed
//! actions.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Serialize;
use shamrock_types::{GameRoundId, MiniGame};

use crate::error::ProgressionError;

/// Shamrocks paid for finishing a round of `game`.
///
/// The sanctuary reward depends on the score, see [`sanctuary_reward`].
pub const fn completion_reward(game: MiniGame) -> u64 {
    match game {
        MiniGame::GaeilgeMatch => 15,
        MiniGame::SpeciesMatch
        | MiniGame::NatureTrivia
        | MiniGame::Landmarks
        | MiniGame::WasteSorter
        | MiniGame::WordScramble => 10,
        MiniGame::Sanctuary => 5,
    }
}

/// Questions drawn for one round of a quiz game.
pub const fn round_size(game: MiniGame) -> usize {
    match game {
        MiniGame::NatureTrivia | MiniGame::Landmarks => 3,
        MiniGame::GaeilgeMatch => 5,
        MiniGame::WasteSorter => 6,
        MiniGame::WordScramble => 4,
        MiniGame::SpeciesMatch | MiniGame::Sanctuary => 0,
    }
}

// ---------------------------------------------------------------------------
// Question pools
// ---------------------------------------------------------------------------

struct Trivia {
    prompt: &'static str,
    answer: &'static str,
    options: [&'static str; 4],
    fact: &'static str,
}

const NATURE_TRIVIA: [Trivia; 6] = [
    Trivia {
        prompt: "Which bird is often seen on the Cliffs of Moher and has a colorful beak?",
        answer: "Puffin",
        options: ["Puffin", "Seagull", "Gannet", "Robin"],
        fact: "Puffins spend most of their lives at sea but return to the Irish coast to breed in spring.",
    },
    Trivia {
        prompt: "What is Ireland's only native reptile?",
        answer: "Viviparous Lizard",
        options: ["Slow Worm", "Viviparous Lizard", "Grass Snake", "Adder"],
        fact: "The Viviparous Lizard is also known as the Common Lizard and is protected under Irish law.",
    },
    Trivia {
        prompt: "Which large mammal was reintroduced to Killarney National Park?",
        answer: "Red Deer",
        options: ["Fallow Deer", "Red Deer", "Roe Deer", "Muntjac Deer"],
        fact: "Red Deer are Ireland's largest land mammals and have been here since the last Ice Age.",
    },
    Trivia {
        prompt: "What is the national bird of Ireland?",
        answer: "Lapwing",
        options: ["Lapwing", "Robin", "Golden Eagle", "Wren"],
        fact: "The Northern Lapwing was declared the national bird by the Irish Wildlife Trust in 1990.",
    },
    Trivia {
        prompt: "Which sea creature is famous in Dingle Harbour?",
        answer: "Dolphin",
        options: ["Whale", "Seal", "Dolphin", "Shark"],
        fact: "Fungie the Dingle Dolphin was a world-famous resident of the harbour for over 30 years.",
    },
    Trivia {
        prompt: "Ireland's longest river is the...",
        answer: "Shannon",
        options: ["Liffey", "Lee", "Shannon", "Barrow"],
        fact: "The River Shannon is 360km long and flows through or between 11 counties.",
    },
];

const LANDMARKS: [Trivia; 6] = [
    Trivia {
        prompt: "In which county would you find the Giant's Causeway?",
        answer: "Antrim",
        options: ["Donegal", "Antrim", "Derry", "Down"],
        fact: "The Giant's Causeway consists of about 40,000 interlocking basalt columns.",
    },
    Trivia {
        prompt: "The Rock of Cashel is a historic site in which county?",
        answer: "Tipperary",
        options: ["Cork", "Tipperary", "Kilkenny", "Waterford"],
        fact: "It was the traditional seat of the kings of Munster.",
    },
    Trivia {
        prompt: "Which county is home to the Cliffs of Moher?",
        answer: "Clare",
        options: ["Galway", "Kerry", "Clare", "Mayo"],
        fact: "The cliffs rise to 214 metres at their highest point.",
    },
    Trivia {
        prompt: "Newgrange, the ancient passage tomb, is in which county?",
        answer: "Meath",
        options: ["Meath", "Louth", "Kildare", "Dublin"],
        fact: "Newgrange is older than Stonehenge and the Great Pyramids of Giza.",
    },
    Trivia {
        prompt: "The Blarney Stone is located in which county?",
        answer: "Cork",
        options: ["Cork", "Kerry", "Limerick", "Tipperary"],
        fact: "Legend says kissing the stone gives you 'the gift of the gab'.",
    },
    Trivia {
        prompt: "Mount Errigal, the highest peak in its county, is found where?",
        answer: "Donegal",
        options: ["Donegal", "Sligo", "Mayo", "Galway"],
        fact: "Errigal is known for the pinkish glow of its quartzite in the setting sun.",
    },
];

/// Irish word and its English meaning.
const GAEILGE: [(&str, &str); 10] = [
    ("Fáilte", "Welcome"),
    ("Sláinte", "Health / Cheers"),
    ("Madra", "Dog"),
    ("Cat", "Cat"),
    ("Uisce", "Water"),
    ("Bia", "Food"),
    ("Éire", "Ireland"),
    ("Glas", "Green"),
    ("Slán", "Goodbye"),
    ("Maith", "Good"),
];

const BINS: [&str; 3] = ["Compost", "Recycle", "Waste"];

/// Item name, icon, and the bin it belongs in.
const WASTE_ITEMS: [(&str, &str, &str); 10] = [
    ("Apple Core", "🍎", "Compost"),
    ("Plastic Bottle", "🍼", "Recycle"),
    ("Glass Jar", "🫙", "Recycle"),
    ("Crisp Packet", "🍿", "Waste"),
    ("Newspaper", "📰", "Recycle"),
    ("Banana Peel", "🍌", "Compost"),
    ("Broken Mirror", "🪞", "Waste"),
    ("Cardboard Box", "📦", "Recycle"),
    ("Pizza Box (Greasy)", "🍕", "Waste"),
    ("Tea Bag", "☕", "Compost"),
];

/// Word, scrambled form, and hint.
const SCRAMBLES: [(&str, &str, &str); 8] = [
    ("PUFFIN", "NIFPUF", "Sea bird with an orange beak"),
    ("BADGER", "REGDAB", "Striped nocturnal mammal"),
    ("SALMON", "NOMLAS", "Fish known for leaping upstream"),
    ("CURLEW", "WULREC", "Long-billed wading bird"),
    ("OTTER", "RETTO", "Playful river mammal"),
    ("SWAN", "WANS", "Large white water bird"),
    ("FOX", "XOF", "Clever orange canine"),
    ("SEAL", "ALES", "Sleek ocean mammal"),
];

/// Native species used for the memory board: icon and name.
const WILDLIFE: [(&str, &str); 12] = [
    ("🦊", "Red Fox"),
    ("🦌", "Red Deer"),
    ("🐿️", "Red Squirrel"),
    ("🦡", "European Badger"),
    ("🦭", "Grey Seal"),
    ("🦅", "Golden Eagle"),
    ("🦢", "Mute Swan"),
    ("🦦", "Eurasian Otter"),
    ("🦉", "Barn Owl"),
    ("🦇", "Lesser Horseshoe Bat"),
    ("🦔", "Hedgehog"),
    ("🐝", "Irish Bumblebee"),
];

/// Distinct species on one memory board.
pub const MEMORY_PAIRS: usize = 8;

// ---------------------------------------------------------------------------
// Quiz rounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct Question {
    prompt: String,
    icon: Option<String>,
    hint: Option<String>,
    options: Vec<String>,
    answer: String,
    fact: Option<String>,
}

/// The current question as shown to the player. Never carries the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    /// Which game this round belongs to.
    pub game: MiniGame,
    /// 0-based position in the round.
    pub index: usize,
    /// Number of questions in the round.
    pub total: usize,
    /// The question, word to translate, item to sort, or scrambled word.
    pub prompt: String,
    /// Item icon for the waste sorter.
    pub icon: Option<String>,
    /// Hint for the word scramble.
    pub hint: Option<String>,
    /// Choices. Empty for free-text answers.
    pub options: Vec<String>,
}

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    /// Whether the answer was right.
    pub correct: bool,
    /// The right answer.
    pub correct_answer: String,
    /// Fun fact shown after trivia questions.
    pub fact: Option<String>,
    /// Whether that was the last question.
    pub finished: bool,
    /// Correct answers so far.
    pub score: u32,
    /// Shamrocks earned, present only once the round is finished.
    pub reward: Option<u64>,
}

/// One round of a quiz game.
#[derive(Debug, Clone)]
pub struct QuizRound {
    id: GameRoundId,
    game: MiniGame,
    questions: Vec<Question>,
    position: usize,
    score: u32,
}

impl QuizRound {
    /// Draw a fresh round of `game`.
    pub fn start(game: MiniGame, rng: &mut impl Rng) -> Result<Self, ProgressionError> {
        if !game.is_quiz() {
            return Err(ProgressionError::NotAQuiz(game));
        }
        let size = round_size(game);
        let questions = match game {
            MiniGame::NatureTrivia => draw_trivia(&NATURE_TRIVIA, size, rng),
            MiniGame::Landmarks => draw_trivia(&LANDMARKS, size, rng),
            MiniGame::GaeilgeMatch => draw_gaeilge(size, rng),
            MiniGame::WasteSorter => draw_waste(size, rng),
            MiniGame::WordScramble => draw_scrambles(size, rng),
            MiniGame::SpeciesMatch | MiniGame::Sanctuary => Vec::new(),
        };
        Ok(Self {
            id: GameRoundId::new(),
            game,
            questions,
            position: 0,
            score: 0,
        })
    }

    /// Round id.
    pub const fn id(&self) -> GameRoundId {
        self.id
    }

    /// Which game this round belongs to.
    pub const fn game(&self) -> MiniGame {
        self.game
    }

    /// Whether every question has been answered.
    pub fn is_finished(&self) -> bool {
        self.position >= self.questions.len()
    }

    /// The question waiting for an answer, or `None` once finished.
    pub fn current_question(&self) -> Option<QuestionView> {
        let q = self.questions.get(self.position)?;
        Some(QuestionView {
            game: self.game,
            index: self.position,
            total: self.questions.len(),
            prompt: q.prompt.clone(),
            icon: q.icon.clone(),
            hint: q.hint.clone(),
            options: q.options.clone(),
        })
    }

    /// Answer the current question and advance.
    ///
    /// Answers are compared case-insensitively after trimming.
    pub fn answer(&mut self, response: &str) -> Result<AnswerFeedback, ProgressionError> {
        let q = self
            .questions
            .get(self.position)
            .ok_or(ProgressionError::RoundFinished)?;
        let correct = response.trim().to_lowercase() == q.answer.to_lowercase();
        let feedback_answer = q.answer.clone();
        let fact = q.fact.clone();

        if correct {
            self.score = self.score.saturating_add(1);
        }
        self.position = self.position.saturating_add(1);
        let finished = self.is_finished();
        Ok(AnswerFeedback {
            correct,
            correct_answer: feedback_answer,
            fact,
            finished,
            score: self.score,
            reward: finished.then(|| completion_reward(self.game)),
        })
    }
}

fn draw_trivia(pool: &[Trivia], size: usize, rng: &mut impl Rng) -> Vec<Question> {
    pool.choose_multiple(rng, size)
        .map(|t| {
            let mut options: Vec<String> = t.options.iter().map(|o| (*o).to_owned()).collect();
            options.shuffle(rng);
            Question {
                prompt: t.prompt.to_owned(),
                icon: None,
                hint: None,
                options,
                answer: t.answer.to_owned(),
                fact: Some(t.fact.to_owned()),
            }
        })
        .collect()
}

fn draw_gaeilge(size: usize, rng: &mut impl Rng) -> Vec<Question> {
    let words: Vec<(&str, &str)> = GAEILGE.choose_multiple(rng, size).copied().collect();
    // Every question offers the English of every word in the round.
    let mut meanings: Vec<String> = words.iter().map(|(_, en)| (*en).to_owned()).collect();
    meanings.shuffle(rng);
    words
        .into_iter()
        .map(|(ga, en)| Question {
            prompt: ga.to_owned(),
            icon: None,
            hint: None,
            options: meanings.clone(),
            answer: en.to_owned(),
            fact: Some(format!("\"{ga}\" means \"{en}\".")),
        })
        .collect()
}

fn draw_waste(size: usize, rng: &mut impl Rng) -> Vec<Question> {
    WASTE_ITEMS
        .choose_multiple(rng, size)
        .map(|(name, icon, bin)| Question {
            prompt: (*name).to_owned(),
            icon: Some((*icon).to_owned()),
            hint: None,
            options: BINS.iter().map(|b| (*b).to_owned()).collect(),
            answer: (*bin).to_owned(),
            fact: Some(format!("The {name} belongs in the {bin} bin.")),
        })
        .collect()
}

fn draw_scrambles(size: usize, rng: &mut impl Rng) -> Vec<Question> {
    SCRAMBLES
        .choose_multiple(rng, size)
        .map(|(word, scrambled, hint)| Question {
            prompt: (*scrambled).to_owned(),
            icon: None,
            hint: Some((*hint).to_owned()),
            options: Vec::new(),
            answer: (*word).to_owned(),
            fact: None,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Species Match
// ---------------------------------------------------------------------------

/// Result of flipping a memory card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FlipOutcome {
    /// First card of a pair turned over.
    Revealed {
        /// Species icon on the card.
        icon: String,
    },
    /// Second card matched the first.
    Matched {
        /// Species icon on both cards.
        icon: String,
        /// Whether every pair is now matched.
        finished: bool,
        /// Shamrocks earned, present only once the board is cleared.
        reward: Option<u64>,
    },
    /// Second card did not match; both turn back over.
    Mismatched {
        /// Icon on the first card.
        first: String,
        /// Icon on the second card.
        second: String,
    },
}

/// A shuffled memory board of native species pairs.
#[derive(Debug, Clone)]
pub struct MemoryBoard {
    id: GameRoundId,
    cards: Vec<String>,
    matched: Vec<bool>,
    face_up: Option<usize>,
}

impl MemoryBoard {
    /// Deal a new board of [`MEMORY_PAIRS`] random species.
    pub fn deal(rng: &mut impl Rng) -> Self {
        let mut cards: Vec<String> = WILDLIFE
            .choose_multiple(rng, MEMORY_PAIRS)
            .flat_map(|(icon, _)| [(*icon).to_owned(), (*icon).to_owned()])
            .collect();
        cards.shuffle(rng);
        let matched = vec![false; cards.len()];
        Self {
            id: GameRoundId::new(),
            cards,
            matched,
            face_up: None,
        }
    }

    /// Board id.
    pub const fn id(&self) -> GameRoundId {
        self.id
    }

    /// Number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the board has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether every pair has been matched.
    pub fn is_finished(&self) -> bool {
        self.matched.iter().all(|m| *m)
    }

    /// What the player can see: matched icons and the face-up card.
    pub fn visible(&self) -> Vec<Option<String>> {
        self.cards
            .iter()
            .zip(&self.matched)
            .enumerate()
            .map(|(i, (icon, matched))| (*matched || self.face_up == Some(i)).then(|| icon.clone()))
            .collect()
    }

    /// Turn over the card at `index`.
    pub fn flip(&mut self, index: usize) -> Result<FlipOutcome, ProgressionError> {
        if self.is_finished() {
            return Err(ProgressionError::RoundFinished);
        }
        let icon = self
            .cards
            .get(index)
            .cloned()
            .ok_or(ProgressionError::InvalidCard { index })?;
        if self.matched.get(index).copied().unwrap_or(true) || self.face_up == Some(index) {
            return Err(ProgressionError::InvalidCard { index });
        }

        let Some(first) = self.face_up.take() else {
            self.face_up = Some(index);
            return Ok(FlipOutcome::Revealed { icon });
        };
        let first_icon = self.cards.get(first).cloned().unwrap_or_default();
        if first_icon != icon {
            return Ok(FlipOutcome::Mismatched {
                first: first_icon,
                second: icon,
            });
        }

        for i in [first, index] {
            if let Some(slot) = self.matched.get_mut(i) {
                *slot = true;
            }
        }
        let finished = self.is_finished();
        Ok(FlipOutcome::Matched {
            icon,
            finished,
            reward: finished.then(|| completion_reward(MiniGame::SpeciesMatch)),
        })
    }
}

// ---------------------------------------------------------------------------
// Wildlife Sanctuary
// ---------------------------------------------------------------------------

/// Number of cells in the 5x5 sanctuary grid.
pub const SANCTUARY_CELLS: usize = 25;

/// Something that can be placed in the sanctuary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctuaryItem {
    /// Stable id used in submitted grids.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Display icon.
    pub icon: &'static str,
    /// Biodiversity points contributed per placement.
    pub bio_points: u64,
    /// Short description.
    pub description: &'static str,
}

/// Every placeable sanctuary item.
pub const SANCTUARY_ITEMS: [SanctuaryItem; 9] = [
    SanctuaryItem { id: "tree_oak", name: "Oak Tree", icon: "🌳", bio_points: 50, description: "Supports hundreds of species." },
    SanctuaryItem { id: "fox", name: "Red Fox", icon: "🦊", bio_points: 100, description: "Top predator for a balanced ecosystem." },
    SanctuaryItem { id: "pond", name: "Freshwater Pond", icon: "💧", bio_points: 80, description: "Vital for amphibians and insects." },
    SanctuaryItem { id: "flower", name: "Wildflowers", icon: "🌸", bio_points: 20, description: "Attracts bees and butterflies." },
    SanctuaryItem { id: "stone", name: "Ancient Stones", icon: "🪨", bio_points: 15, description: "Perfect shelter for lizards." },
    SanctuaryItem { id: "deer", name: "Red Deer", icon: "🦌", bio_points: 120, description: "Majestic forest wanderer." },
    SanctuaryItem { id: "butterfly", name: "Butterfly", icon: "🦋", bio_points: 25, description: "A sign of a healthy garden." },
    SanctuaryItem { id: "mushroom", name: "Fungi", icon: "🍄", bio_points: 10, description: "Breaks down organic matter." },
    SanctuaryItem { id: "clover", name: "Clover Patch", icon: "🍀", bio_points: 5, description: "Small but mighty for the soil." },
];

/// Biodiversity score of a submitted grid. `None` cells are empty.
pub fn sanctuary_score(grid: &[Option<String>]) -> Result<u64, ProgressionError> {
    if grid.len() > SANCTUARY_CELLS {
        return Err(ProgressionError::SanctuaryTooLarge {
            cells: grid.len(),
            max: SANCTUARY_CELLS,
        });
    }
    let mut score: u64 = 0;
    for id in grid.iter().flatten() {
        let item = SANCTUARY_ITEMS
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| ProgressionError::UnknownSanctuaryItem(id.clone()))?;
        score = score.saturating_add(item.bio_points);
    }
    if score == 0 {
        return Err(ProgressionError::EmptySanctuary);
    }
    Ok(score)
}

/// Shamrocks for a sanctuary score: one per 50 points plus a base of five.
pub const fn sanctuary_reward(score: u64) -> u64 {
    (score / 50).saturating_add(completion_reward(MiniGame::Sanctuary))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn quiz_rounds_have_fixed_sizes() {
        let mut rng = SmallRng::seed_from_u64(7);
        for (game, size) in [
            (MiniGame::NatureTrivia, 3),
            (MiniGame::Landmarks, 3),
            (MiniGame::GaeilgeMatch, 5),
            (MiniGame::WasteSorter, 6),
            (MiniGame::WordScramble, 4),
        ] {
            let round = QuizRound::start(game, &mut rng);
            assert!(round.is_ok());
            if let Ok(round) = round {
                assert_eq!(round.current_question().map(|q| q.total), Some(size));
            }
        }
    }

    #[test]
    fn non_quiz_games_are_rejected() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(matches!(
            QuizRound::start(MiniGame::Sanctuary, &mut rng),
            Err(ProgressionError::NotAQuiz(MiniGame::Sanctuary))
        ));
    }

    #[test]
    fn round_pays_completion_reward_regardless_of_score() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut round = QuizRound::start(MiniGame::GaeilgeMatch, &mut rng).unwrap();
        let mut last = None;
        while !round.is_finished() {
            last = round.answer("definitely wrong").ok();
        }
        let last = last.unwrap();
        assert!(last.finished);
        assert_eq!(last.score, 0);
        assert_eq!(last.reward, Some(15));
        assert!(matches!(round.answer("x"), Err(ProgressionError::RoundFinished)));
    }

    #[test]
    fn answers_are_case_insensitive_and_trimmed() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut round = QuizRound::start(MiniGame::WordScramble, &mut rng).unwrap();
        let answer = round
            .questions
            .first()
            .map(|q| q.answer.to_lowercase())
            .unwrap();
        let feedback = round.answer(&format!("  {answer} "));
        assert_eq!(feedback.map(|f| (f.correct, f.score)).ok(), Some((true, 1)));
    }

    #[test]
    fn question_view_offers_the_answer_among_options() {
        let mut rng = SmallRng::seed_from_u64(11);
        let round = QuizRound::start(MiniGame::WasteSorter, &mut rng).unwrap();
        let view = round.current_question().unwrap();
        let answer = &round.questions.first().unwrap().answer;
        assert!(view.options.contains(answer));
        assert_eq!(view.options.len(), 3);
    }

    #[test]
    fn memory_board_clears_with_reward() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut board = MemoryBoard::deal(&mut rng);
        assert_eq!(board.len(), MEMORY_PAIRS * 2);

        let mut last = None;
        while !board.is_finished() {
            let Some(first) = (0..board.len()).find(|i| board.matched.get(*i) == Some(&false)) else {
                break;
            };
            let icon = board.cards.get(first).cloned();
            let second = (0..board.len())
                .find(|i| *i != first && board.cards.get(*i).cloned() == icon);
            let Some(second) = second else { break };
            assert!(matches!(board.flip(first), Ok(FlipOutcome::Revealed { .. })));
            last = board.flip(second).ok();
        }
        assert!(matches!(
            last,
            Some(FlipOutcome::Matched { finished: true, reward: Some(10), .. })
        ));
        assert!(board.visible().iter().all(Option::is_some));
    }

    #[test]
    fn memory_mismatch_turns_cards_back() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut board = MemoryBoard::deal(&mut rng);
        let first_icon = board.cards.first().cloned();
        let other = (1..board.len())
            .find(|i| board.cards.get(*i).cloned() != first_icon)
            .unwrap();
        assert!(board.flip(0).is_ok());
        assert!(matches!(board.flip(0), Err(ProgressionError::InvalidCard { index: 0 })));
        assert!(matches!(board.flip(other), Ok(FlipOutcome::Mismatched { .. })));
        assert!(board.visible().iter().all(Option::is_none));
        assert!(matches!(
            board.flip(board.len()),
            Err(ProgressionError::InvalidCard { .. })
        ));
    }

    #[test]
    fn sanctuary_scoring() {
        let grid = vec![
            Some(String::from("deer")),
            None,
            Some(String::from("fox")),
            Some(String::from("clover")),
        ];
        assert_eq!(sanctuary_score(&grid).ok(), Some(225));
        assert_eq!(sanctuary_reward(225), 9);
        assert_eq!(sanctuary_reward(49), 5);
    }

    #[test]
    fn empty_or_invalid_sanctuary_is_rejected() {
        assert!(matches!(
            sanctuary_score(&[None, None]),
            Err(ProgressionError::EmptySanctuary)
        ));
        assert!(matches!(
            sanctuary_score(&[Some(String::from("dragon"))]),
            Err(ProgressionError::UnknownSanctuaryItem(_))
        ));
        let oversized = vec![Some(String::from("clover")); SANCTUARY_CELLS + 1];
        assert!(matches!(
            sanctuary_score(&oversized),
            Err(ProgressionError::SanctuaryTooLarge { .. })
        ));
    }
}
