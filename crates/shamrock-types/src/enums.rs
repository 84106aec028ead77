//! Enumeration types shared across the Help Ireland crates.
//!
//! Wire names follow the JSON the web client already speaks: action kinds
//! are `SCREAMING_SNAKE_CASE`, everything else is lowercase.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// A rewardable real-world environmental action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Collecting litter from shared spaces.
    PickUpRubbish,
    /// Planting a native tree.
    PlantATree,
    /// Planting a pollinator-friendly garden.
    PlantAGarden,
    /// Sorting household waste into the correct channels.
    Recycle,
    /// Caring for domestic or wild animals.
    HelpAnimals,
    /// Volunteering time for or donating to a charity.
    DonateVolunteer,
    /// Cutting household water use.
    SaveWater,
}

impl ActionKind {
    /// Every action kind, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::PickUpRubbish,
        Self::PlantATree,
        Self::PlantAGarden,
        Self::Recycle,
        Self::HelpAnimals,
        Self::DonateVolunteer,
        Self::SaveWater,
    ];

    /// The wire name of this kind, as used in prompts and chat payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PickUpRubbish => "PICK_UP_RUBBISH",
            Self::PlantATree => "PLANT_A_TREE",
            Self::PlantAGarden => "PLANT_A_GARDEN",
            Self::Recycle => "RECYCLE",
            Self::HelpAnimals => "HELP_ANIMALS",
            Self::DonateVolunteer => "DONATE_VOLUNTEER",
            Self::SaveWater => "SAVE_WATER",
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// The category of a shop catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ShopItemType {
    /// A profile icon.
    Avatar,
    /// A visual profile theme.
    Theme,
    /// A display-only item mirroring an earned badge.
    Achievement,
}

// ---------------------------------------------------------------------------
// Community
// ---------------------------------------------------------------------------

/// The kind of chat room a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum RoomType {
    /// Everyone in the same neighborhood.
    Neighborhood,
    /// Everyone on the same street.
    Street,
    /// Members of a community group.
    Group,
    /// Captains and assistant captains only.
    Leadership,
}

impl RoomType {
    /// Lowercase wire name, used in storage keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neighborhood => "neighborhood",
            Self::Street => "street",
            Self::Group => "group",
            Self::Leadership => "leadership",
        }
    }
}

/// Geographic grouping used to restrict a leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum LeaderboardScope {
    /// Rank against everyone in the same county.
    County,
    /// Rank against everyone in the same neighborhood.
    #[default]
    Neighborhood,
}

/// A neighborhood leadership role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum LeaderRole {
    /// The neighborhood captain.
    Captain,
    /// The assistant captain.
    Assistant,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// How an action-completion claim is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum VerificationMethod {
    /// A photo judged by the external image service.
    Evidence,
    /// Confirmation by another member of the user's chat room.
    Witness,
}

// ---------------------------------------------------------------------------
// Mini-games
// ---------------------------------------------------------------------------

/// The mini-games on offer in the games corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MiniGame {
    /// Memory card matching of native species.
    SpeciesMatch,
    /// Multiple-choice questions about Irish wildlife.
    NatureTrivia,
    /// Multiple-choice questions about Irish landmarks.
    Landmarks,
    /// Match Irish words to their English meaning.
    GaeilgeMatch,
    /// Put each item in the right bin.
    WasteSorter,
    /// Unscramble the name of an animal.
    WordScramble,
    /// Build a habitat and score its biodiversity.
    Sanctuary,
}

impl MiniGame {
    /// Whether this game is played as a server-scored quiz round.
    pub const fn is_quiz(self) -> bool {
        matches!(
            self,
            Self::NatureTrivia
                | Self::Landmarks
                | Self::GaeilgeMatch
                | Self::WasteSorter
                | Self::WordScramble
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn action_kind_wire_names_match_display() {
        for kind in ActionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn default_scope_is_neighborhood() {
        assert_eq!(LeaderboardScope::default(), LeaderboardScope::Neighborhood);
    }

    #[test]
    fn sanctuary_and_species_match_are_not_quizzes() {
        assert!(!MiniGame::Sanctuary.is_quiz());
        assert!(!MiniGame::SpeciesMatch.is_quiz());
        assert!(MiniGame::GaeilgeMatch.is_quiz());
    }
}
