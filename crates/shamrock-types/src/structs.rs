//! Core entity structs for the Help Ireland service.
//!
//! Covers the user profile, peer reference data, the static catalog
//! definitions, leaderboard projections, chat messages and judgment
//! verdicts. Field names serialize in camelCase to match the stored
//! profile JSON.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionKind, RoomType, ShopItemType};
use crate::ids::{MessageId, ProfileId, WitnessRequestId};

/// Icon every new profile starts with and can always fall back to.
pub const DEFAULT_AVATAR: &str = "👤";

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// The local user's profile: identity, counters, and derived progression.
///
/// Every field has a default so that a stored profile written by an older
/// release deserializes cleanly with the newer fields backfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UserProfile {
    /// Stable opaque identifier.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// County of residence.
    pub county: String,
    /// Neighborhood the user registered in.
    pub neighborhood: String,
    /// Street within the neighborhood.
    pub street: String,
    /// Community groups the user is affiliated with.
    pub community_groups: BTreeSet<String>,
    /// Free-text biography.
    pub bio: String,
    /// Currently displayed icon. Must be one of `unlocked_avatars`.
    pub avatar: String,
    /// Currently active theme id, if any. Must be one of `unlocked_themes`.
    pub active_theme: Option<String>,
    /// Primary currency balance.
    pub total_shamrocks: u64,
    /// Team-mission currency balance.
    pub golden_shamrocks: u64,
    /// Holds every cosmetic and badge in the current catalogs.
    pub is_master: bool,
    /// Neighborhood captain.
    pub is_captain: bool,
    /// Neighborhood assistant captain.
    pub is_assistant_captain: bool,
    /// When the current team goal was issued.
    pub weekly_goal_set_at: Option<DateTime<Utc>>,
    /// Text of the current team goal.
    pub active_goal: Option<String>,
    /// The captain has ticked the current goal.
    pub has_captain_ticked_goal: bool,
    /// The assistant captain has ticked the current goal.
    pub has_assistant_ticked_goal: bool,
    /// Number of verified action completions.
    pub completed_actions: u64,
    /// Distinct action kinds completed at least once.
    pub completed_action_types: BTreeSet<ActionKind>,
    /// When the profile was created. Never changes afterwards.
    pub joined_date: DateTime<Utc>,
    /// Earned badge ids. Only ever grows.
    pub badges: BTreeSet<String>,
    /// Avatar icons the user may select. Only ever grows.
    pub unlocked_avatars: BTreeSet<String>,
    /// Theme ids the user may select. Only ever grows.
    pub unlocked_themes: BTreeSet<String>,
    /// 1-based leaderboard position, `None` when unranked.
    pub rank: Option<u32>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl UserProfile {
    /// Create a fresh profile that joined at `joined_date`.
    pub fn new(joined_date: DateTime<Utc>) -> Self {
        Self {
            id: ProfileId::new(),
            name: String::new(),
            county: String::new(),
            neighborhood: String::new(),
            street: String::new(),
            community_groups: BTreeSet::new(),
            bio: String::new(),
            avatar: String::from(DEFAULT_AVATAR),
            active_theme: None,
            total_shamrocks: 0,
            golden_shamrocks: 0,
            is_master: false,
            is_captain: false,
            is_assistant_captain: false,
            weekly_goal_set_at: None,
            active_goal: None,
            has_captain_ticked_goal: false,
            has_assistant_ticked_goal: false,
            completed_actions: 0,
            completed_action_types: BTreeSet::new(),
            joined_date,
            badges: BTreeSet::new(),
            unlocked_avatars: BTreeSet::from([String::from(DEFAULT_AVATAR)]),
            unlocked_themes: BTreeSet::new(),
            rank: None,
        }
    }

    /// Whether the registration details have been filled in.
    pub fn is_registered(&self) -> bool {
        !self.name.is_empty() && !self.neighborhood.is_empty()
    }

    /// Project this profile into the read-only shape peers are kept in.
    pub fn as_peer(&self) -> PeerProfile {
        PeerProfile {
            id: self.id,
            name: self.name.clone(),
            county: self.county.clone(),
            neighborhood: self.neighborhood.clone(),
            avatar: self.avatar.clone(),
            points: self.total_shamrocks,
            joined_date: self.joined_date,
            is_master: self.is_master,
        }
    }
}

// ---------------------------------------------------------------------------
// PeerProfile
// ---------------------------------------------------------------------------

/// Another community member, as seen from the local client.
///
/// Peers are reference data: the local session never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PeerProfile {
    /// The peer's profile id.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// County of residence.
    pub county: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// Displayed icon.
    pub avatar: String,
    /// Shamrock total.
    pub points: u64,
    /// When the peer joined.
    pub joined_date: DateTime<Utc>,
    /// Whether the peer has reached mastery.
    pub is_master: bool,
}

// ---------------------------------------------------------------------------
// Catalog definitions
// ---------------------------------------------------------------------------

/// How many points an action is worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub enum ActionReward {
    /// A flat award per completion.
    Fixed {
        /// Points awarded.
        points: u64,
    },
    /// An award per complete unit of a claimed quantity.
    PerUnit {
        /// Label of the claimed quantity (e.g. `minutes`).
        unit: String,
        /// Size of one complete unit in the claimed quantity.
        #[serde(rename = "unitSize")]
        unit_size: u64,
        /// Points per complete unit.
        #[serde(rename = "pointsPerUnit")]
        points_per_unit: u64,
    },
}

/// A rewardable action in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ActionDefinition {
    /// The action kind.
    pub kind: ActionKind,
    /// Short title.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Display icon.
    pub icon: String,
    /// Point value.
    pub reward: ActionReward,
}

/// An unlockable badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct BadgeDefinition {
    /// Stable badge id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon, which doubles as an unlockable avatar.
    pub icon: String,
    /// What the badge is awarded for.
    pub description: String,
    /// Whether this is a leaderboard-position badge.
    pub is_rank: bool,
}

/// Visual configuration for a theme item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ThemeConfig {
    /// Background colour.
    pub bg: String,
    /// Accent colour.
    pub accent: String,
    /// Optional background pattern name.
    pub pattern: Option<String>,
}

/// An item in the points-redemption shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ShopItem {
    /// Stable item id. For achievements this is the badge id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display icon. For avatars this is what gets unlocked.
    pub icon: String,
    /// Price in shamrocks.
    pub cost: u64,
    /// Item category.
    #[serde(rename = "type")]
    pub item_type: ShopItemType,
    /// Cannot be bought, only earned.
    pub earned_only: bool,
    /// Theme visuals, for theme items.
    pub theme_config: Option<ThemeConfig>,
}

// ---------------------------------------------------------------------------
// Leaderboards
// ---------------------------------------------------------------------------

/// One row of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LeaderboardEntry {
    /// Profile id of the row.
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// Shamrock total.
    pub points: u64,
    /// County.
    pub county: String,
    /// Neighborhood.
    pub neighborhood: String,
    /// Displayed icon.
    pub avatar: String,
    /// 1-based position.
    pub rank: u32,
    /// Whether this row is the local user.
    pub is_current_user: bool,
    /// Whether the member has reached mastery.
    pub is_master: bool,
}

/// Aggregate standing of a neighborhood chat community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NeighborhoodStanding {
    /// Neighborhood name.
    pub neighborhood: String,
    /// County the neighborhood belongs to.
    pub county: String,
    /// Sum of all members' shamrocks.
    pub total_points: u64,
    /// Number of members with at least one shamrock.
    pub active_members: u32,
    /// 1-based position.
    pub rank: u32,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Identifies one chat room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RoomKey {
    /// Kind of room.
    pub room_type: RoomType,
    /// Room name (neighborhood, street or group name).
    pub room_name: String,
}

impl RoomKey {
    /// Build a room key.
    pub fn new(room_type: RoomType, room_name: impl Into<String>) -> Self {
        Self {
            room_type,
            room_name: room_name.into(),
        }
    }
}

impl core::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.room_type.as_str(), self.room_name)
    }
}

/// Media type of a chat attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AttachmentKind {
    /// A still image.
    Image,
    /// A video clip.
    Video,
}

/// Media attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Attachment {
    /// Media type.
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Where the media can be fetched.
    pub url: String,
}

/// A message posted to a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ChatMessage {
    /// Message id.
    pub id: MessageId,
    /// Author's profile id.
    pub user_id: ProfileId,
    /// Author's display name at posting time.
    pub user_name: String,
    /// Author's icon at posting time.
    pub user_avatar: String,
    /// Message body.
    pub text: String,
    /// When the message was posted.
    pub timestamp: DateTime<Utc>,
    /// Room the message was posted in.
    pub room: RoomKey,
    /// This message announces a team goal.
    #[serde(default)]
    pub is_goal: bool,
    /// The author was captain at posting time.
    #[serde(default)]
    pub is_captain: bool,
    /// The author was assistant captain at posting time.
    #[serde(default)]
    pub is_assistant_captain: bool,
    /// Set when this message is a witness confirmation request.
    #[serde(default)]
    pub verification_action_id: Option<ActionKind>,
    /// The witness request this message announces.
    #[serde(default)]
    pub witness_request_id: Option<WitnessRequestId>,
    /// Set once a witness request has been confirmed.
    #[serde(default)]
    pub is_verified: bool,
    /// Optional media.
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// The outcome of an image judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JudgmentVerdict {
    /// Whether the claimed action is confirmed.
    pub verified: bool,
    /// Human-readable explanation for the user.
    pub message: String,
}
