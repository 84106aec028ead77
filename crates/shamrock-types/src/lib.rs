//! Shared type definitions for the Help Ireland service.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types flow to the web client as `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for profiles, messages and requests
//! - [`enums`] -- Action kinds, shop item types, rooms, scopes, games
//! - [`structs`] -- Profile, peers, catalog definitions, leaderboards, chat

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    ActionKind, LeaderRole, LeaderboardScope, MiniGame, RoomType, ShopItemType,
    VerificationMethod,
};
pub use ids::{AttemptId, GameRoundId, MessageId, ProfileId, WitnessRequestId};
pub use structs::{
    ActionDefinition, ActionReward, Attachment, AttachmentKind, BadgeDefinition, ChatMessage,
    DEFAULT_AVATAR, JudgmentVerdict, LeaderboardEntry, NeighborhoodStanding, PeerProfile,
    RoomKey, ShopItem, ThemeConfig, UserProfile,
};
