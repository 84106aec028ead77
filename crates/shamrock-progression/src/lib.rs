//! Progression rules and the game economy for the Help Ireland service.
//!
//! Everything in this crate is synchronous and free of I/O. Operations that
//! mutate a [`UserProfile`](shamrock_types::UserProfile) either succeed
//! completely or return a [`ProgressionError`] and leave it untouched. The
//! rules engine never fails.
//!
//! # Modules
//!
//! - [`catalog`] -- Action, badge and shop catalogs plus award calculation
//! - [`config`] -- Thresholds and mission settings
//! - [`engine`] -- The rules engine (rank, badges, cosmetics, mastery, leadership)
//! - [`leaderboard`] -- Ranking, full leaderboards, neighborhood standings
//! - [`wallet`] -- Shamrock and golden shamrock balances
//! - [`shop`] -- Purchases and cosmetic selection
//! - [`mission`] -- Weekly team missions
//! - [`games`] -- Quiz rounds, memory board, wildlife sanctuary
//! - [`error`] -- Error types

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod leaderboard;
pub mod mission;
pub mod shop;
pub mod wallet;

pub use catalog::{Catalog, award_for, badge_ids};
pub use config::ProgressionConfig;
pub use engine::{LeadershipFlags, ProgressionDelta, RankChange, derive_progression};
pub use error::ProgressionError;
pub use games::{AnswerFeedback, FlipOutcome, MemoryBoard, QuestionView, QuizRound};
pub use mission::TickOutcome;
pub use shop::ShopListing;
