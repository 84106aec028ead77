//! Session orchestration for the Help Ireland service.
//!
//! Ties the pure rules of `shamrock-progression` to persistence, the
//! verification gate and the chat log. The [`App`] is what the HTTP layer
//! talks to: every operation it exposes mutates the profile, re-runs the
//! rules engine, and saves, under one lock.
//!
//! # Modules
//!
//! - [`app`] -- Async facade: profile, shop, missions, chat, games, verification
//! - [`session`] -- Synchronous session state and the recompute-after-mutation loop
//! - [`chat`] -- Room membership and message composition
//! - [`games`] -- Server-side quiz and memory rounds
//! - [`registration`] -- Validated registration and profile-edit forms
//! - [`seed`] -- Neighborhood list and demo community
//! - [`config`] -- `help-ireland.yaml` loading
//! - [`error`] -- Error types

pub mod app;
pub mod chat;
pub mod config;
pub mod error;
pub mod games;
pub mod registration;
pub mod seed;
pub mod session;

pub use app::{
    AnswerResult, App, EvidenceResult, FlipResult, SanctuaryResult, WitnessClaim, open_store,
};
pub use config::{AppConfig, ConfigError, LoggingConfig, ServerConfig, StoreConfig};
pub use error::CoreError;
pub use games::RoundStart;
pub use registration::{ProfileUpdate, RegistrationForm};
pub use seed::{NEIGHBORHOODS, Neighborhood};
pub use session::{Progressed, Session};
