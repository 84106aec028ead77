//! HTTP and `WebSocket` API for the Help Ireland service.
//!
//! Exposes the [`shamrock_core::App`] over a REST API built on Axum, plus
//! a `WebSocket` stream of witness board events.
//!
//! # Modules
//!
//! - [`router`] -- Route table and middleware
//! - [`handlers`] -- Profile, community, shop, mission and chat endpoints
//! - [`verification`] -- Evidence and witness endpoints
//! - [`games`] -- Games corner endpoints
//! - [`ws`] -- Witness event stream
//! - [`server`] -- Listener setup and the serve loop
//! - [`state`] -- Shared handler state
//! - [`error`] -- API error responses

pub mod error;
pub mod games;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod verification;
pub mod ws;

pub use error::ApiError;
pub use router::build_router;
pub use server::{Server, ServerError};
pub use state::AppState;
