//! Axum router construction.
//!
//! Assembles the REST and `WebSocket` routes into one [`Router`] with CORS
//! enabled for the browser client.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{games, handlers, verification, ws};

/// Build the complete router.
///
/// See [`handlers`], [`verification`] and [`games`] for the endpoint
/// tables. `GET /ws/witness` streams witness board events.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        // WebSocket
        .route("/ws/witness", get(ws::ws_witness))
        // Profile
        .route(
            "/api/profile",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route("/api/profile/register", post(handlers::register))
        .route("/api/profile/avatar", put(handlers::select_avatar))
        .route("/api/profile/theme", put(handlers::select_theme))
        // Community
        .route("/api/neighborhoods", get(handlers::list_neighborhoods))
        .route("/api/standings", get(handlers::standings))
        .route(
            "/api/peers",
            get(handlers::list_peers).put(handlers::replace_peers),
        )
        .route("/api/leaderboard", get(handlers::leaderboard))
        // Catalog and shop
        .route("/api/actions", get(handlers::list_actions))
        .route(
            "/api/badges",
            get(handlers::list_badges).post(handlers::add_badge),
        )
        .route("/api/shop", get(handlers::list_shop))
        .route("/api/shop/items", post(handlers::add_shop_item))
        .route("/api/shop/{id}/purchase", post(handlers::purchase))
        // Missions
        .route(
            "/api/mission",
            get(handlers::get_mission).post(handlers::set_goal),
        )
        .route("/api/mission/tick", post(handlers::tick_goal))
        // Chat
        .route("/api/rooms", get(handlers::list_rooms))
        .route(
            "/api/rooms/{room_type}/{room_name}/messages",
            get(handlers::list_messages).post(handlers::post_message),
        )
        .route(
            "/api/rooms/{room_type}/{room_name}/witnesses",
            get(verification::pending_witnesses),
        )
        // Verification
        .route("/api/verify/evidence", post(verification::submit_evidence))
        .route("/api/verify/witness", post(verification::request_witness))
        .route("/api/verify/witness/{id}", get(verification::witness_status))
        .route(
            "/api/verify/witness/{id}/confirm",
            post(verification::confirm_witness),
        )
        .route(
            "/api/verify/witness/{id}/cancel",
            post(verification::cancel_witness),
        )
        // Games
        .route("/api/games/sanctuary", post(games::submit_sanctuary))
        .route("/api/games/{game}", post(games::start_game))
        .route("/api/games/rounds/{id}", get(games::board))
        .route("/api/games/rounds/{id}/answer", post(games::answer))
        .route("/api/games/rounds/{id}/flip", post(games::flip))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
