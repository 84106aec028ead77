//! Shared state for the API server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shamrock_core::App;
use shamrock_verify::WitnessEvent;
use tokio::sync::broadcast;

/// State handed to every handler.
pub struct AppState {
    /// The running application.
    pub app: Arc<App>,
    /// When the server started.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wrap a running application.
    pub fn new(app: Arc<App>) -> Self {
        Self {
            app,
            started_at: Utc::now(),
        }
    }

    /// Subscribe to witness board events for the `WebSocket` stream.
    pub fn subscribe(&self) -> broadcast::Receiver<WitnessEvent> {
        self.app.subscribe_witness()
    }
}
