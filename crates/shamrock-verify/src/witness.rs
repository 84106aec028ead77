//! The witness confirmation board.
//!
//! A witness request is a claim posted to a chat room and resolved when one
//! other member of that room confirms it. The board is publish/subscribe:
//!
//! - The requester gets a [`WitnessTicket`] whose [`wait`](WitnessTicket::wait)
//!   resolves on confirmation, cancellation, or expiry. Nobody polls.
//! - Every state change is broadcast as a [`WitnessEvent`] for WebSocket
//!   subscribers.
//!
//! Each request resolves at most once. The first resolution wins and later
//! attempts fail with [`VerifyError::NotPending`]. Resolved requests stay
//! queryable for [`RESOLVED_RETENTION`] and are swept when new requests are
//! posted; at most [`MAX_RESOLVED`] of them are kept at any time.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shamrock_types::{ActionKind, MessageId, ProfileId, RoomKey, WitnessRequestId};
use tokio::sync::{Mutex, broadcast, oneshot};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::VerifyError;

/// Capacity of the witness event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long a resolved request can still be looked up.
pub const RESOLVED_RETENTION: Duration = Duration::from_secs(15 * 60);

/// Resolved requests kept at most; the oldest are dropped first.
pub const MAX_RESOLVED: usize = 512;

/// A claim awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessRequest {
    /// Request id.
    pub id: WitnessRequestId,
    /// Who made the claim.
    pub requester: ProfileId,
    /// Requester's display name.
    pub requester_name: String,
    /// Room the claim was posted to.
    pub room: RoomKey,
    /// Claimed action.
    pub action: ActionKind,
    /// Claimed quantity, for per-unit actions.
    pub quantity: Option<u64>,
    /// Points that confirmation will award.
    pub points: u64,
    /// Chat message announcing the request, once posted.
    pub message_id: Option<MessageId>,
    /// When the request was posted.
    pub created_at: DateTime<Utc>,
    /// When the request lapses if nobody confirms it.
    pub expires_at: DateTime<Utc>,
}

/// Where a request stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WitnessStatus {
    /// Waiting for a confirmation.
    Pending,
    /// Confirmed by another member.
    Confirmed {
        /// The confirming member.
        by: ProfileId,
    },
    /// Withdrawn by the requester.
    Cancelled,
    /// Nobody confirmed in time.
    Expired,
}

impl WitnessStatus {
    /// Whether the request is still open.
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// How a request was resolved, as delivered to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WitnessResolution {
    /// Confirmed by `by`.
    Confirmed {
        /// The confirming member.
        by: ProfileId,
    },
    /// Withdrawn.
    Cancelled,
    /// Lapsed.
    Expired,
}

/// A state change broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WitnessEvent {
    /// A new request was posted.
    Requested {
        /// The request.
        request: WitnessRequest,
    },
    /// A request was confirmed.
    Confirmed {
        /// Request id.
        id: WitnessRequestId,
        /// The confirming member.
        by: ProfileId,
    },
    /// A request was withdrawn.
    Cancelled {
        /// Request id.
        id: WitnessRequestId,
    },
    /// A request lapsed.
    Expired {
        /// Request id.
        id: WitnessRequestId,
    },
}

/// Everything needed to post a request.
#[derive(Debug, Clone)]
pub struct NewWitnessRequest {
    /// Who is making the claim.
    pub requester: ProfileId,
    /// Requester's display name.
    pub requester_name: String,
    /// Room to post to.
    pub room: RoomKey,
    /// Claimed action.
    pub action: ActionKind,
    /// Claimed quantity.
    pub quantity: Option<u64>,
    /// Points awarded on confirmation.
    pub points: u64,
}

/// The requester's handle on a posted request.
#[derive(Debug)]
pub struct WitnessTicket {
    id: WitnessRequestId,
    expires_in: Duration,
    rx: oneshot::Receiver<WitnessResolution>,
}

impl WitnessTicket {
    /// Request id.
    pub const fn id(&self) -> WitnessRequestId {
        self.id
    }

    /// Wait until the request is confirmed, cancelled, or expires.
    ///
    /// On expiry the caller should call [`WitnessBoard::expire`] so the
    /// board and its subscribers learn about it.
    pub async fn wait(self) -> WitnessResolution {
        match tokio::time::timeout(self.expires_in, self.rx).await {
            Ok(Ok(resolution)) => resolution,
            // The board dropped the sender without resolving: treat as withdrawn.
            Ok(Err(_)) => WitnessResolution::Cancelled,
            Err(_) => WitnessResolution::Expired,
        }
    }
}

struct Entry {
    request: WitnessRequest,
    status: WitnessStatus,
    notify: Option<oneshot::Sender<WitnessResolution>>,
    resolved_at: Option<Instant>,
}

impl Entry {
    fn resolve(&mut self, status: WitnessStatus, resolution: WitnessResolution) {
        self.status = status;
        self.resolved_at = Some(Instant::now());
        if let Some(tx) = self.notify.take() {
            let _ = tx.send(resolution);
        }
    }
}

/// Drop resolved entries past retention, then the oldest beyond the cap.
fn sweep(entries: &mut HashMap<WitnessRequestId, Entry>) {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, e| {
        e.resolved_at
            .is_none_or(|at| now.duration_since(at) < RESOLVED_RETENTION)
    });

    let mut resolved: Vec<(Instant, WitnessRequestId)> = entries
        .iter()
        .filter_map(|(id, e)| e.resolved_at.map(|at| (at, *id)))
        .collect();
    if resolved.len() > MAX_RESOLVED {
        resolved.sort_by_key(|(at, _)| *at);
        let excess = resolved.len().saturating_sub(MAX_RESOLVED);
        for (_, id) in resolved.iter().take(excess) {
            entries.remove(id);
        }
    }

    let dropped = before.saturating_sub(entries.len());
    if dropped > 0 {
        debug!(dropped, retained = entries.len(), "Swept resolved witness requests");
    }
}

/// In-process registry of witness requests.
pub struct WitnessBoard {
    entries: Mutex<HashMap<WitnessRequestId, Entry>>,
    events: broadcast::Sender<WitnessEvent>,
    expiry: Duration,
}

impl WitnessBoard {
    /// Create a board whose requests lapse after `expiry`.
    pub fn new(expiry: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries: Mutex::new(HashMap::new()),
            events,
            expiry,
        }
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<WitnessEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: WitnessEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Post a new request.
    pub async fn post(&self, new: NewWitnessRequest, now: DateTime<Utc>) -> (WitnessRequest, WitnessTicket) {
        let id = WitnessRequestId::new();
        let expires_at = chrono::Duration::from_std(self.expiry)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let request = WitnessRequest {
            id,
            requester: new.requester,
            requester_name: new.requester_name,
            room: new.room,
            action: new.action,
            quantity: new.quantity,
            points: new.points,
            message_id: None,
            created_at: now,
            expires_at,
        };
        let (tx, rx) = oneshot::channel();
        {
            let mut entries = self.entries.lock().await;
            sweep(&mut entries);
            entries.insert(
                id,
                Entry {
                    request: request.clone(),
                    status: WitnessStatus::Pending,
                    notify: Some(tx),
                    resolved_at: None,
                },
            );
        }
        info!(
            request_id = %id,
            requester = %request.requester,
            room = %request.room,
            action = %request.action,
            "Witness request posted"
        );
        self.publish(WitnessEvent::Requested {
            request: request.clone(),
        });
        let ticket = WitnessTicket {
            id,
            expires_in: self.expiry,
            rx,
        };
        (request, ticket)
    }

    /// Record the chat message that announces request `id`.
    pub async fn attach_message(&self, id: WitnessRequestId, message_id: MessageId) -> Result<(), VerifyError> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(&id).ok_or(VerifyError::WitnessNotFound(id))?;
        entry.request.message_id = Some(message_id);
        Ok(())
    }

    /// Confirm request `id` on behalf of `confirmer`, who is in `room`.
    pub async fn confirm(
        &self,
        id: WitnessRequestId,
        confirmer: ProfileId,
        room: &RoomKey,
    ) -> Result<WitnessRequest, VerifyError> {
        let request = {
            let mut entries = self.entries.lock().await;
            let entry = entries.get_mut(&id).ok_or(VerifyError::WitnessNotFound(id))?;
            if !entry.status.is_pending() {
                return Err(VerifyError::NotPending {
                    id,
                    status: entry.status,
                });
            }
            if entry.request.requester == confirmer {
                return Err(VerifyError::SelfConfirmation);
            }
            if entry.request.room != *room {
                return Err(VerifyError::WrongRoom {
                    room: entry.request.room.to_string(),
                });
            }
            entry.resolve(
                WitnessStatus::Confirmed { by: confirmer },
                WitnessResolution::Confirmed { by: confirmer },
            );
            entry.request.clone()
        };
        info!(request_id = %id, confirmer = %confirmer, "Witness request confirmed");
        self.publish(WitnessEvent::Confirmed { id, by: confirmer });
        Ok(request)
    }

    /// Withdraw a pending request.
    pub async fn cancel(&self, id: WitnessRequestId) -> Result<WitnessRequest, VerifyError> {
        let request = self.close(id, WitnessStatus::Cancelled, WitnessResolution::Cancelled).await?;
        info!(request_id = %id, "Witness request cancelled");
        self.publish(WitnessEvent::Cancelled { id });
        Ok(request)
    }

    /// Mark a pending request as lapsed.
    pub async fn expire(&self, id: WitnessRequestId) -> Result<WitnessRequest, VerifyError> {
        let request = self.close(id, WitnessStatus::Expired, WitnessResolution::Expired).await?;
        debug!(request_id = %id, "Witness request expired");
        self.publish(WitnessEvent::Expired { id });
        Ok(request)
    }

    async fn close(
        &self,
        id: WitnessRequestId,
        status: WitnessStatus,
        resolution: WitnessResolution,
    ) -> Result<WitnessRequest, VerifyError> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get_mut(&id).ok_or(VerifyError::WitnessNotFound(id))?;
        if !entry.status.is_pending() {
            return Err(VerifyError::NotPending {
                id,
                status: entry.status,
            });
        }
        entry.resolve(status, resolution);
        Ok(entry.request.clone())
    }

    /// Current status of request `id`.
    pub async fn status(&self, id: WitnessRequestId) -> Option<WitnessStatus> {
        self.entries.lock().await.get(&id).map(|e| e.status)
    }

    /// Look up request `id`.
    pub async fn get(&self, id: WitnessRequestId) -> Option<WitnessRequest> {
        self.entries.lock().await.get(&id).map(|e| e.request.clone())
    }

    /// Number of requests held, pending or recently resolved.
    pub async fn retained(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Pending requests posted to `room`, oldest first.
    pub async fn pending_in(&self, room: &RoomKey) -> Vec<WitnessRequest> {
        let entries = self.entries.lock().await;
        let mut pending: Vec<WitnessRequest> = entries
            .values()
            .filter(|e| e.status.is_pending() && e.request.room == *room)
            .map(|e| e.request.clone())
            .collect();
        pending.sort_by_key(|r| r.created_at);
        pending
    }
}
