//! Dragonfly (Redis-compatible) store.
//!
//! Key layout:
//!
//! - `profile:{key}` -- the profile as a JSON string
//! - `room:{type}:{name}:messages` -- a list of JSON chat messages, oldest first
//! - `peers` -- the peer pool as a JSON array

use fred::prelude::*;
use shamrock_types::{ChatMessage, MessageId, PeerProfile, RoomKey, UserProfile};
use tracing::{debug, info};

use crate::error::StoreError;

/// Key holding the peer pool.
const PEERS_KEY: &str = "peers";

/// Profile and chat persistence backed by a Dragonfly client.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
    max_messages: usize,
}

impl DragonflyStore {
    /// Connect to Dragonfly at `url` (e.g. `redis://localhost:6379`).
    pub async fn connect(url: &str, max_messages: usize) -> Result<Self, StoreError> {
        let config = Config::from_url(url).map_err(|e| StoreError::Config(format!("invalid Dragonfly URL: {e}")))?;
        let client = Builder::from_config(config).build()?;
        client.init().await?;
        info!(url = %url, "Connected to Dragonfly");
        Ok(Self { client, max_messages })
    }

    fn profile_key(key: &str) -> String {
        format!("profile:{key}")
    }

    fn room_key(room: &RoomKey) -> String {
        format!("room:{}:{}:messages", room.room_type.as_str(), room.room_name)
    }

    pub(crate) async fn load(&self, key: &str) -> Result<Option<UserProfile>, StoreError> {
        let value: Option<String> = self.client.get(Self::profile_key(key)).await?;
        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn save(&self, key: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        let _: () = self
            .client
            .set(Self::profile_key(key), json.as_str(), None, None, false)
            .await?;
        debug!(key = %key, "Saved profile");
        Ok(())
    }

    pub(crate) async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        let key = Self::room_key(&message.room);
        let json = serde_json::to_string(message)?;
        let len: u64 = self.client.rpush(&key, json.as_str()).await?;
        let cap = u64::try_from(self.max_messages).unwrap_or(u64::MAX);
        if cap > 0 && len > cap {
            let keep = i64::try_from(self.max_messages).unwrap_or(i64::MAX);
            let _: () = self.client.ltrim(&key, keep.saturating_neg(), -1).await?;
        }
        Ok(())
    }

    pub(crate) async fn messages(&self, room: &RoomKey, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let start = i64::try_from(limit).unwrap_or(i64::MAX).saturating_neg();
        let values: Vec<String> = self.client.lrange(Self::room_key(room), start, -1).await?;
        values
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    pub(crate) async fn mark_verified(
        &self,
        room: &RoomKey,
        message_id: MessageId,
    ) -> Result<Option<ChatMessage>, StoreError> {
        let key = Self::room_key(room);
        let values: Vec<String> = self.client.lrange(&key, 0, -1).await?;
        for (index, json) in values.iter().enumerate() {
            let mut message: ChatMessage = serde_json::from_str(json)?;
            if message.id != message_id {
                continue;
            }
            message.is_verified = true;
            let updated = serde_json::to_string(&message)?;
            let index = i64::try_from(index).map_err(|e| StoreError::Config(format!("message index out of range: {e}")))?;
            let _: () = self.client.lset(&key, index, updated.as_str()).await?;
            return Ok(Some(message));
        }
        Ok(None)
    }

    pub(crate) async fn load_peers(&self) -> Result<Vec<PeerProfile>, StoreError> {
        let value: Option<String> = self.client.get(PEERS_KEY).await?;
        match value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    pub(crate) async fn save_peers(&self, peers: &[PeerProfile]) -> Result<(), StoreError> {
        let json = serde_json::to_string(peers)?;
        let _: () = self.client.set(PEERS_KEY, json.as_str(), None, None, false).await?;
        Ok(())
    }
}
