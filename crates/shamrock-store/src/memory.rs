//! In-process store backed by hash maps.
//!
//! Profiles are kept as JSON text, exactly as the Dragonfly backend keeps
//! them, so loading goes through the same backfill path.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shamrock_types::{ChatMessage, MessageId, PeerProfile, RoomKey, UserProfile};
use tokio::sync::RwLock;

use crate::error::StoreError;

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<String, String>,
    rooms: HashMap<RoomKey, Vec<ChatMessage>>,
    peers: Vec<PeerProfile>,
}

/// Volatile store for tests and single-process deployments.
///
/// Clones share the same tables and the same read-only switch.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    read_only: Arc<AtomicBool>,
    max_messages: usize,
}

impl MemoryStore {
    /// Create an empty store keeping at most `max_messages` per room.
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages,
            ..Self::default()
        }
    }

    /// Store raw profile JSON under `key`, bypassing serialization.
    ///
    /// Used to seed profiles written by older releases.
    pub async fn insert_raw(&self, key: &str, json: String) {
        self.tables.write().await.profiles.insert(key.to_owned(), json);
    }

    /// Refuse every write with [`StoreError::ReadOnly`] until switched back.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn writable(&self) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }

    pub(crate) async fn load(&self, key: &str) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .profiles
            .get(key)
            .map(|json| serde_json::from_str(json))
            .transpose()
            .map_err(StoreError::from)
    }

    pub(crate) async fn save(&self, key: &str, profile: &UserProfile) -> Result<(), StoreError> {
        self.writable()?;
        let json = serde_json::to_string(profile)?;
        self.tables.write().await.profiles.insert(key.to_owned(), json);
        Ok(())
    }

    pub(crate) async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        self.writable()?;
        let mut tables = self.tables.write().await;
        let log = tables.rooms.entry(message.room.clone()).or_default();
        log.push(message.clone());
        if self.max_messages > 0 && log.len() > self.max_messages {
            let excess = log.len().saturating_sub(self.max_messages);
            log.drain(..excess);
        }
        Ok(())
    }

    pub(crate) async fn messages(&self, room: &RoomKey, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let tables = self.tables.read().await;
        let log = tables.rooms.get(room).map(Vec::as_slice).unwrap_or_default();
        let skip = log.len().saturating_sub(limit);
        Ok(log.iter().skip(skip).cloned().collect())
    }

    pub(crate) async fn mark_verified(
        &self,
        room: &RoomKey,
        message_id: MessageId,
    ) -> Result<Option<ChatMessage>, StoreError> {
        self.writable()?;
        let mut tables = self.tables.write().await;
        let found = tables
            .rooms
            .get_mut(room)
            .and_then(|log| log.iter_mut().find(|m| m.id == message_id))
            .map(|m| {
                m.is_verified = true;
                m.clone()
            });
        Ok(found)
    }

    pub(crate) async fn load_peers(&self) -> Result<Vec<PeerProfile>, StoreError> {
        Ok(self.tables.read().await.peers.clone())
    }

    pub(crate) async fn save_peers(&self, peers: &[PeerProfile]) -> Result<(), StoreError> {
        self.writable()?;
        self.tables.write().await.peers = peers.to_vec();
        Ok(())
    }
}
