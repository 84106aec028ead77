//! Persistence for the Help Ireland service.
//!
//! A profile is stored whole under a key and read back with every field the
//! current release knows about: anything a stored profile is missing is
//! backfilled with its default on load. Chat rooms are append-only message
//! logs capped at a configured length.
//!
//! # Modules
//!
//! - [`memory`] -- In-process backend
//! - [`dragonfly`] -- Dragonfly/Redis backend via `fred`
//! - [`error`] -- Error types

pub mod dragonfly;
pub mod error;
pub mod memory;

pub use dragonfly::DragonflyStore;
pub use error::StoreError;
pub use memory::MemoryStore;

use shamrock_types::{ChatMessage, MessageId, PeerProfile, RoomKey, UserProfile};

/// Storage backend, dispatched by variant.
pub enum ProfileStore {
    /// Volatile in-process storage.
    Memory(MemoryStore),
    /// Dragonfly/Redis.
    Dragonfly(DragonflyStore),
}

impl ProfileStore {
    /// An empty in-memory store.
    pub fn in_memory(max_messages: usize) -> Self {
        Self::Memory(MemoryStore::new(max_messages))
    }

    /// Short backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Dragonfly(_) => "dragonfly",
        }
    }

    /// Load the profile stored under `key`, backfilling missing fields.
    pub async fn load(&self, key: &str) -> Result<Option<UserProfile>, StoreError> {
        match self {
            Self::Memory(s) => s.load(key).await,
            Self::Dragonfly(s) => s.load(key).await,
        }
    }

    /// Store `profile` under `key`, replacing what was there.
    pub async fn save(&self, key: &str, profile: &UserProfile) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.save(key, profile).await,
            Self::Dragonfly(s) => s.save(key, profile).await,
        }
    }

    /// Append `message` to the log of its room.
    pub async fn append_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.append_message(message).await,
            Self::Dragonfly(s) => s.append_message(message).await,
        }
    }

    /// The most recent `limit` messages in `room`, oldest first.
    pub async fn messages(&self, room: &RoomKey, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        match self {
            Self::Memory(s) => s.messages(room, limit).await,
            Self::Dragonfly(s) => s.messages(room, limit).await,
        }
    }

    /// Flag message `message_id` in `room` as verified.
    ///
    /// Returns the updated message, or `None` when it is no longer in the log.
    pub async fn mark_verified(
        &self,
        room: &RoomKey,
        message_id: MessageId,
    ) -> Result<Option<ChatMessage>, StoreError> {
        match self {
            Self::Memory(s) => s.mark_verified(room, message_id).await,
            Self::Dragonfly(s) => s.mark_verified(room, message_id).await,
        }
    }

    /// The stored peer pool.
    pub async fn load_peers(&self) -> Result<Vec<PeerProfile>, StoreError> {
        match self {
            Self::Memory(s) => s.load_peers().await,
            Self::Dragonfly(s) => s.load_peers().await,
        }
    }

    /// Replace the stored peer pool.
    pub async fn save_peers(&self, peers: &[PeerProfile]) -> Result<(), StoreError> {
        match self {
            Self::Memory(s) => s.save_peers(peers).await,
            Self::Dragonfly(s) => s.save_peers(peers).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use shamrock_types::{ProfileId, RoomType};

    use super::*;

    fn message(room: &RoomKey, text: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(),
            user_id: ProfileId::new(),
            user_name: "Siobhán".to_owned(),
            user_avatar: "🦅".to_owned(),
            text: text.to_owned(),
            timestamp: Utc::now(),
            room: room.clone(),
            is_goal: false,
            is_captain: false,
            is_assistant_captain: false,
            verification_action_id: None,
            witness_request_id: None,
            is_verified: false,
            attachment: None,
        }
    }

    #[tokio::test]
    async fn missing_profile_loads_as_none() {
        let store = ProfileStore::in_memory(100);
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn saved_profile_round_trips() {
        let store = ProfileStore::in_memory(100);
        let mut profile = UserProfile::new(Utc::now());
        profile.name = "Aoife".to_owned();
        profile.total_shamrocks = 450;
        store.save("me", &profile).await.unwrap();
        assert_eq!(store.load("me").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn old_profile_is_backfilled_on_load() {
        let memory = MemoryStore::new(100);
        memory
            .insert_raw(
                "legacy",
                r#"{"name":"Cillian","neighborhood":"Galway City Centre","totalShamrocks":9800}"#.to_owned(),
            )
            .await;
        let store = ProfileStore::Memory(memory);
        let profile = store.load("legacy").await.unwrap().unwrap();
        assert_eq!(profile.total_shamrocks, 9800);
        assert_eq!(profile.golden_shamrocks, 0);
        assert!(profile.unlocked_themes.is_empty());
        assert!(profile.unlocked_avatars.contains(shamrock_types::DEFAULT_AVATAR));
    }

    #[tokio::test]
    async fn corrupt_profile_is_an_error() {
        let memory = MemoryStore::new(100);
        memory.insert_raw("bad", "not json".to_owned()).await;
        let store = ProfileStore::Memory(memory);
        assert!(matches!(store.load("bad").await, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn room_log_is_capped_and_ordered() {
        let store = ProfileStore::in_memory(3);
        let room = RoomKey::new(RoomType::Neighborhood, "Dalkey, Dublin");
        for text in ["one", "two", "three", "four"] {
            store.append_message(&message(&room, text)).await.unwrap();
        }
        let texts: Vec<String> = store
            .messages(&room, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["two", "three", "four"]);

        let last = store.messages(&room, 1).await.unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.first().unwrap().text, "four");
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let store = ProfileStore::in_memory(10);
        let dalkey = RoomKey::new(RoomType::Neighborhood, "Dalkey, Dublin");
        let street = RoomKey::new(RoomType::Street, "Castle Street");
        store.append_message(&message(&dalkey, "hello")).await.unwrap();
        assert!(store.messages(&street, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_verified_updates_the_logged_message() {
        let store = ProfileStore::in_memory(10);
        let room = RoomKey::new(RoomType::Street, "Castle Street");
        let msg = message(&room, "Witness me");
        store.append_message(&msg).await.unwrap();

        let updated = store.mark_verified(&room, msg.id).await.unwrap().unwrap();
        assert!(updated.is_verified);
        assert!(store.messages(&room, 10).await.unwrap().first().unwrap().is_verified);
        assert!(store.mark_verified(&room, MessageId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_only_store_refuses_writes_and_keeps_data() {
        let memory = MemoryStore::new(10);
        let store = ProfileStore::Memory(memory.clone());
        let mut profile = UserProfile::new(Utc::now());
        profile.total_shamrocks = 100;
        store.save("me", &profile).await.unwrap();

        memory.set_read_only(true);
        profile.total_shamrocks = 200;
        assert!(matches!(store.save("me", &profile).await, Err(StoreError::ReadOnly)));
        let room = RoomKey::new(RoomType::Street, "Castle Street");
        assert!(matches!(
            store.append_message(&message(&room, "hello")).await,
            Err(StoreError::ReadOnly)
        ));
        assert!(matches!(store.save_peers(&[]).await, Err(StoreError::ReadOnly)));
        assert_eq!(store.load("me").await.unwrap().unwrap().total_shamrocks, 100);

        memory.set_read_only(false);
        store.save("me", &profile).await.unwrap();
        assert_eq!(store.load("me").await.unwrap().unwrap().total_shamrocks, 200);
    }

    #[tokio::test]
    async fn peers_default_to_empty() {
        let store = ProfileStore::in_memory(10);
        assert!(store.load_peers().await.unwrap().is_empty());
        let mut me = UserProfile::new(Utc::now());
        me.name = "Aoife".to_owned();
        store.save_peers(&[me.as_peer()]).await.unwrap();
        assert_eq!(store.load_peers().await.unwrap().len(), 1);
    }
}
