//! Neighborhood chat rooms.
//!
//! A registered user belongs to their neighborhood room, their street room
//! (when a street is set), one room per community group, and the leadership
//! room while they are a captain or assistant captain.

use chrono::{DateTime, Utc};
use shamrock_types::{
    ActionKind, Attachment, ChatMessage, MessageId, PeerProfile, RoomKey, RoomType, UserProfile,
    WitnessRequestId,
};

use crate::error::CoreError;

/// Every room `profile` may read and post in.
pub fn rooms_of(profile: &UserProfile) -> Vec<RoomKey> {
    if !profile.is_registered() {
        return Vec::new();
    }
    let mut rooms = vec![RoomKey::new(RoomType::Neighborhood, profile.neighborhood.as_str())];
    if !profile.street.is_empty() {
        rooms.push(RoomKey::new(RoomType::Street, profile.street.as_str()));
    }
    rooms.extend(
        profile
            .community_groups
            .iter()
            .map(|g| RoomKey::new(RoomType::Group, g.as_str())),
    );
    if profile.is_captain || profile.is_assistant_captain {
        rooms.push(RoomKey::new(RoomType::Leadership, profile.neighborhood.as_str()));
    }
    rooms
}

/// Fail unless `profile` belongs to `room`.
pub fn ensure_member(profile: &UserProfile, room: &RoomKey) -> Result<(), CoreError> {
    if rooms_of(profile).contains(room) {
        Ok(())
    } else {
        Err(CoreError::NotARoomMember {
            room: room.to_string(),
        })
    }
}

/// Whether `peer` can be seen in `room`.
///
/// Peer records carry only their neighborhood, so street, group and
/// leadership rooms admit any peer from the room's neighborhood scope.
pub fn peer_in_room(peer: &PeerProfile, room: &RoomKey, owner: &UserProfile) -> bool {
    match room.room_type {
        RoomType::Neighborhood | RoomType::Leadership => peer.neighborhood == room.room_name,
        RoomType::Street | RoomType::Group => peer.neighborhood == owner.neighborhood,
    }
}

/// Build a plain message from `profile` to `room`.
///
/// Text is trimmed. Empty text is rejected.
pub fn compose(
    profile: &UserProfile,
    room: RoomKey,
    text: &str,
    attachment: Option<Attachment>,
    now: DateTime<Utc>,
) -> Result<ChatMessage, CoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoreError::EmptyMessage);
    }
    Ok(ChatMessage {
        id: MessageId::new(),
        user_id: profile.id,
        user_name: profile.name.clone(),
        user_avatar: profile.avatar.clone(),
        text: text.to_owned(),
        timestamp: now,
        room,
        is_goal: false,
        is_captain: profile.is_captain,
        is_assistant_captain: profile.is_assistant_captain,
        verification_action_id: None,
        witness_request_id: None,
        is_verified: false,
        attachment,
    })
}

/// Build the message announcing a team goal.
pub fn goal_announcement(
    profile: &UserProfile,
    goal: &str,
    now: DateTime<Utc>,
) -> Result<ChatMessage, CoreError> {
    let room = RoomKey::new(RoomType::Neighborhood, profile.neighborhood.as_str());
    let mut message = compose(profile, room, &format!("🎯 New team goal: {goal}"), None, now)?;
    message.is_goal = true;
    Ok(message)
}

/// Build the message asking the room to witness a claim.
pub fn witness_announcement(
    profile: &UserProfile,
    room: RoomKey,
    action: ActionKind,
    title: &str,
    request_id: WitnessRequestId,
    now: DateTime<Utc>,
) -> Result<ChatMessage, CoreError> {
    let text = format!("🙋 I just completed \"{title}\". Can anyone here vouch for me?");
    let mut message = compose(profile, room, &text, None, now)?;
    message.verification_action_id = Some(action);
    message.witness_request_id = Some(request_id);
    Ok(message)
}
