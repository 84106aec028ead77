//! Leaderboard ranking and neighborhood standings.
//!
//! Ranking is read-only: it never touches the profile, it only reports where
//! the profile would sit among its peers. Ordering is points descending,
//! then earlier `joined_date`, then smaller id, so equal scores always rank
//! the same way regardless of the order peers arrive in.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shamrock_types::{
    LeaderboardEntry, LeaderboardScope, NeighborhoodStanding, PeerProfile, ProfileId, UserProfile,
};

/// Whether `peer` belongs on the same leaderboard as `profile` under `scope`.
///
/// The profile's own id is never a peer, even if a stale copy of it is in
/// the peer pool.
pub fn in_scope(scope: LeaderboardScope, profile: &UserProfile, peer: &PeerProfile) -> bool {
    if peer.id == profile.id {
        return false;
    }
    match scope {
        LeaderboardScope::County => peer.county == profile.county,
        LeaderboardScope::Neighborhood => peer.neighborhood == profile.neighborhood,
    }
}

fn sort_key(entry: &PeerProfile) -> (Reverse<u64>, DateTime<Utc>, ProfileId) {
    (Reverse(entry.points), entry.joined_date, entry.id)
}

/// The profile and its in-scope peers, in leaderboard order.
fn ordered(profile: &UserProfile, peers: &[PeerProfile], scope: LeaderboardScope) -> Vec<PeerProfile> {
    let mut entries: Vec<PeerProfile> = peers
        .iter()
        .filter(|p| in_scope(scope, profile, p))
        .cloned()
        .collect();
    entries.push(profile.as_peer());
    entries.sort_by_key(sort_key);
    entries
}

fn position_to_rank(index: usize) -> u32 {
    u32::try_from(index.saturating_add(1)).unwrap_or(u32::MAX)
}

/// The profile's 1-based rank among its in-scope peers.
///
/// An empty peer pool ranks the profile first.
pub fn rank_of(profile: &UserProfile, peers: &[PeerProfile], scope: LeaderboardScope) -> u32 {
    let own = sort_key(&profile.as_peer());
    let ahead = peers
        .iter()
        .filter(|p| in_scope(scope, profile, p))
        .filter(|p| sort_key(p) < own)
        .count();
    position_to_rank(ahead)
}

/// The full ordered leaderboard, with the local user's row flagged.
pub fn build_leaderboard(
    profile: &UserProfile,
    peers: &[PeerProfile],
    scope: LeaderboardScope,
) -> Vec<LeaderboardEntry> {
    ordered(profile, peers, scope)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| LeaderboardEntry {
            is_current_user: entry.id == profile.id,
            rank: position_to_rank(index),
            id: entry.id,
            name: entry.name,
            points: entry.points,
            county: entry.county,
            neighborhood: entry.neighborhood,
            avatar: entry.avatar,
            is_master: entry.is_master,
        })
        .collect()
}

/// Aggregate every member by neighborhood and rank the neighborhoods.
///
/// Members with an empty neighborhood are skipped. A member counts as
/// active once they hold at least one shamrock. Neighborhoods are ordered by
/// total points descending, then by name.
pub fn neighborhood_standings(members: &[PeerProfile]) -> Vec<NeighborhoodStanding> {
    let mut totals: BTreeMap<&str, (String, u64, u32)> = BTreeMap::new();
    for member in members.iter().filter(|m| !m.neighborhood.is_empty()) {
        let slot = totals
            .entry(member.neighborhood.as_str())
            .or_insert_with(|| (member.county.clone(), 0, 0));
        slot.1 = slot.1.saturating_add(member.points);
        if member.points > 0 {
            slot.2 = slot.2.saturating_add(1);
        }
    }

    let mut standings: Vec<NeighborhoodStanding> = totals
        .into_iter()
        .map(|(name, (county, total_points, active_members))| NeighborhoodStanding {
            neighborhood: name.to_owned(),
            county,
            total_points,
            active_members,
            rank: 0,
        })
        .collect();
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.neighborhood.cmp(&b.neighborhood))
    });
    for (index, standing) in standings.iter_mut().enumerate() {
        standing.rank = position_to_rank(index);
    }
    standings
}
