//! The progression rules engine.
//!
//! [`derive_progression`] is a pure function from the current profile, its
//! peers, the catalog and the clock to a [`ProgressionDelta`]. The session
//! applies the delta after every mutation and persists only when the delta
//! is non-empty, so a recompute never triggers another recompute.
//!
//! Rule order matters:
//!
//! 1. Rank, from the leaderboard ranker.
//! 2. Badges: rank ribbons, volume, completionist, oak planter, tenure.
//! 3. Cosmetic cascade: every held badge's icon becomes an avatar.
//! 4. Mastery, judged on the state *after* steps 2 and 3.
//! 5. Leadership, which depends on mastery.
//!
//! Badges and unlocked avatars only ever grow. Mastery and leadership flags
//! are recomputed from scratch and may be retracted.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use shamrock_types::{PeerProfile, UserProfile};
use tracing::debug;

use crate::catalog::{Catalog, badge_ids};
use crate::config::ProgressionConfig;
use crate::leaderboard;

/// Seconds in a tenure year (365.25 days).
pub const SECONDS_PER_YEAR: i64 = 31_557_600;

/// Tenure thresholds in whole years and the badge each one awards.
const TENURE_BADGES: [(i64, &str); 3] = [
    (1, badge_ids::VETERAN_1Y),
    (5, badge_ids::VETERAN_5Y),
    (10, badge_ids::VETERAN_10Y),
];

/// A change of leaderboard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    /// Position before the pass.
    pub from: Option<u32>,
    /// Position after the pass.
    pub to: Option<u32>,
}

/// Recomputed mastery and leadership flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadershipFlags {
    /// Holds every cosmetic and badge.
    pub is_master: bool,
    /// Neighborhood captain.
    pub is_captain: bool,
    /// Neighborhood assistant captain.
    pub is_assistant_captain: bool,
}

impl LeadershipFlags {
    fn of(profile: &UserProfile) -> Self {
        Self {
            is_master: profile.is_master,
            is_captain: profile.is_captain,
            is_assistant_captain: profile.is_assistant_captain,
        }
    }
}

/// Everything one rules-engine pass would change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressionDelta {
    /// New rank, if it differs.
    pub rank: Option<RankChange>,
    /// Badges not yet held.
    pub new_badges: BTreeSet<String>,
    /// Avatar icons not yet unlocked.
    pub new_avatars: BTreeSet<String>,
    /// New flags, if any of them differ.
    pub leadership: Option<LeadershipFlags>,
}

impl ProgressionDelta {
    /// Whether the pass found nothing to change.
    pub fn is_empty(&self) -> bool {
        self.rank.is_none()
            && self.new_badges.is_empty()
            && self.new_avatars.is_empty()
            && self.leadership.is_none()
    }

    /// Apply the delta to `profile`. Returns whether anything changed.
    pub fn apply(&self, profile: &mut UserProfile) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Some(change) = self.rank {
            profile.rank = change.to;
        }
        profile.badges.extend(self.new_badges.iter().cloned());
        profile
            .unlocked_avatars
            .extend(self.new_avatars.iter().cloned());
        if let Some(flags) = self.leadership {
            profile.is_master = flags.is_master;
            profile.is_captain = flags.is_captain;
            profile.is_assistant_captain = flags.is_assistant_captain;
        }
        true
    }
}

/// Run one rules-engine pass.
///
/// Never fails. An unregistered profile has no rank and earns no rank
/// ribbons; the other rules still apply.
pub fn derive_progression(
    profile: &UserProfile,
    peers: &[PeerProfile],
    catalog: &Catalog,
    config: &ProgressionConfig,
    now: DateTime<Utc>,
) -> ProgressionDelta {
    let rank = profile
        .is_registered()
        .then(|| leaderboard::rank_of(profile, peers, config.leaderboard_scope));

    let earned = earned_badges(profile, rank, catalog, config, now);
    let new_badges: BTreeSet<String> = earned.difference(&profile.badges).cloned().collect();

    let held_badges: BTreeSet<&String> = profile.badges.iter().chain(&new_badges).collect();
    let new_avatars: BTreeSet<String> = held_badges
        .iter()
        .filter_map(|id| catalog.badge(id))
        .map(|b| b.icon.clone())
        .filter(|icon| !profile.unlocked_avatars.contains(icon))
        .collect();

    let is_master = has_mastery(profile, &held_badges, &new_avatars, catalog);
    let prior = prior_neighbors(profile, peers);
    let registered = profile.is_registered();
    let is_captain = is_master || (registered && prior == 0);
    let flags = LeadershipFlags {
        is_master,
        is_captain,
        is_assistant_captain: !is_captain && registered && prior == 1,
    };

    let delta = ProgressionDelta {
        rank: (rank != profile.rank).then_some(RankChange {
            from: profile.rank,
            to: rank,
        }),
        new_badges,
        new_avatars,
        leadership: (flags != LeadershipFlags::of(profile)).then_some(flags),
    };
    if !delta.is_empty() {
        debug!(
            profile_id = %profile.id,
            rank = ?rank,
            new_badges = delta.new_badges.len(),
            new_avatars = delta.new_avatars.len(),
            is_master = flags.is_master,
            is_captain = flags.is_captain,
            "Progression changed"
        );
    }
    delta
}

/// Every badge the profile qualifies for right now.
fn earned_badges(
    profile: &UserProfile,
    rank: Option<u32>,
    catalog: &Catalog,
    config: &ProgressionConfig,
    now: DateTime<Utc>,
) -> BTreeSet<String> {
    let mut earned = BTreeSet::new();
    let mut award = |id: &str| {
        earned.insert(id.to_owned());
    };

    if profile.total_shamrocks > 0 {
        match rank {
            Some(1) => {
                award(badge_ids::RANK_1);
                award(badge_ids::EMERALD_GUARDIAN);
            }
            Some(2) => award(badge_ids::RANK_2),
            Some(3) => award(badge_ids::RANK_3),
            _ => {}
        }
    }

    if profile.completed_actions >= config.sage_actions {
        award(badge_ids::SUSTAINABILITY_SAGE);
    }
    if profile.completed_actions >= config.century_actions {
        award(badge_ids::CLUB_100);
    }
    if profile.total_shamrocks >= config.tycoon_shamrocks {
        award(badge_ids::SHAMROCK_TYCOON);
    }

    let kinds = catalog.distinct_action_kinds();
    if kinds > 0 && profile.completed_action_types.len() >= kinds {
        award(badge_ids::SUPREME_WILDLIFE_GUARDIAN);
    }
    if profile
        .completed_action_types
        .contains(&shamrock_types::ActionKind::PlantATree)
    {
        award(badge_ids::OAK_PLANTER);
    }

    let years = tenure_years(profile.joined_date, now);
    for (threshold, id) in TENURE_BADGES {
        if years >= threshold {
            award(id);
        }
    }

    earned
}

/// Whole tenure years between `joined` and `now`. Zero if `joined` is in
/// the future.
pub fn tenure_years(joined: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(joined)
        .num_seconds()
        .max(0)
        .checked_div(SECONDS_PER_YEAR)
        .unwrap_or(0)
}

/// Mastery over the projected state: held avatars plus `new_avatars`,
/// held badges plus the badges earned this pass.
fn has_mastery(
    profile: &UserProfile,
    held_badges: &BTreeSet<&String>,
    new_avatars: &BTreeSet<String>,
    catalog: &Catalog,
) -> bool {
    let all_avatars = catalog
        .purchasable_avatars()
        .all(|item| profile.unlocked_avatars.contains(&item.icon) || new_avatars.contains(&item.icon));
    let all_themes = catalog
        .themes()
        .all(|item| profile.unlocked_themes.contains(&item.id));
    let all_badges = catalog.badges.iter().all(|b| held_badges.contains(&b.id));
    all_avatars && all_themes && all_badges
}

/// Peers in the same neighborhood who joined before the profile. Equal
/// join instants are ordered by id.
fn prior_neighbors(profile: &UserProfile, peers: &[PeerProfile]) -> usize {
    if profile.neighborhood.is_empty() {
        return 0;
    }
    peers
        .iter()
        .filter(|p| p.id != profile.id && p.neighborhood == profile.neighborhood)
        .filter(|p| (p.joined_date, p.id) < (profile.joined_date, profile.id))
        .count()
}
