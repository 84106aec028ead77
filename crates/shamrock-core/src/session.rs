//! The local user's session: profile, peers, catalog and rules.
//!
//! Every mutation goes through a method here and is followed by one rules
//! engine pass, so rank, badges, avatar unlocks, mastery and leadership are
//! always consistent with the inputs that changed. Nothing in this module
//! does I/O; the async [`App`](crate::App) persists after each call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shamrock_progression::{
    Catalog, ProgressionConfig, ProgressionDelta, ShopListing, TickOutcome, derive_progression,
    leaderboard, mission, shop, wallet,
};
use shamrock_types::{
    ActionKind, BadgeDefinition, LeaderRole, LeaderboardEntry, LeaderboardScope,
    NeighborhoodStanding, PeerProfile, ProfileId, ShopItem, UserProfile,
};
use tracing::{debug, info};
use validator::Validate;

use crate::error::CoreError;
use crate::registration::{ProfileUpdate, RegistrationForm};

/// A mutation's result together with the progression it triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progressed<T> {
    /// What the operation produced.
    pub value: T,
    /// Badges earned by the follow-up rules pass.
    pub new_badges: Vec<String>,
    /// Avatars unlocked by the follow-up rules pass.
    pub new_avatars: Vec<String>,
    /// The profile after the pass.
    pub profile: UserProfile,
}

impl<T> Progressed<T> {
    fn new(value: T, delta: &ProgressionDelta, profile: &UserProfile) -> Self {
        Self {
            value,
            new_badges: delta.new_badges.iter().cloned().collect(),
            new_avatars: delta.new_avatars.iter().cloned().collect(),
            profile: profile.clone(),
        }
    }

    /// Swap the carried value, keeping the progression.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Progressed<U> {
        Progressed {
            value: f(self.value),
            new_badges: self.new_badges,
            new_avatars: self.new_avatars,
            profile: self.profile,
        }
    }
}

/// In-memory state for one user.
#[derive(Debug, Clone)]
pub struct Session {
    profile: UserProfile,
    peers: Vec<PeerProfile>,
    catalog: Catalog,
    config: ProgressionConfig,
}

impl Session {
    /// Wrap a loaded profile. Call [`recompute`](Self::recompute) before use.
    pub fn new(
        profile: UserProfile,
        peers: Vec<PeerProfile>,
        catalog: Catalog,
        config: ProgressionConfig,
    ) -> Self {
        Self {
            profile,
            peers,
            catalog,
            config,
        }
    }

    /// The profile.
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Peers the session ranks against.
    pub fn peers(&self) -> &[PeerProfile] {
        &self.peers
    }

    /// The catalogs.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Progression settings.
    pub const fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Run one rules-engine pass and apply it.
    ///
    /// Returns the applied delta. An empty delta means nothing changed and
    /// nothing needs saving.
    pub fn recompute(&mut self, now: DateTime<Utc>) -> ProgressionDelta {
        let delta = derive_progression(&self.profile, &self.peers, &self.catalog, &self.config, now);
        if delta.apply(&mut self.profile) {
            debug!(profile_id = %self.profile.id, "Applied progression delta");
        }
        delta
    }

    fn progressed<T>(&mut self, value: T, now: DateTime<Utc>) -> Progressed<T> {
        let delta = self.recompute(now);
        Progressed::new(value, &delta, &self.profile)
    }

    fn ensure_registered(&self) -> Result<(), CoreError> {
        if self.profile.is_registered() {
            Ok(())
        } else {
            Err(CoreError::NotRegistered)
        }
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    /// Fill in registration details.
    pub fn register(
        &mut self,
        form: RegistrationForm,
        now: DateTime<Utc>,
    ) -> Result<Progressed<()>, CoreError> {
        if self.profile.is_registered() {
            return Err(CoreError::AlreadyRegistered);
        }
        let form = form.normalized();
        form.validate()?;
        form.apply(&mut self.profile);
        info!(
            profile_id = %self.profile.id,
            neighborhood = %self.profile.neighborhood,
            "Profile registered"
        );
        Ok(self.progressed((), now))
    }

    /// Edit name, street, groups or bio.
    pub fn update_profile(
        &mut self,
        update: ProfileUpdate,
        now: DateTime<Utc>,
    ) -> Result<Progressed<()>, CoreError> {
        self.ensure_registered()?;
        let update = update.normalized();
        update.validate()?;
        update.apply(&mut self.profile);
        Ok(self.progressed((), now))
    }

    /// Replace the peer pool.
    pub fn set_peers(&mut self, peers: Vec<PeerProfile>, now: DateTime<Utc>) -> Progressed<usize> {
        let count = peers.len();
        self.peers = peers;
        self.progressed(count, now)
    }

    /// Look up a peer by id.
    pub fn peer(&self, id: ProfileId) -> Option<&PeerProfile> {
        self.peers.iter().find(|p| p.id == id)
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Add or replace a shop item. Mastery is re-evaluated.
    pub fn add_shop_item(&mut self, item: ShopItem, now: DateTime<Utc>) -> Progressed<()> {
        self.catalog.add_shop_item(item);
        self.progressed((), now)
    }

    /// Add or replace a badge definition. Mastery is re-evaluated.
    pub fn add_badge(&mut self, badge: BadgeDefinition, now: DateTime<Utc>) -> Progressed<()> {
        self.catalog.add_badge(badge);
        self.progressed((), now)
    }

    // -----------------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------------

    /// Credit a verified action. Only registered profiles earn action points.
    pub fn award_action(
        &mut self,
        kind: ActionKind,
        points: u64,
        now: DateTime<Utc>,
    ) -> Result<Progressed<u64>, CoreError> {
        self.ensure_registered()?;
        wallet::award_action(&mut self.profile, kind, points)?;
        Ok(self.progressed(points, now))
    }

    /// Credit mini-game points.
    pub fn award_game_points(&mut self, points: u64, now: DateTime<Utc>) -> Result<Progressed<u64>, CoreError> {
        wallet::award_game_points(&mut self.profile, points)?;
        Ok(self.progressed(points, now))
    }

    // -----------------------------------------------------------------------
    // Shop
    // -----------------------------------------------------------------------

    /// Shop items with ownership and affordability.
    pub fn shop_listings(&self) -> Vec<ShopListing> {
        shop::listings(&self.profile, &self.catalog)
    }

    /// Buy an item.
    pub fn purchase(&mut self, item_id: &str, now: DateTime<Utc>) -> Result<Progressed<ShopItem>, CoreError> {
        let item = shop::purchase(&mut self.profile, &self.catalog, item_id)?;
        Ok(self.progressed(item, now))
    }

    /// Equip an unlocked avatar.
    pub fn select_avatar(&mut self, icon: &str) -> Result<(), CoreError> {
        Ok(shop::select_avatar(&mut self.profile, icon)?)
    }

    /// Activate an unlocked theme, or clear the theme with `None`.
    pub fn select_theme(&mut self, theme_id: Option<&str>) -> Result<(), CoreError> {
        Ok(shop::select_theme(&mut self.profile, theme_id)?)
    }

    // -----------------------------------------------------------------------
    // Missions
    // -----------------------------------------------------------------------

    /// Issue a team goal (captain only).
    pub fn set_goal(&mut self, goal: &str, now: DateTime<Utc>) -> Result<(), CoreError> {
        Ok(mission::set_goal(&mut self.profile, goal, &self.config, now)?)
    }

    /// Tick the active goal for `role`.
    ///
    /// The caller must hold a leadership role. Each role's tick is
    /// accepted once per goal.
    pub fn tick_goal(&mut self, role: LeaderRole, now: DateTime<Utc>) -> Result<Progressed<TickOutcome>, CoreError> {
        if !(self.profile.is_captain || self.profile.is_assistant_captain) {
            return Err(CoreError::NotALeader);
        }
        let outcome = mission::tick_goal(&mut self.profile, role, &self.config)?;
        Ok(self.progressed(outcome, now))
    }

    /// When the next goal may be set.
    pub fn next_goal_available_at(&self) -> Option<DateTime<Utc>> {
        mission::next_goal_available_at(&self.profile, &self.config)
    }

    // -----------------------------------------------------------------------
    // Leaderboards
    // -----------------------------------------------------------------------

    /// Ranked entries for `scope` (the configured scope when `None`).
    pub fn leaderboard(&self, scope: Option<LeaderboardScope>) -> Vec<LeaderboardEntry> {
        let scope = scope.unwrap_or(self.config.leaderboard_scope);
        leaderboard::build_leaderboard(&self.profile, &self.peers, scope)
    }

    /// Neighborhoods ranked by combined points, the user included.
    pub fn neighborhood_standings(&self) -> Vec<NeighborhoodStanding> {
        let mut members: Vec<PeerProfile> = self
            .peers
            .iter()
            .filter(|p| p.id != self.profile.id)
            .cloned()
            .collect();
        if self.profile.is_registered() {
            members.push(self.profile.as_peer());
        }
        leaderboard::neighborhood_standings(&members)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use shamrock_progression::{ProgressionError, badge_ids};
    use shamrock_types::ShopItemType;

    use super::*;

    fn form(neighborhood: &str) -> RegistrationForm {
        RegistrationForm {
            name: "Aoife".to_owned(),
            county: "Dublin".to_owned(),
            neighborhood: neighborhood.to_owned(),
            ..RegistrationForm::default()
        }
    }

    fn peer(name: &str, neighborhood: &str, points: u64, joined: DateTime<Utc>) -> PeerProfile {
        PeerProfile {
            id: ProfileId::new(),
            name: name.to_owned(),
            county: "Dublin".to_owned(),
            neighborhood: neighborhood.to_owned(),
            avatar: "👤".to_owned(),
            points,
            joined_date: joined,
            is_master: false,
        }
    }

    fn session(peers: Vec<PeerProfile>) -> Session {
        let now = Utc::now();
        let mut s = Session::new(UserProfile::new(now), peers, Catalog::default(), ProgressionConfig::default());
        s.register(form("Dalkey, Dublin"), now).unwrap();
        s
    }

    #[test]
    fn unregistered_profile_cannot_edit() {
        let mut s = Session::new(
            UserProfile::default(),
            Vec::new(),
            Catalog::default(),
            ProgressionConfig::default(),
        );
        assert!(matches!(
            s.update_profile(ProfileUpdate::default(), Utc::now()),
            Err(CoreError::NotRegistered)
        ));
        assert!(s.profile().rank.is_none());
    }

    #[test]
    fn registering_twice_is_rejected() {
        let mut s = session(Vec::new());
        assert!(matches!(
            s.register(form("Dalkey, Dublin"), Utc::now()),
            Err(CoreError::AlreadyRegistered)
        ));
    }

    #[test]
    fn invalid_form_changes_nothing() {
        let mut s = Session::new(
            UserProfile::default(),
            Vec::new(),
            Catalog::default(),
            ProgressionConfig::default(),
        );
        assert!(matches!(s.register(form("   "), Utc::now()), Err(CoreError::Validation(_))));
        assert!(!s.profile().is_registered());
    }

    #[test]
    fn sole_member_becomes_captain_with_rank_one() {
        let s = session(Vec::new());
        assert!(s.profile().is_captain);
        assert!(!s.profile().is_assistant_captain);
        assert_eq!(s.profile().rank, Some(1));
    }

    #[test]
    fn rubbish_collection_behind_established_neighbors_earns_no_badges() {
        let earlier = Utc::now() - Duration::days(90);
        let mut s = session(vec![
            peer("Niamh", "Dalkey, Dublin", 7_900, earlier),
            peer("Declan", "Dalkey, Dublin", 6_100, earlier),
            peer("Fionn", "Dalkey, Dublin", 3_400, earlier),
        ]);
        let result = s.award_action(ActionKind::PickUpRubbish, 100, Utc::now()).unwrap();
        let profile = s.profile();
        assert_eq!(profile.total_shamrocks, 100);
        assert_eq!(profile.completed_actions, 1);
        assert!(profile.completed_action_types.contains(&ActionKind::PickUpRubbish));
        assert_eq!(profile.rank, Some(4));
        assert!(profile.badges.is_empty());
        assert!(result.new_badges.is_empty());
    }

    #[test]
    fn unregistered_profile_earns_no_action_points() {
        let mut s = Session::new(
            UserProfile::default(),
            Vec::new(),
            Catalog::default(),
            ProgressionConfig::default(),
        );
        assert!(matches!(
            s.award_action(ActionKind::PickUpRubbish, 100, Utc::now()),
            Err(CoreError::NotRegistered)
        ));
        assert_eq!(s.profile().total_shamrocks, 0);
        assert_eq!(s.profile().completed_actions, 0);
    }

    #[test]
    fn rubbish_collection_as_sole_member_takes_first_place() {
        let mut s = session(Vec::new());
        let result = s.award_action(ActionKind::PickUpRubbish, 100, Utc::now()).unwrap();
        let profile = s.profile();
        assert_eq!(profile.total_shamrocks, 100);
        assert_eq!(profile.completed_actions, 1);
        assert!(profile.completed_action_types.contains(&ActionKind::PickUpRubbish));
        assert!(profile.badges.contains(badge_ids::RANK_1));
        assert!(profile.badges.contains(badge_ids::EMERALD_GUARDIAN));
        assert!(result.new_badges.contains(&badge_ids::RANK_1.to_owned()));
        assert!(profile.unlocked_avatars.contains("🥇"));
        assert!(profile.unlocked_avatars.contains("💎"));
    }

    #[test]
    fn second_joiner_is_assistant() {
        let earlier = Utc::now() - Duration::days(30);
        let s = session(vec![peer("Siobhán", "Dalkey, Dublin", 500, earlier)]);
        assert!(!s.profile().is_captain);
        assert!(s.profile().is_assistant_captain);
        assert_eq!(s.profile().rank, Some(2));
    }

    #[test]
    fn peer_change_moves_rank_but_keeps_badges() {
        let mut s = session(Vec::new());
        s.award_action(ActionKind::Recycle, 200, Utc::now()).unwrap();
        assert!(s.profile().badges.contains(badge_ids::RANK_1));

        let earlier = Utc::now() - Duration::days(400);
        s.set_peers(vec![peer("Patrick", "Dalkey, Dublin", 15_400, earlier)], Utc::now());
        assert_eq!(s.profile().rank, Some(2));
        assert!(s.profile().badges.contains(badge_ids::RANK_1));
        assert!(s.profile().badges.contains(badge_ids::RANK_2));
        assert!(!s.profile().is_captain);
    }

    #[test]
    fn purchase_failure_leaves_profile_untouched() {
        let mut s = session(Vec::new());
        let before = s.profile().clone();
        assert!(matches!(
            s.purchase("av2", Utc::now()),
            Err(CoreError::Progression(ProgressionError::InsufficientShamrocks { .. }))
        ));
        assert_eq!(s.profile(), &before);
    }

    #[test]
    fn purchase_equips_avatar() {
        let mut s = session(Vec::new());
        s.award_game_points(600, Utc::now()).unwrap();
        let bought = s.purchase("av1", Utc::now()).unwrap();
        assert_eq!(bought.value.icon, "🦊");
        assert_eq!(s.profile().avatar, "🦊");
        assert_eq!(s.profile().total_shamrocks, 100);
        assert_eq!(s.profile().completed_actions, 0);
    }

    #[test]
    fn catalog_growth_revokes_mastery_flag_not_items() {
        let mut s = session(Vec::new());
        s.add_shop_item(
            ShopItem {
                id: "av9".to_owned(),
                name: "Otter".to_owned(),
                icon: "🦦".to_owned(),
                cost: 10,
                item_type: ShopItemType::Avatar,
                earned_only: false,
                theme_config: None,
            },
            Utc::now(),
        );
        assert!(!s.profile().is_master);
        assert!(s.shop_listings().iter().any(|l| l.item.id == "av9" && !l.owned));
    }

    #[test]
    fn mission_needs_a_leader() {
        let earlier = Utc::now() - Duration::days(30);
        let mut s = session(vec![
            peer("Patrick", "Dalkey, Dublin", 500, earlier),
            peer("Siobhán", "Dalkey, Dublin", 400, earlier + Duration::days(1)),
        ]);
        assert!(matches!(
            s.tick_goal(LeaderRole::Captain, Utc::now()),
            Err(CoreError::NotALeader)
        ));
        assert!(matches!(
            s.set_goal("Clean the beach", Utc::now()),
            Err(CoreError::Progression(ProgressionError::NotCaptain))
        ));
    }

    #[test]
    fn mission_completes_after_both_ticks() {
        let mut s = session(Vec::new());
        let now = Utc::now();
        s.set_goal("Clean Bulloch Harbour", now).unwrap();
        assert_eq!(
            s.tick_goal(LeaderRole::Captain, now).unwrap().value,
            TickOutcome::Waiting
        );
        assert_eq!(
            s.tick_goal(LeaderRole::Assistant, now).unwrap().value,
            TickOutcome::Completed { golden_reward: 1 }
        );
        assert_eq!(s.profile().golden_shamrocks, 1);
        assert!(s.profile().active_goal.is_none());
        assert_eq!(s.next_goal_available_at(), Some(now + Duration::days(7)));
    }

    #[test]
    fn standings_include_the_user() {
        let earlier = Utc::now() - Duration::days(30);
        let mut s = session(vec![peer("Patrick", "The Liberties, Dublin", 300, earlier)]);
        s.award_action(ActionKind::PlantATree, 1000, Utc::now()).unwrap();
        let standings = s.neighborhood_standings();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings.first().unwrap().neighborhood, "Dalkey, Dublin");
        assert_eq!(standings.first().unwrap().rank, 1);
    }
}
