//! The async application: a [`Session`] behind a mutex, plus persistence,
//! the image judge, the witness board and open game rounds.
//!
//! Each mutating call holds the session lock from the mutation through the
//! rules pass to the save, so mutations never interleave. A failed save puts
//! the session back as it was before the call. The judge call in the
//! evidence path runs without the lock.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shamrock_progression::games::{sanctuary_reward, sanctuary_score};
use shamrock_progression::{AnswerFeedback, Catalog, FlipOutcome, QuestionView, ShopListing, TickOutcome};
use shamrock_store::{DragonflyStore, ProfileStore};
use shamrock_types::{
    ActionDefinition, ActionKind, Attachment, BadgeDefinition, ChatMessage, GameRoundId,
    LeaderRole, LeaderboardEntry, LeaderboardScope, MiniGame, NeighborhoodStanding, PeerProfile,
    ProfileId, RoomKey, RoomType, ShopItem, UserProfile, VerificationMethod, WitnessRequestId,
};
use shamrock_verify::{
    AttemptOutcome, EvidenceImage, JudgeBackend, NewWitnessRequest, VerificationAttempt,
    VerifyError, WitnessBoard, WitnessEvent, WitnessRequest, WitnessResolution, WitnessStatus,
    verify_evidence,
};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::chat;
use crate::config::{AppConfig, StoreConfig};
use crate::error::CoreError;
use crate::games::{GameRegistry, RoundStart};
use crate::registration::{ProfileUpdate, RegistrationForm};
use crate::seed::demo_peers;
use crate::session::{Progressed, Session};

/// Result of the evidence path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceResult {
    /// How the attempt ended.
    pub outcome: AttemptOutcome,
    /// Progression after the award, when the claim was verified.
    pub award: Option<Progressed<u64>>,
}

/// A posted witness request.
#[derive(Debug)]
pub struct WitnessClaim {
    /// The request as registered on the board.
    pub request: WitnessRequest,
    /// The chat message announcing it.
    pub message: ChatMessage,
    /// Resolves with the attempt's outcome once the request is confirmed,
    /// cancelled, or expires. Dropping it leaves the task running.
    pub completion: JoinHandle<AttemptOutcome>,
}

/// Result of answering a quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    /// Feedback on the answer.
    pub feedback: AnswerFeedback,
    /// The next question, if the round continues.
    pub next: Option<QuestionView>,
    /// Progression after the reward, once the round is finished.
    pub award: Option<Progressed<u64>>,
}

/// Result of flipping a memory card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipResult {
    /// What the flip revealed.
    pub outcome: FlipOutcome,
    /// Progression after the reward, once the board is cleared.
    pub award: Option<Progressed<u64>>,
}

/// Result of submitting a sanctuary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctuaryResult {
    /// Total biodiversity points.
    pub score: u64,
    /// Progression after the reward.
    pub award: Progressed<u64>,
}

/// Open the store the configuration asks for.
pub async fn open_store(config: &StoreConfig) -> Result<ProfileStore, CoreError> {
    match &config.dragonfly_url {
        Some(url) => Ok(ProfileStore::Dragonfly(
            DragonflyStore::connect(url, config.max_room_messages).await?,
        )),
        None => Ok(ProfileStore::in_memory(config.max_room_messages)),
    }
}

/// The running application.
pub struct App {
    session: Mutex<Session>,
    games: Mutex<GameRegistry>,
    store: ProfileStore,
    board: WitnessBoard,
    judge: JudgeBackend,
    profile_key: String,
    history_limit: usize,
}

impl App {
    /// Load (or create) the profile and peer pool and run a first rules pass.
    pub async fn open(config: &AppConfig, store: ProfileStore, judge: JudgeBackend) -> Result<Self, CoreError> {
        let now = Utc::now();
        let key = config.store.profile_key.clone();
        let profile = match store.load(&key).await? {
            Some(profile) => profile,
            None => {
                info!(key = %key, "No stored profile, creating a new one");
                UserProfile::new(now)
            }
        };

        let mut peers = store.load_peers().await?;
        if peers.is_empty() && config.store.seed_demo_peers {
            peers = demo_peers();
            store.save_peers(&peers).await?;
        }

        let mut session = Session::new(profile, peers, Catalog::default(), config.progression.clone());
        session.recompute(now);
        store.save(&key, session.profile()).await?;
        info!(
            profile_id = %session.profile().id,
            peers = session.peers().len(),
            store = store.name(),
            judge = judge.name(),
            "Session opened"
        );

        Ok(Self {
            session: Mutex::new(session),
            games: Mutex::new(GameRegistry::default()),
            store,
            board: WitnessBoard::new(config.verification.witness_expiry()),
            judge,
            profile_key: key,
            history_limit: config.store.history_limit,
        })
    }

    /// Name of the persistence backend.
    pub const fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Name of the image judge backend.
    pub const fn judge_name(&self) -> &'static str {
        self.judge.name()
    }

    /// Save the profile, restoring `before` into `session` if the save fails.
    async fn commit(&self, session: &mut Session, before: Session) -> Result<(), CoreError> {
        if let Err(e) = self.store.save(&self.profile_key, session.profile()).await {
            warn!(error = %e, profile_id = %session.profile().id, "Save failed, rolling back");
            *session = before;
            return Err(e.into());
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Profile and peers
    // -----------------------------------------------------------------------

    /// A snapshot of the profile.
    pub async fn profile(&self) -> UserProfile {
        self.session.lock().await.profile().clone()
    }

    /// Fill in registration details.
    pub async fn register(&self, form: RegistrationForm) -> Result<Progressed<()>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.register(form, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// Edit the registered profile.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Progressed<()>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.update_profile(update, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// The peer pool.
    pub async fn peers(&self) -> Vec<PeerProfile> {
        self.session.lock().await.peers().to_vec()
    }

    /// Replace the peer pool and re-derive progression.
    pub async fn set_peers(&self, peers: Vec<PeerProfile>) -> Result<Progressed<usize>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        self.store.save_peers(&peers).await?;
        let result = session.set_peers(peers, Utc::now());
        if let Err(e) = self.commit(&mut session, before).await {
            if let Err(restore) = self.store.save_peers(session.peers()).await {
                warn!(error = %restore, "Failed to restore the stored peer pool");
            }
            return Err(e);
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Catalog and shop
    // -----------------------------------------------------------------------

    /// The action catalog.
    pub async fn actions(&self) -> Vec<ActionDefinition> {
        self.session.lock().await.catalog().actions.clone()
    }

    /// The badge catalog.
    pub async fn badges(&self) -> Vec<BadgeDefinition> {
        self.session.lock().await.catalog().badges.clone()
    }

    /// Shop items with ownership and affordability.
    pub async fn shop(&self) -> Vec<ShopListing> {
        self.session.lock().await.shop_listings()
    }

    /// Add or replace a shop item.
    pub async fn add_shop_item(&self, item: ShopItem) -> Result<Progressed<()>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.add_shop_item(item, Utc::now());
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// Add or replace a badge definition.
    pub async fn add_badge(&self, badge: BadgeDefinition) -> Result<Progressed<()>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.add_badge(badge, Utc::now());
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// Buy a shop item.
    pub async fn purchase(&self, item_id: &str) -> Result<Progressed<ShopItem>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.purchase(item_id, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// Equip an unlocked avatar.
    pub async fn select_avatar(&self, icon: &str) -> Result<UserProfile, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        session.select_avatar(icon)?;
        self.commit(&mut session, before).await?;
        Ok(session.profile().clone())
    }

    /// Activate an unlocked theme, or clear it.
    pub async fn select_theme(&self, theme_id: Option<&str>) -> Result<UserProfile, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        session.select_theme(theme_id)?;
        self.commit(&mut session, before).await?;
        Ok(session.profile().clone())
    }

    // -----------------------------------------------------------------------
    // Leaderboards
    // -----------------------------------------------------------------------

    /// Ranked entries for `scope`.
    pub async fn leaderboard(&self, scope: Option<LeaderboardScope>) -> Vec<LeaderboardEntry> {
        self.session.lock().await.leaderboard(scope)
    }

    /// Neighborhoods ranked by combined points.
    pub async fn neighborhood_standings(&self) -> Vec<NeighborhoodStanding> {
        self.session.lock().await.neighborhood_standings()
    }

    // -----------------------------------------------------------------------
    // Missions
    // -----------------------------------------------------------------------

    /// Issue a team goal and announce it in the neighborhood room.
    pub async fn set_goal(&self, goal: &str) -> Result<ChatMessage, CoreError> {
        let now = Utc::now();
        let mut session = self.session.lock().await;
        let before = session.clone();
        session.set_goal(goal, now)?;
        self.commit(&mut session, before).await?;
        let text = session.profile().active_goal.clone().unwrap_or_default();
        let message = chat::goal_announcement(session.profile(), &text, now)?;
        self.store.append_message(&message).await?;
        Ok(message)
    }

    /// Tick the active goal.
    pub async fn tick_goal(&self, role: LeaderRole) -> Result<Progressed<TickOutcome>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.tick_goal(role, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    /// Earliest time a new goal may be set; `None` if none was ever set.
    pub async fn next_goal_available_at(&self) -> Option<DateTime<Utc>> {
        self.session.lock().await.next_goal_available_at()
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Rooms the user belongs to.
    pub async fn rooms(&self) -> Vec<RoomKey> {
        chat::rooms_of(self.session.lock().await.profile())
    }

    /// Recent messages in `room`, oldest first.
    pub async fn messages(&self, room: &RoomKey) -> Result<Vec<ChatMessage>, CoreError> {
        chat::ensure_member(self.session.lock().await.profile(), room)?;
        Ok(self.store.messages(room, self.history_limit).await?)
    }

    /// Post a message to `room`.
    pub async fn post_message(
        &self,
        room: RoomKey,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<ChatMessage, CoreError> {
        let message = {
            let session = self.session.lock().await;
            chat::ensure_member(session.profile(), &room)?;
            chat::compose(session.profile(), room, text, attachment, Utc::now())?
        };
        self.store.append_message(&message).await?;
        Ok(message)
    }

    // -----------------------------------------------------------------------
    // Games
    // -----------------------------------------------------------------------

    /// Start a quiz or memory round.
    pub async fn start_game(&self, game: MiniGame) -> Result<RoundStart, CoreError> {
        self.games.lock().await.start(game, Utc::now())
    }

    /// Answer the current question of a quiz round.
    pub async fn answer(&self, id: GameRoundId, response: &str) -> Result<AnswerResult, CoreError> {
        let (feedback, next) = self.games.lock().await.answer(id, response)?;
        let award = match feedback.reward {
            Some(points) => Some(self.award_game_points(points).await?),
            None => None,
        };
        Ok(AnswerResult { feedback, next, award })
    }

    /// Flip a card on a memory board.
    pub async fn flip(&self, id: GameRoundId, index: usize) -> Result<FlipResult, CoreError> {
        let outcome = self.games.lock().await.flip(id, index)?;
        let award = match &outcome {
            FlipOutcome::Matched {
                reward: Some(points), ..
            } => Some(self.award_game_points(*points).await?),
            _ => None,
        };
        Ok(FlipResult { outcome, award })
    }

    /// Face-up view of a memory board.
    pub async fn board(&self, id: GameRoundId) -> Result<Vec<Option<String>>, CoreError> {
        self.games.lock().await.board(id)
    }

    /// Score a sanctuary grid and credit the reward.
    pub async fn submit_sanctuary(&self, grid: &[Option<String>]) -> Result<SanctuaryResult, CoreError> {
        let score = sanctuary_score(grid)?;
        let award = self.award_game_points(sanctuary_reward(score)).await?;
        Ok(SanctuaryResult { score, award })
    }

    async fn award_game_points(&self, points: u64) -> Result<Progressed<u64>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.award_game_points(points, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Verification: evidence
    // -----------------------------------------------------------------------

    /// Judge a photo of a completed action and award on a positive verdict.
    ///
    /// The profile must be registered. A failed judge call is a rejected
    /// outcome, not an error.
    pub async fn verify_evidence(
        &self,
        action: ActionKind,
        quantity: Option<u64>,
        image: &EvidenceImage,
    ) -> Result<EvidenceResult, CoreError> {
        let catalog = {
            let session = self.session.lock().await;
            if !session.profile().is_registered() {
                return Err(CoreError::NotRegistered);
            }
            session.catalog().clone()
        };
        let mut attempt = VerificationAttempt::new(&catalog, action, quantity)?;
        let outcome = verify_evidence(&mut attempt, &catalog, &self.judge, image).await?;

        let award = match &outcome {
            AttemptOutcome::Verified { points, .. } => Some(self.award_action(action, *points).await?),
            _ => None,
        };
        Ok(EvidenceResult { outcome, award })
    }

    async fn award_action(&self, action: ActionKind, points: u64) -> Result<Progressed<u64>, CoreError> {
        let mut session = self.session.lock().await;
        let before = session.clone();
        let result = session.award_action(action, points, Utc::now())?;
        self.commit(&mut session, before).await?;
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Verification: witness
    // -----------------------------------------------------------------------

    /// Ask a room to witness a claim.
    ///
    /// Returns as soon as the request is posted. A background task awaits
    /// the resolution and awards the points on confirmation. `room`
    /// defaults to the user's neighborhood room.
    pub async fn request_witness(
        self: &Arc<Self>,
        action: ActionKind,
        quantity: Option<u64>,
        room: Option<RoomKey>,
    ) -> Result<WitnessClaim, CoreError> {
        let now = Utc::now();
        let (mut attempt, profile, title) = {
            let session = self.session.lock().await;
            let profile = session.profile().clone();
            if !profile.is_registered() {
                return Err(CoreError::NotRegistered);
            }
            let attempt = VerificationAttempt::new(session.catalog(), action, quantity)?;
            let title = session
                .catalog()
                .action(action)
                .map(|a| a.title.clone())
                .unwrap_or_else(|| action.to_string());
            (attempt, profile, title)
        };
        let room = room.unwrap_or_else(|| RoomKey::new(RoomType::Neighborhood, profile.neighborhood.as_str()));
        chat::ensure_member(&profile, &room)?;

        attempt.choose(VerificationMethod::Witness)?;
        attempt.submit()?;

        let (request, ticket) = self
            .board
            .post(
                NewWitnessRequest {
                    requester: profile.id,
                    requester_name: profile.name.clone(),
                    room: room.clone(),
                    action,
                    quantity,
                    points: attempt.points(),
                },
                now,
            )
            .await;
        let message = chat::witness_announcement(&profile, room, action, &title, request.id, now)?;
        self.store.append_message(&message).await?;
        self.board.attach_message(request.id, message.id).await?;

        let app = Arc::clone(self);
        let request_id = request.id;
        let announced = message.clone();
        let completion = tokio::spawn(async move {
            let resolution = match ticket.wait().await {
                WitnessResolution::Expired => app.settle_expiry(request_id).await,
                other => other,
            };
            app.finish_witness(attempt, resolution, &announced).await
        });

        Ok(WitnessClaim {
            request,
            message,
            completion,
        })
    }

    /// Mark a lapsed request expired, unless a confirmation raced the timer.
    async fn settle_expiry(&self, id: WitnessRequestId) -> WitnessResolution {
        match self.board.expire(id).await {
            Err(VerifyError::NotPending {
                status: WitnessStatus::Confirmed { by },
                ..
            }) => WitnessResolution::Confirmed { by },
            Err(VerifyError::NotPending {
                status: WitnessStatus::Cancelled,
                ..
            }) => WitnessResolution::Cancelled,
            _ => WitnessResolution::Expired,
        }
    }

    async fn finish_witness(
        &self,
        mut attempt: VerificationAttempt,
        resolution: WitnessResolution,
        message: &ChatMessage,
    ) -> AttemptOutcome {
        let outcome = match resolution {
            WitnessResolution::Confirmed { by } => {
                match self.award_action(attempt.action(), attempt.points()).await {
                    Ok(_) => {
                        if let Err(e) = self.store.mark_verified(&message.room, message.id).await {
                            warn!(error = %e, message_id = %message.id, "Failed to flag witness message");
                        }
                        AttemptOutcome::Verified {
                            points: attempt.points(),
                            message: "A neighbour vouched for you. Go raibh maith agat!".to_owned(),
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, confirmer = %by, "Failed to award witnessed action");
                        AttemptOutcome::Rejected {
                            message: format!("Confirmed, but the award could not be saved: {e}"),
                        }
                    }
                }
            }
            WitnessResolution::Cancelled => AttemptOutcome::Cancelled,
            WitnessResolution::Expired => AttemptOutcome::Expired,
        };

        let resolved = if outcome == AttemptOutcome::Cancelled {
            attempt.cancel().map(|_| ())
        } else {
            attempt.resolve(outcome.clone()).map(|_| ())
        };
        if let Err(e) = resolved {
            warn!(error = %e, attempt_id = %attempt.id(), "Witness attempt already resolved");
        }
        info!(
            attempt_id = %attempt.id(),
            action = %attempt.action(),
            outcome = ?outcome,
            "Witness claim settled"
        );
        outcome
    }

    /// Confirm a witness request on behalf of community member `confirmer`.
    pub async fn confirm_witness(
        &self,
        id: WitnessRequestId,
        confirmer: ProfileId,
    ) -> Result<WitnessRequest, CoreError> {
        let request = self
            .board
            .get(id)
            .await
            .ok_or(VerifyError::WitnessNotFound(id))?;
        {
            let session = self.session.lock().await;
            if confirmer != session.profile().id {
                let peer = session.peer(confirmer).ok_or(CoreError::UnknownPeer(confirmer))?;
                if !chat::peer_in_room(peer, &request.room, session.profile()) {
                    return Err(CoreError::NotARoomMember {
                        room: request.room.to_string(),
                    });
                }
            }
        }
        Ok(self.board.confirm(id, confirmer, &request.room).await?)
    }

    /// Withdraw one of the user's pending witness requests.
    pub async fn cancel_witness(&self, id: WitnessRequestId) -> Result<WitnessRequest, CoreError> {
        let request = self
            .board
            .get(id)
            .await
            .ok_or(VerifyError::WitnessNotFound(id))?;
        if request.requester != self.session.lock().await.profile().id {
            return Err(CoreError::NotRequester);
        }
        Ok(self.board.cancel(id).await?)
    }

    /// Current status of a witness request.
    pub async fn witness_status(&self, id: WitnessRequestId) -> Result<WitnessStatus, CoreError> {
        Ok(self
            .board
            .status(id)
            .await
            .ok_or(VerifyError::WitnessNotFound(id))?)
    }

    /// Pending requests in `room`.
    pub async fn pending_witnesses(&self, room: &RoomKey) -> Vec<WitnessRequest> {
        self.board.pending_in(room).await
    }

    /// Subscribe to witness board events.
    pub fn subscribe_witness(&self) -> broadcast::Receiver<WitnessEvent> {
        self.board.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use shamrock_progression::badge_ids;
    use shamrock_verify::JudgeBackendType;
    use shamrock_verify::judge::StubJudge;

    use super::*;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.store.seed_demo_peers = false;
        config.verification.judge.backend = JudgeBackendType::Disabled;
        config
    }

    fn form(neighborhood: &str) -> RegistrationForm {
        RegistrationForm {
            name: "Aoife".to_owned(),
            county: "Dublin".to_owned(),
            neighborhood: neighborhood.to_owned(),
            ..RegistrationForm::default()
        }
    }

    fn neighbor(name: &str) -> PeerProfile {
        PeerProfile {
            id: ProfileId::new(),
            name: name.to_owned(),
            county: "Dublin".to_owned(),
            neighborhood: "Dalkey, Dublin".to_owned(),
            avatar: "👤".to_owned(),
            points: 0,
            joined_date: Utc::now(),
            is_master: false,
        }
    }

    fn image() -> EvidenceImage {
        EvidenceImage {
            bytes: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".to_owned(),
        }
    }

    async fn open(judge: JudgeBackend) -> Arc<App> {
        let app = App::open(&config(), ProfileStore::in_memory(100), judge).await.unwrap();
        app.register(form("Dalkey, Dublin")).await.unwrap();
        Arc::new(app)
    }

    #[tokio::test]
    async fn profile_survives_reopen() {
        let memory = shamrock_store::MemoryStore::new(100);
        let app = App::open(&config(), ProfileStore::Memory(memory.clone()), JudgeBackend::Disabled)
            .await
            .unwrap();
        app.register(form("Dalkey, Dublin")).await.unwrap();
        let id = app.profile().await.id;

        let reopened = App::open(&config(), ProfileStore::Memory(memory), JudgeBackend::Disabled)
            .await
            .unwrap();
        assert_eq!(reopened.profile().await.id, id);
        assert_eq!(reopened.profile().await.name, "Aoife");
    }

    #[tokio::test]
    async fn demo_peers_seed_an_empty_pool() {
        let mut config = config();
        config.store.seed_demo_peers = true;
        let app = App::open(&config, ProfileStore::in_memory(10), JudgeBackend::Disabled)
            .await
            .unwrap();
        assert_eq!(app.peers().await.len(), demo_peers().len());
    }

    #[tokio::test]
    async fn first_rubbish_collection_on_a_fresh_install_earns_no_badges() {
        let mut config = config();
        config.store.seed_demo_peers = true;
        let app = App::open(&config, ProfileStore::in_memory(10), JudgeBackend::Stub(StubJudge::new()))
            .await
            .unwrap();
        app.register(form("The Liberties, Dublin")).await.unwrap();

        let result = app
            .verify_evidence(ActionKind::PickUpRubbish, None, &image())
            .await
            .unwrap();
        assert!(matches!(result.outcome, AttemptOutcome::Verified { points: 100, .. }));
        let profile = app.profile().await;
        assert_eq!(profile.total_shamrocks, 100);
        assert_eq!(profile.completed_actions, 1);
        assert!(profile.completed_action_types.contains(&ActionKind::PickUpRubbish));
        assert!(profile.rank.is_some_and(|rank| rank > 3));
        assert!(profile.badges.is_empty());
    }

    #[tokio::test]
    async fn unregistered_user_cannot_submit_evidence() {
        let app = App::open(&config(), ProfileStore::in_memory(10), JudgeBackend::Stub(StubJudge::new()))
            .await
            .unwrap();
        assert!(matches!(
            app.verify_evidence(ActionKind::PickUpRubbish, None, &image()).await,
            Err(CoreError::NotRegistered)
        ));
        assert_eq!(app.profile().await.total_shamrocks, 0);
    }

    #[tokio::test]
    async fn failed_save_rolls_back_the_award() {
        let memory = shamrock_store::MemoryStore::new(100);
        let app = App::open(&config(), ProfileStore::Memory(memory.clone()), JudgeBackend::Stub(StubJudge::new()))
            .await
            .unwrap();
        app.register(form("Dalkey, Dublin")).await.unwrap();
        let before = app.profile().await;

        memory.set_read_only(true);
        let err = app
            .verify_evidence(ActionKind::PickUpRubbish, None, &image())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Store(shamrock_store::StoreError::ReadOnly)));
        assert_eq!(app.profile().await, before);

        memory.set_read_only(false);
        app.verify_evidence(ActionKind::PickUpRubbish, None, &image())
            .await
            .unwrap();
        assert_eq!(app.profile().await.total_shamrocks, 100);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_old_peer_pool() {
        let memory = shamrock_store::MemoryStore::new(100);
        let app = App::open(&config(), ProfileStore::Memory(memory.clone()), JudgeBackend::Disabled)
            .await
            .unwrap();
        app.register(form("Dalkey, Dublin")).await.unwrap();
        memory.set_read_only(true);
        assert!(app.set_peers(vec![neighbor("Niamh")]).await.is_err());
        assert!(app.peers().await.is_empty());
        assert_eq!(app.profile().await.rank, Some(1));
    }

    #[tokio::test]
    async fn verified_evidence_awards_points() {
        let app = open(JudgeBackend::Stub(StubJudge::new())).await;
        let result = app
            .verify_evidence(ActionKind::PickUpRubbish, None, &image())
            .await
            .unwrap();
        assert!(matches!(result.outcome, AttemptOutcome::Verified { points: 100, .. }));
        let award = result.award.unwrap();
        assert_eq!(award.profile.total_shamrocks, 100);
        assert!(award.new_badges.contains(&badge_ids::RANK_1.to_owned()));
        assert_eq!(app.profile().await.completed_actions, 1);
    }

    #[tokio::test]
    async fn unavailable_judge_awards_nothing() {
        let app = open(JudgeBackend::Disabled).await;
        let result = app
            .verify_evidence(ActionKind::PlantATree, None, &image())
            .await
            .unwrap();
        assert!(matches!(result.outcome, AttemptOutcome::Rejected { .. }));
        assert!(result.award.is_none());
        assert_eq!(app.profile().await.total_shamrocks, 0);
    }

    #[tokio::test]
    async fn missing_quantity_is_rejected_before_judging() {
        let app = open(JudgeBackend::Stub(StubJudge::new())).await;
        let err = app
            .verify_evidence(ActionKind::DonateVolunteer, None, &image())
            .await
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[tokio::test]
    async fn witnessed_claim_awards_and_flags_message() {
        let app = open(JudgeBackend::Disabled).await;
        let siobhan = neighbor("Siobhán");
        app.set_peers(vec![siobhan.clone()]).await.unwrap();

        let claim = app
            .request_witness(ActionKind::DonateVolunteer, Some(40), None)
            .await
            .unwrap();
        assert_eq!(claim.request.points, 20);
        assert_eq!(claim.message.verification_action_id, Some(ActionKind::DonateVolunteer));

        app.confirm_witness(claim.request.id, siobhan.id).await.unwrap();
        let outcome = claim.completion.await.unwrap();
        assert!(matches!(outcome, AttemptOutcome::Verified { points: 20, .. }));
        assert_eq!(app.profile().await.total_shamrocks, 20);

        let room = RoomKey::new(RoomType::Neighborhood, "Dalkey, Dublin");
        let messages = app.messages(&room).await.unwrap();
        assert!(messages.iter().any(|m| m.id == claim.message.id && m.is_verified));
    }

    #[tokio::test]
    async fn confirmed_claim_that_cannot_be_saved_is_rejected_without_points() {
        let memory = shamrock_store::MemoryStore::new(100);
        let app = App::open(&config(), ProfileStore::Memory(memory.clone()), JudgeBackend::Disabled)
            .await
            .unwrap();
        app.register(form("Dalkey, Dublin")).await.unwrap();
        let app = Arc::new(app);
        let siobhan = neighbor("Siobhán");
        app.set_peers(vec![siobhan.clone()]).await.unwrap();
        let claim = app.request_witness(ActionKind::Recycle, None, None).await.unwrap();

        memory.set_read_only(true);
        app.confirm_witness(claim.request.id, siobhan.id).await.unwrap();
        let outcome = claim.completion.await.unwrap();
        assert!(matches!(outcome, AttemptOutcome::Rejected { .. }));
        let profile = app.profile().await;
        assert_eq!(profile.total_shamrocks, 0);
        assert_eq!(profile.completed_actions, 0);
    }

    #[tokio::test]
    async fn requester_cannot_confirm_own_claim() {
        let app = open(JudgeBackend::Disabled).await;
        let me = app.profile().await.id;
        let claim = app.request_witness(ActionKind::Recycle, None, None).await.unwrap();
        let err = app.confirm_witness(claim.request.id, me).await.unwrap_err();
        assert!(matches!(err, CoreError::Verify(VerifyError::SelfConfirmation)));
    }

    #[tokio::test]
    async fn outsider_cannot_confirm() {
        let app = open(JudgeBackend::Disabled).await;
        let mut outsider = neighbor("Cillian");
        outsider.neighborhood = "Galway City Centre".to_owned();
        app.set_peers(vec![outsider.clone()]).await.unwrap();
        let claim = app.request_witness(ActionKind::Recycle, None, None).await.unwrap();
        assert!(matches!(
            app.confirm_witness(claim.request.id, outsider.id).await,
            Err(CoreError::NotARoomMember { .. })
        ));
        assert!(matches!(
            app.confirm_witness(claim.request.id, ProfileId::new()).await,
            Err(CoreError::UnknownPeer(_))
        ));
    }

    #[tokio::test]
    async fn cancelled_claim_awards_nothing() {
        let app = open(JudgeBackend::Disabled).await;
        let claim = app.request_witness(ActionKind::Recycle, None, None).await.unwrap();
        app.cancel_witness(claim.request.id).await.unwrap();
        assert_eq!(claim.completion.await.unwrap(), AttemptOutcome::Cancelled);
        assert_eq!(app.profile().await.total_shamrocks, 0);
        assert_eq!(
            app.witness_status(claim.request.id).await.unwrap(),
            WitnessStatus::Cancelled
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_claim_expires() {
        let app = open(JudgeBackend::Disabled).await;
        let claim = app.request_witness(ActionKind::Recycle, None, None).await.unwrap();
        tokio::time::advance(Duration::from_secs(24 * 3600 + 1)).await;
        assert_eq!(claim.completion.await.unwrap(), AttemptOutcome::Expired);
        assert_eq!(
            app.witness_status(claim.request.id).await.unwrap(),
            WitnessStatus::Expired
        );
    }

    #[tokio::test]
    async fn unregistered_user_cannot_request_witness() {
        let app = App::open(&config(), ProfileStore::in_memory(10), JudgeBackend::Disabled)
            .await
            .unwrap();
        let app = Arc::new(app);
        assert!(matches!(
            app.request_witness(ActionKind::Recycle, None, None).await,
            Err(CoreError::NotRegistered)
        ));
    }

    #[tokio::test]
    async fn goal_is_announced_in_chat() {
        let app = open(JudgeBackend::Disabled).await;
        let message = app.set_goal("  Clean Bulloch Harbour ").await.unwrap();
        assert!(message.is_goal);
        assert!(message.text.contains("Clean Bulloch Harbour"));
    }

    #[tokio::test]
    async fn chat_post_rejects_empty_and_foreign_rooms() {
        let app = open(JudgeBackend::Disabled).await;
        let home = RoomKey::new(RoomType::Neighborhood, "Dalkey, Dublin");
        assert!(matches!(
            app.post_message(home.clone(), "   ", None).await,
            Err(CoreError::EmptyMessage)
        ));
        let away = RoomKey::new(RoomType::Neighborhood, "Killarney Town");
        assert!(matches!(
            app.post_message(away, "hi", None).await,
            Err(CoreError::NotARoomMember { .. })
        ));
        app.post_message(home.clone(), " Dia dhuit ", None).await.unwrap();
        assert_eq!(app.messages(&home).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sanctuary_rewards_game_points_only() {
        let app = open(JudgeBackend::Disabled).await;
        let mut grid = vec![None; 25];
        if let Some(cell) = grid.first_mut() {
            *cell = Some("deer".to_owned());
        }
        if let Some(cell) = grid.get_mut(1) {
            *cell = Some("fox".to_owned());
        }
        let result = app.submit_sanctuary(&grid).await.unwrap();
        assert_eq!(result.score, 220);
        assert_eq!(result.award.value, 9);
        let profile = app.profile().await;
        assert_eq!(profile.total_shamrocks, 9);
        assert_eq!(profile.completed_actions, 0);
    }
}
