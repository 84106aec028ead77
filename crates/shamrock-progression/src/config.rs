//! Tunable thresholds for progression rules and team missions.
//!
//! The server reads these from the `progression` section of
//! `help-ireland.yaml`. Every field has a default, so an empty section
//! (or none at all) yields the values the badge descriptions promise.

use serde::Deserialize;
use shamrock_types::LeaderboardScope;

/// Configuration for the rules engine, missions and leaderboards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Geographic grouping the rank badges are computed over (default: neighborhood).
    pub leaderboard_scope: LeaderboardScope,

    /// Completed actions needed for Sustainability Sage (default: 50).
    pub sage_actions: u64,

    /// Completed actions needed for the 100 Club (default: 100).
    pub century_actions: u64,

    /// Shamrock total needed for Shamrock Tycoon (default: 50000).
    pub tycoon_shamrocks: u64,

    /// Golden shamrocks paid out when a team goal completes (default: 1).
    pub mission_golden_reward: u64,

    /// Days that must pass between two team goals (default: 7).
    pub mission_cooldown_days: i64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            leaderboard_scope: LeaderboardScope::Neighborhood,
            sage_actions: 50,
            century_actions: 100,
            tycoon_shamrocks: 50_000,
            mission_golden_reward: 1,
            mission_cooldown_days: 7,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = ProgressionConfig::default();
        assert_eq!(cfg.leaderboard_scope, LeaderboardScope::Neighborhood);
        assert_eq!(cfg.sage_actions, 50);
        assert_eq!(cfg.century_actions, 100);
        assert_eq!(cfg.tycoon_shamrocks, 50_000);
        assert_eq!(cfg.mission_golden_reward, 1);
        assert_eq!(cfg.mission_cooldown_days, 7);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: ProgressionConfig =
            serde_json::from_str(r#"{"leaderboard_scope": "county", "sage_actions": 10}"#)
                .unwrap();
        assert_eq!(cfg.leaderboard_scope, LeaderboardScope::County);
        assert_eq!(cfg.sage_actions, 10);
        assert_eq!(cfg.century_actions, 100);
    }
}
