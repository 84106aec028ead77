//! Static catalogs: rewardable actions, badges, and shop items.
//!
//! The default [`Catalog`] is the Help Ireland launch catalog. It is an
//! owned value rather than a set of constants because the shop grows over
//! the lifetime of the app, and mastery has to be judged against whatever
//! the catalog holds right now.

use std::collections::BTreeSet;

use shamrock_types::{
    ActionDefinition, ActionKind, ActionReward, BadgeDefinition, ShopItem, ShopItemType,
    ThemeConfig,
};

use crate::error::ProgressionError;

/// Well-known badge ids awarded by the rules engine.
pub mod badge_ids {
    /// First place on the leaderboard.
    pub const RANK_1: &str = "rank1";
    /// Second place on the leaderboard.
    pub const RANK_2: &str = "rank2";
    /// Third place on the leaderboard.
    pub const RANK_3: &str = "rank3";
    /// Reached first place for the first time.
    pub const EMERALD_GUARDIAN: &str = "emerald_guardian";
    /// 50 completed actions.
    pub const SUSTAINABILITY_SAGE: &str = "sustainability_sage";
    /// 100 completed actions.
    pub const CLUB_100: &str = "club_100";
    /// 50,000 shamrocks.
    pub const SHAMROCK_TYCOON: &str = "shamrock_tycoon";
    /// Completed every kind of action.
    pub const SUPREME_WILDLIFE_GUARDIAN: &str = "supreme_wildlife_guardian";
    /// Planted a native tree.
    pub const OAK_PLANTER: &str = "oak_planter";
    /// One year of membership.
    pub const VETERAN_1Y: &str = "veteran_1y";
    /// Five years of membership.
    pub const VETERAN_5Y: &str = "veteran_5y";
    /// Ten years of membership.
    pub const VETERAN_10Y: &str = "veteran_10y";
}

/// Action kinds, badge definitions, and shop items known to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Rewardable actions.
    pub actions: Vec<ActionDefinition>,
    /// Unlockable badges.
    pub badges: Vec<BadgeDefinition>,
    /// Shop items, including earned-only achievements.
    pub shop: Vec<ShopItem>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::help_ireland()
    }
}

impl Catalog {
    /// The launch catalog.
    pub fn help_ireland() -> Self {
        Self {
            actions: default_actions(),
            badges: default_badges(),
            shop: default_shop(),
        }
    }

    /// Look up an action definition by kind.
    pub fn action(&self, kind: ActionKind) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    /// Look up a badge definition by id.
    pub fn badge(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    /// Look up a shop item by id.
    pub fn shop_item(&self, id: &str) -> Option<&ShopItem> {
        self.shop.iter().find(|i| i.id == id)
    }

    /// Avatar items that can be bought.
    pub fn purchasable_avatars(&self) -> impl Iterator<Item = &ShopItem> {
        self.shop
            .iter()
            .filter(|i| i.item_type == ShopItemType::Avatar && !i.earned_only)
    }

    /// Every theme item.
    pub fn themes(&self) -> impl Iterator<Item = &ShopItem> {
        self.shop.iter().filter(|i| i.item_type == ShopItemType::Theme)
    }

    /// Number of distinct action kinds the catalog rewards.
    pub fn distinct_action_kinds(&self) -> usize {
        self.actions
            .iter()
            .map(|a| a.kind)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Add a shop item, replacing any existing item with the same id.
    pub fn add_shop_item(&mut self, item: ShopItem) {
        self.shop.retain(|i| i.id != item.id);
        self.shop.push(item);
    }

    /// Add a badge, replacing any existing badge with the same id.
    pub fn add_badge(&mut self, badge: BadgeDefinition) {
        self.badges.retain(|b| b.id != badge.id);
        self.badges.push(badge);
    }
}

/// Points earned for a completed action.
///
/// Fixed actions ignore `quantity`. Per-unit actions award
/// `floor(quantity / unit_size) * points_per_unit`: partial units earn
/// nothing.
///
/// # Errors
///
/// Returns [`ProgressionError::MissingQuantity`] for a per-unit action
/// without a quantity, and [`ProgressionError::ArithmeticOverflow`] if the
/// unit size is zero or the product overflows.
pub fn award_for(
    action: &ActionDefinition,
    quantity: Option<u64>,
) -> Result<u64, ProgressionError> {
    match &action.reward {
        ActionReward::Fixed { points } => Ok(*points),
        ActionReward::PerUnit {
            unit_size,
            points_per_unit,
            ..
        } => {
            let quantity = quantity.ok_or(ProgressionError::MissingQuantity(action.kind))?;
            quantity
                .checked_div(*unit_size)
                .and_then(|units| units.checked_mul(*points_per_unit))
                .ok_or_else(|| ProgressionError::ArithmeticOverflow {
                    context: format!("per-unit award for {}", action.kind),
                })
        }
    }
}

// ---------------------------------------------------------------------------
// Launch catalog
// ---------------------------------------------------------------------------

fn action(
    kind: ActionKind,
    title: &str,
    description: &str,
    icon: &str,
    reward: ActionReward,
) -> ActionDefinition {
    ActionDefinition {
        kind,
        title: title.to_owned(),
        description: description.to_owned(),
        icon: icon.to_owned(),
        reward,
    }
}

fn default_actions() -> Vec<ActionDefinition> {
    vec![
        action(
            ActionKind::PickUpRubbish,
            "Rubbish Collection",
            "Help keep our shared spaces clean and safe.",
            "🗑️",
            ActionReward::Fixed { points: 100 },
        ),
        action(
            ActionKind::PlantATree,
            "Plant a Native Tree",
            "Support biodiversity by planting native species.",
            "🌳",
            ActionReward::Fixed { points: 1000 },
        ),
        action(
            ActionKind::PlantAGarden,
            "Plant a Pollinator Garden",
            "Give bees and butterflies somewhere to feed.",
            "🌻",
            ActionReward::Fixed { points: 500 },
        ),
        action(
            ActionKind::Recycle,
            "Proper Recycling",
            "Sort household waste into the correct channels.",
            "♻️",
            ActionReward::Fixed { points: 200 },
        ),
        action(
            ActionKind::HelpAnimals,
            "Support Local Wildlife",
            "Assist in the care of domestic or wild animals.",
            "🦌",
            ActionReward::Fixed { points: 200 },
        ),
        action(
            ActionKind::DonateVolunteer,
            "Volunteer Your Time",
            "Volunteer with an Irish charity. 10 shamrocks per 20 minutes.",
            "🤝",
            ActionReward::PerUnit {
                unit: String::from("minutes"),
                unit_size: 20,
                points_per_unit: 10,
            },
        ),
        action(
            ActionKind::SaveWater,
            "Save Water",
            "Fix a leak or cut your household water use.",
            "💧",
            ActionReward::Fixed { points: 150 },
        ),
    ]
}

fn badge(id: &str, name: &str, icon: &str, description: &str, is_rank: bool) -> BadgeDefinition {
    BadgeDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        icon: icon.to_owned(),
        description: description.to_owned(),
        is_rank,
    }
}

fn default_badges() -> Vec<BadgeDefinition> {
    use badge_ids::*;
    vec![
        badge(RANK_1, "1st Place Ribbon", "🥇", "Top contributor in your neighborhood.", true),
        badge(RANK_2, "2nd Place Ribbon", "🥈", "Second highest contributor.", true),
        badge(RANK_3, "3rd Place Ribbon", "🥉", "Third highest contributor.", true),
        badge(EMERALD_GUARDIAN, "Emerald Guardian", "💎", "Reached first place in your neighborhood.", false),
        badge(SUSTAINABILITY_SAGE, "Sustainability Sage", "🦉", "Completed 50 verified actions.", false),
        badge(CLUB_100, "100 Club", "💯", "Completed 100 verified actions.", false),
        badge(SHAMROCK_TYCOON, "Shamrock Tycoon", "💰", "Earned 50,000 shamrocks.", false),
        badge(SUPREME_WILDLIFE_GUARDIAN, "Supreme Wildlife Guardian", "🐺", "Completed every kind of action.", false),
        badge(OAK_PLANTER, "Oak Planter", "🌳", "Planted your first native tree.", false),
        badge(VETERAN_1Y, "Seedling Veteran", "🌱", "One year helping Ireland.", false),
        badge(VETERAN_5Y, "Hedgerow Veteran", "🌿", "Five years helping Ireland.", false),
        badge(VETERAN_10Y, "Ancient Oak", "🏰", "Ten years helping Ireland.", false),
    ]
}

fn shop_item(id: &str, name: &str, icon: &str, cost: u64, item_type: ShopItemType) -> ShopItem {
    ShopItem {
        id: id.to_owned(),
        name: name.to_owned(),
        icon: icon.to_owned(),
        cost,
        item_type,
        earned_only: item_type == ShopItemType::Achievement,
        theme_config: None,
    }
}

fn theme(id: &str, name: &str, icon: &str, cost: u64, bg: &str, accent: &str) -> ShopItem {
    ShopItem {
        theme_config: Some(ThemeConfig {
            bg: bg.to_owned(),
            accent: accent.to_owned(),
            pattern: None,
        }),
        ..shop_item(id, name, icon, cost, ShopItemType::Theme)
    }
}

fn default_shop() -> Vec<ShopItem> {
    vec![
        shop_item(badge_ids::RANK_1, "Gold Ribbon", "🥇", 0, ShopItemType::Achievement),
        shop_item(badge_ids::RANK_2, "Silver Ribbon", "🥈", 0, ShopItemType::Achievement),
        shop_item(badge_ids::RANK_3, "Bronze Ribbon", "🥉", 0, ShopItemType::Achievement),
        shop_item("av1", "Red Fox", "🦊", 500, ShopItemType::Avatar),
        shop_item("av2", "Golden Eagle", "🦅", 1000, ShopItemType::Avatar),
        shop_item("av3", "Irish Hare", "🐇", 750, ShopItemType::Avatar),
        shop_item("av4", "Red Deer", "🦌", 1500, ShopItemType::Avatar),
        theme("th1", "Gold Border", "✨", 2000, "#004d2c", "#d4af37"),
        theme("th2", "Atlantic Mist", "🌊", 2500, "#0f3d4c", "#C0C0C0"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volunteering() -> ActionDefinition {
        Catalog::default()
            .action(ActionKind::DonateVolunteer)
            .cloned()
            .unwrap_or_else(|| action(
                ActionKind::DonateVolunteer,
                "",
                "",
                "",
                ActionReward::Fixed { points: 0 },
            ))
    }

    #[test]
    fn every_action_kind_is_in_the_catalog() {
        let catalog = Catalog::default();
        for kind in ActionKind::ALL {
            assert!(catalog.action(kind).is_some(), "missing {kind}");
        }
        assert_eq!(catalog.distinct_action_kinds(), ActionKind::ALL.len());
    }

    #[test]
    fn fixed_action_ignores_quantity() {
        let catalog = Catalog::default();
        let rubbish = catalog.action(ActionKind::PickUpRubbish);
        assert!(rubbish.is_some());
        if let Some(rubbish) = rubbish {
            assert_eq!(award_for(rubbish, None).ok(), Some(100));
            assert_eq!(award_for(rubbish, Some(7)).ok(), Some(100));
        }
    }

    #[test]
    fn volunteering_floors_partial_intervals() {
        let action = volunteering();
        assert_eq!(award_for(&action, Some(39)).ok(), Some(10));
        assert_eq!(award_for(&action, Some(40)).ok(), Some(20));
        assert_eq!(award_for(&action, Some(19)).ok(), Some(0));
        assert_eq!(award_for(&action, Some(0)).ok(), Some(0));
    }

    #[test]
    fn volunteering_without_quantity_is_rejected() {
        let result = award_for(&volunteering(), None);
        assert!(matches!(
            result,
            Err(ProgressionError::MissingQuantity(ActionKind::DonateVolunteer))
        ));
    }

    #[test]
    fn zero_unit_size_is_an_error_not_a_panic() {
        let action = action(
            ActionKind::DonateVolunteer,
            "",
            "",
            "",
            ActionReward::PerUnit {
                unit: String::from("minutes"),
                unit_size: 0,
                points_per_unit: 10,
            },
        );
        assert!(matches!(
            award_for(&action, Some(40)),
            Err(ProgressionError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn badge_icons_do_not_shadow_purchasable_avatars() {
        let catalog = Catalog::default();
        let purchasable: BTreeSet<&str> =
            catalog.purchasable_avatars().map(|i| i.icon.as_str()).collect();
        for badge in &catalog.badges {
            assert!(
                !purchasable.contains(badge.icon.as_str()),
                "badge {} unlocks a paid avatar",
                badge.id
            );
        }
    }

    #[test]
    fn achievements_are_earned_only() {
        let catalog = Catalog::default();
        for item in catalog.shop.iter().filter(|i| i.item_type == ShopItemType::Achievement) {
            assert!(item.earned_only);
            assert!(catalog.badge(&item.id).is_some());
        }
    }

    #[test]
    fn add_shop_item_replaces_same_id() {
        let mut catalog = Catalog::default();
        let before = catalog.shop.len();
        catalog.add_shop_item(shop_item("av1", "Arctic Fox", "🦊", 900, ShopItemType::Avatar));
        assert_eq!(catalog.shop.len(), before);
        assert_eq!(catalog.shop_item("av1").map(|i| i.cost), Some(900));
    }
}
