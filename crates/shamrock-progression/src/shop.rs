//! The points-redemption shop and cosmetic selection.

use serde::Serialize;
use shamrock_types::{ShopItem, ShopItemType, UserProfile};
use tracing::info;

use crate::catalog::Catalog;
use crate::error::ProgressionError;
use crate::wallet;

/// A shop item as seen by one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopListing {
    /// The catalog item.
    #[serde(flatten)]
    pub item: ShopItem,
    /// Whether the profile already holds it.
    pub owned: bool,
    /// Whether the profile could buy it now.
    pub affordable: bool,
}

/// Whether `profile` holds `item`.
///
/// Avatars are owned by icon, themes by id, and achievements when the
/// matching badge has been earned.
pub fn is_owned(profile: &UserProfile, item: &ShopItem) -> bool {
    match item.item_type {
        ShopItemType::Avatar => profile.unlocked_avatars.contains(&item.icon),
        ShopItemType::Theme => profile.unlocked_themes.contains(&item.id),
        ShopItemType::Achievement => profile.badges.contains(&item.id),
    }
}

/// Every catalog item with ownership and affordability for `profile`.
pub fn listings(profile: &UserProfile, catalog: &Catalog) -> Vec<ShopListing> {
    catalog
        .shop
        .iter()
        .map(|item| {
            let owned = is_owned(profile, item);
            ShopListing {
                affordable: !owned && !item.earned_only && profile.total_shamrocks >= item.cost,
                owned,
                item: item.clone(),
            }
        })
        .collect()
}

/// Buy `item_id`.
///
/// Avatars are unlocked and equipped, themes unlocked and activated.
/// Earned-only items, owned items and unaffordable items are rejected and
/// nothing changes.
pub fn purchase(
    profile: &mut UserProfile,
    catalog: &Catalog,
    item_id: &str,
) -> Result<ShopItem, ProgressionError> {
    let item = catalog
        .shop_item(item_id)
        .ok_or_else(|| ProgressionError::ItemNotFound(item_id.to_owned()))?;
    if item.earned_only || item.item_type == ShopItemType::Achievement {
        return Err(ProgressionError::NotPurchasable(item.id.clone()));
    }
    if is_owned(profile, item) {
        return Err(ProgressionError::AlreadyOwned(item.id.clone()));
    }

    wallet::spend(profile, item.cost)?;
    match item.item_type {
        ShopItemType::Avatar => {
            profile.unlocked_avatars.insert(item.icon.clone());
            profile.avatar.clone_from(&item.icon);
        }
        ShopItemType::Theme => {
            profile.unlocked_themes.insert(item.id.clone());
            profile.active_theme = Some(item.id.clone());
        }
        ShopItemType::Achievement => {}
    }
    info!(
        profile_id = %profile.id,
        item = %item.id,
        cost = item.cost,
        balance = profile.total_shamrocks,
        "Shop item purchased"
    );
    Ok(item.clone())
}

/// Equip an unlocked avatar icon.
pub fn select_avatar(profile: &mut UserProfile, icon: &str) -> Result<(), ProgressionError> {
    if !profile.unlocked_avatars.contains(icon) {
        return Err(ProgressionError::AvatarLocked(icon.to_owned()));
    }
    icon.clone_into(&mut profile.avatar);
    Ok(())
}

/// Activate an unlocked theme, or clear the active theme with `None`.
pub fn select_theme(profile: &mut UserProfile, theme_id: Option<&str>) -> Result<(), ProgressionError> {
    match theme_id {
        None => profile.active_theme = None,
        Some(id) if profile.unlocked_themes.contains(id) => {
            profile.active_theme = Some(id.to_owned());
        }
        Some(id) => return Err(ProgressionError::ThemeLocked(id.to_owned())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::catalog::badge_ids;

    fn funded(balance: u64) -> UserProfile {
        let mut p = UserProfile::new(Utc::now());
        p.total_shamrocks = balance;
        p
    }

    #[test]
    fn avatar_purchase_unlocks_and_equips() {
        let catalog = Catalog::default();
        let mut p = funded(600);
        let item = purchase(&mut p, &catalog, "av1");
        assert!(item.is_ok());
        assert_eq!(p.total_shamrocks, 100);
        assert!(p.unlocked_avatars.contains("🦊"));
        assert_eq!(p.avatar, "🦊");
    }

    #[test]
    fn theme_purchase_unlocks_and_activates() {
        let catalog = Catalog::default();
        let mut p = funded(2_000);
        assert!(purchase(&mut p, &catalog, "th1").is_ok());
        assert_eq!(p.total_shamrocks, 0);
        assert!(p.unlocked_themes.contains("th1"));
        assert_eq!(p.active_theme.as_deref(), Some("th1"));
    }

    #[test]
    fn rejected_purchases_change_nothing() {
        let catalog = Catalog::default();
        let mut p = funded(400);
        let before = p.clone();

        assert!(matches!(
            purchase(&mut p, &catalog, "av1"),
            Err(ProgressionError::InsufficientShamrocks { cost: 500, balance: 400 })
        ));
        assert!(matches!(
            purchase(&mut p, &catalog, badge_ids::RANK_1),
            Err(ProgressionError::NotPurchasable(_))
        ));
        assert!(matches!(
            purchase(&mut p, &catalog, "nope"),
            Err(ProgressionError::ItemNotFound(_))
        ));
        assert_eq!(p, before);
    }

    #[test]
    fn owned_items_cannot_be_bought_twice() {
        let catalog = Catalog::default();
        let mut p = funded(5_000);
        assert!(purchase(&mut p, &catalog, "av2").is_ok());
        let balance = p.total_shamrocks;
        assert!(matches!(
            purchase(&mut p, &catalog, "av2"),
            Err(ProgressionError::AlreadyOwned(_))
        ));
        assert_eq!(p.total_shamrocks, balance);
    }

    #[test]
    fn selection_requires_unlock() {
        let mut p = funded(0);
        assert!(matches!(
            select_avatar(&mut p, "🦌"),
            Err(ProgressionError::AvatarLocked(_))
        ));
        assert!(matches!(
            select_theme(&mut p, Some("th2")),
            Err(ProgressionError::ThemeLocked(_))
        ));
        assert_eq!(p.avatar, shamrock_types::DEFAULT_AVATAR);

        p.unlocked_themes.insert(String::from("th2"));
        assert!(select_theme(&mut p, Some("th2")).is_ok());
        assert!(select_theme(&mut p, None).is_ok());
        assert!(p.active_theme.is_none());
    }

    #[test]
    fn achievements_list_as_owned_when_badge_held() {
        let catalog = Catalog::default();
        let mut p = funded(1_000);
        p.badges.insert(badge_ids::RANK_2.to_owned());
        let listings = listings(&p, &catalog);

        let rank2 = listings.iter().find(|l| l.item.id == badge_ids::RANK_2);
        assert_eq!(rank2.map(|l| l.owned), Some(true));
        let rank1 = listings.iter().find(|l| l.item.id == badge_ids::RANK_1);
        assert_eq!(rank1.map(|l| (l.owned, l.affordable)), Some((false, false)));
        let eagle = listings.iter().find(|l| l.item.id == "av2");
        assert_eq!(eagle.map(|l| l.affordable), Some(true));
    }
}
