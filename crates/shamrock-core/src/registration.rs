//! Registration and profile-edit forms.

use std::collections::BTreeSet;

use serde::Deserialize;
use shamrock_types::UserProfile;
use validator::Validate;

/// Details collected when a user first joins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Display name.
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    /// County of residence.
    #[validate(length(min = 1, max = 40))]
    pub county: String,
    /// Neighborhood.
    #[validate(length(min = 1, max = 80))]
    pub neighborhood: String,
    /// Street, optional.
    #[serde(default)]
    #[validate(length(max = 80))]
    pub street: String,
    /// Community groups, optional.
    #[serde(default)]
    pub community_groups: BTreeSet<String>,
    /// Short biography, optional.
    #[serde(default)]
    #[validate(length(max = 280))]
    pub bio: String,
}

impl RegistrationForm {
    /// Trim every text field and drop blank group names.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            county: self.county.trim().to_owned(),
            neighborhood: self.neighborhood.trim().to_owned(),
            street: self.street.trim().to_owned(),
            community_groups: normalize_groups(self.community_groups),
            bio: self.bio.trim().to_owned(),
        }
    }

    /// Copy the form onto `profile`.
    pub(crate) fn apply(self, profile: &mut UserProfile) {
        profile.name = self.name;
        profile.county = self.county;
        profile.neighborhood = self.neighborhood;
        profile.street = self.street;
        profile.community_groups = self.community_groups;
        profile.bio = self.bio;
    }
}

/// Partial edit of a registered profile. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New display name.
    #[validate(length(min = 1, max = 40))]
    pub name: Option<String>,
    /// New street.
    #[validate(length(max = 80))]
    pub street: Option<String>,
    /// Replacement set of community groups.
    pub community_groups: Option<BTreeSet<String>>,
    /// New biography.
    #[validate(length(max = 280))]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    /// Trim every text field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|s| s.trim().to_owned()),
            street: self.street.map(|s| s.trim().to_owned()),
            community_groups: self.community_groups.map(normalize_groups),
            bio: self.bio.map(|s| s.trim().to_owned()),
        }
    }

    pub(crate) fn apply(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(street) = self.street {
            profile.street = street;
        }
        if let Some(groups) = self.community_groups {
            profile.community_groups = groups;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
    }
}

fn normalize_groups(groups: BTreeSet<String>) -> BTreeSet<String> {
    groups
        .into_iter()
        .map(|g| g.trim().to_owned())
        .filter(|g| !g.is_empty())
        .collect()
}
