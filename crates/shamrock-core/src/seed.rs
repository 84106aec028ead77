//! Reference data: the neighborhoods on offer and the demo community a
//! fresh install starts with.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use shamrock_types::{PeerProfile, ProfileId};
use uuid::Uuid;

/// A neighborhood a user can register in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Neighborhood {
    /// Neighborhood name, as stored on profiles.
    pub name: &'static str,
    /// County it belongs to.
    pub county: &'static str,
}

/// Neighborhoods offered at registration.
pub const NEIGHBORHOODS: [Neighborhood; 6] = [
    Neighborhood { name: "The Liberties, Dublin", county: "Dublin" },
    Neighborhood { name: "Dalkey, Dublin", county: "Dublin" },
    Neighborhood { name: "Galway City Centre", county: "Galway" },
    Neighborhood { name: "Cork City Northside", county: "Cork" },
    Neighborhood { name: "Limerick Medieval Quarter", county: "Limerick" },
    Neighborhood { name: "Killarney Town", county: "Kerry" },
];

struct DemoPeer {
    seq: u128,
    name: &'static str,
    neighborhood: usize,
    avatar: &'static str,
    points: u64,
    joined: (i32, u32, u32),
}

const DEMO_PEERS: [DemoPeer; 18] = [
    DemoPeer { seq: 1, name: "Patrick O'Malley", neighborhood: 0, avatar: "🦊", points: 15_400, joined: (2023, 5, 12) },
    DemoPeer { seq: 2, name: "Siobhán Murphy", neighborhood: 0, avatar: "🦅", points: 12_100, joined: (2023, 8, 20) },
    DemoPeer { seq: 3, name: "Cillian O'Sullivan", neighborhood: 2, avatar: "👤", points: 9_800, joined: (2023, 11, 3) },
    DemoPeer { seq: 4, name: "Aoife Kelly", neighborhood: 3, avatar: "👤", points: 8_500, joined: (2024, 2, 1) },
    DemoPeer { seq: 5, name: "Niamh Byrne", neighborhood: 1, avatar: "🦔", points: 7_900, joined: (2023, 6, 2) },
    DemoPeer { seq: 6, name: "Eoin Walsh", neighborhood: 4, avatar: "👤", points: 7_400, joined: (2023, 9, 14) },
    DemoPeer { seq: 7, name: "Gráinne Doyle", neighborhood: 5, avatar: "🦌", points: 6_800, joined: (2023, 4, 30) },
    DemoPeer { seq: 8, name: "Declan Ryan", neighborhood: 1, avatar: "👤", points: 6_100, joined: (2023, 10, 8) },
    DemoPeer { seq: 9, name: "Róisín Brennan", neighborhood: 2, avatar: "🐦", points: 5_600, joined: (2024, 1, 19) },
    DemoPeer { seq: 10, name: "Seán McCarthy", neighborhood: 3, avatar: "👤", points: 5_200, joined: (2023, 7, 25) },
    DemoPeer { seq: 11, name: "Orla Fitzgerald", neighborhood: 4, avatar: "👤", points: 4_700, joined: (2024, 3, 9) },
    DemoPeer { seq: 12, name: "Tadhg Moriarty", neighborhood: 5, avatar: "👤", points: 4_300, joined: (2023, 12, 1) },
    DemoPeer { seq: 13, name: "Ciara Nolan", neighborhood: 0, avatar: "👤", points: 3_900, joined: (2024, 4, 16) },
    DemoPeer { seq: 14, name: "Fionn Gallagher", neighborhood: 1, avatar: "👤", points: 3_400, joined: (2024, 5, 3) },
    DemoPeer { seq: 15, name: "Méabh Connolly", neighborhood: 2, avatar: "👤", points: 2_900, joined: (2024, 6, 21) },
    DemoPeer { seq: 16, name: "Darragh Lynch", neighborhood: 3, avatar: "👤", points: 2_500, joined: (2024, 7, 7) },
    DemoPeer { seq: 17, name: "Clodagh Quinn", neighborhood: 4, avatar: "👤", points: 2_100, joined: (2024, 8, 12) },
    DemoPeer { seq: 18, name: "Ruairí Sheehan", neighborhood: 5, avatar: "👤", points: 1_800, joined: (2024, 9, 28) },
];

fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// The demo community. Ids are stable across restarts.
pub fn demo_peers() -> Vec<PeerProfile> {
    DEMO_PEERS
        .iter()
        .filter_map(|p| {
            let hood = NEIGHBORHOODS.get(p.neighborhood)?;
            let (year, month, day) = p.joined;
            Some(PeerProfile {
                id: ProfileId::from(Uuid::from_u128(p.seq)),
                name: p.name.to_owned(),
                county: hood.county.to_owned(),
                neighborhood: hood.name.to_owned(),
                avatar: p.avatar.to_owned(),
                points: p.points,
                joined_date: midnight(year, month, day),
                is_master: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_community_is_ordered_by_points() {
        let peers = demo_peers();
        assert_eq!(peers.len(), DEMO_PEERS.len());
        assert!(peers.windows(2).all(|w| w.first().map(|p| p.points) > w.get(1).map(|p| p.points)));
    }

    #[test]
    fn demo_ids_are_stable() {
        assert_eq!(demo_peers(), demo_peers());
    }

    #[test]
    fn every_neighborhood_has_three_established_members() {
        let peers = demo_peers();
        for hood in NEIGHBORHOODS {
            let ahead = peers
                .iter()
                .filter(|p| p.neighborhood == hood.name && p.county == hood.county && p.points > 1_000)
                .count();
            assert!(ahead >= 3, "{} has {ahead} demo members", hood.name);
        }
    }
}
