use serde::{Deserialize, Serialize};

/// Marker classification of a location, used to pick its map icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerCategory {
    /// Village evening with a karaoke machine
    Karaoke,
    /// Village evening firewood supply
    Firewood,
    /// Village evening grill
    Grill,
    VillageEvening,
    Church,
    /// Ear-shooting festival lodging
    Festival,
    /// Clan association
    Clan,
    /// Agricultural visit
    Farm,
    /// Self-defense program
    Defense,
    Default,
}

impl MarkerCategory {
    /// All categories in classification priority order
    pub const ALL: [MarkerCategory; 10] = [
        MarkerCategory::Karaoke,
        MarkerCategory::Firewood,
        MarkerCategory::Grill,
        MarkerCategory::VillageEvening,
        MarkerCategory::Church,
        MarkerCategory::Festival,
        MarkerCategory::Clan,
        MarkerCategory::Farm,
        MarkerCategory::Defense,
        MarkerCategory::Default,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            MarkerCategory::Karaoke => "karaoke",
            MarkerCategory::Firewood => "firewood",
            MarkerCategory::Grill => "grill",
            MarkerCategory::VillageEvening => "village_evening",
            MarkerCategory::Church => "church",
            MarkerCategory::Festival => "festival",
            MarkerCategory::Clan => "clan",
            MarkerCategory::Farm => "farm",
            MarkerCategory::Defense => "defense",
            MarkerCategory::Default => "default",
        }
    }

    pub fn icon_path(&self) -> &'static str {
        match self {
            MarkerCategory::Karaoke => "/assets/images/microphone.png",
            MarkerCategory::Firewood => "/assets/images/firewood.png",
            MarkerCategory::Grill => "/assets/images/grill.png",
            MarkerCategory::VillageEvening => "/assets/images/firewood.png",
            MarkerCategory::Church => "/assets/images/church.png",
            MarkerCategory::Festival => "/assets/images/home.png",
            MarkerCategory::Clan => "/assets/images/family.png",
            MarkerCategory::Farm => "/assets/images/sprout.png",
            MarkerCategory::Defense => "/assets/images/shield.png",
            MarkerCategory::Default => "/assets/images/pin.png",
        }
    }

    pub fn is_village_evening(&self) -> bool {
        matches!(
            self,
            MarkerCategory::Karaoke
                | MarkerCategory::Firewood
                | MarkerCategory::Grill
                | MarkerCategory::VillageEvening
        )
    }
}

impl std::fmt::Display for MarkerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evening_subtypes() {
        let evening: Vec<_> = MarkerCategory::ALL
            .into_iter()
            .filter(MarkerCategory::is_village_evening)
            .collect();
        assert_eq!(
            evening,
            vec![
                MarkerCategory::Karaoke,
                MarkerCategory::Firewood,
                MarkerCategory::Grill,
                MarkerCategory::VillageEvening
            ]
        );
    }

    #[test]
    fn test_ids_match_serde_names() {
        for category in MarkerCategory::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.id());
        }
    }
}
