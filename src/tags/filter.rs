//! Category filter bar.
//!
//! Filter predicates are independent of the classifier: a location whose
//! marker is `karaoke` is still a member of the `village_evening` filter.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::extract_tags;
use crate::models::Location;

#[derive(Debug, Error, PartialEq)]
#[error("unknown filter category: {0}")]
pub struct UnknownFilter(pub String);

/// Active filter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagFilter {
    #[default]
    All,
    /// Any tag containing 村晚, so evening subtype markers
    /// (`MarkerCategory::is_village_evening`) show up here too
    VillageEvening,
    Church,
    Festival,
    Clan,
    Farm,
    Defense,
}

impl TagFilter {
    /// Filter bar order
    pub const ALL: [TagFilter; 7] = [
        TagFilter::All,
        TagFilter::VillageEvening,
        TagFilter::Church,
        TagFilter::Festival,
        TagFilter::Clan,
        TagFilter::Farm,
        TagFilter::Defense,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            TagFilter::All => "all",
            TagFilter::VillageEvening => "village_evening",
            TagFilter::Church => "church",
            TagFilter::Festival => "festival",
            TagFilter::Clan => "clan",
            TagFilter::Farm => "farm",
            TagFilter::Defense => "defense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TagFilter::All => "全部",
            TagFilter::VillageEvening => "村晚",
            TagFilter::Church => "教會",
            TagFilter::Festival => "射耳祭",
            TagFilter::Clan => "宗親會",
            TagFilter::Farm => "農訪",
            TagFilter::Defense => "防身術",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TagFilter::All => "🗺️",
            TagFilter::VillageEvening => "🎤",
            TagFilter::Church => "⛪",
            TagFilter::Festival => "🏹",
            TagFilter::Clan => "🏛️",
            TagFilter::Farm => "🌱",
            TagFilter::Defense => "🥋",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            TagFilter::All => &[],
            TagFilter::VillageEvening => &["村晚"],
            TagFilter::Church => &["教會", "教堂", "長老教會"],
            TagFilter::Festival => &["射耳祭住宿", "射耳祭"],
            TagFilter::Clan => &["江氏宗親會", "宗親會"],
            TagFilter::Farm => &["農訪", "農業"],
            TagFilter::Defense => &["防身術", "防身"],
        }
    }

    /// Whether any extracted tag satisfies this filter.
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        match self {
            TagFilter::All => true,
            _ => tags
                .iter()
                .any(|t| self.keywords().iter().any(|k| t.as_ref().contains(k))),
        }
    }

    pub fn matches_location(&self, location: &Location) -> bool {
        self.matches(&extract_tags(&location.raw_tags))
    }

    /// Tapping the active filter again clears it.
    pub fn toggle(self, tapped: TagFilter) -> TagFilter {
        if tapped == self {
            TagFilter::All
        } else {
            tapped
        }
    }
}

impl std::str::FromStr for TagFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagFilter::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

impl std::fmt::Display for TagFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Locations passing `filter`, in their original order.
pub fn filter_locations<'a>(locations: &'a [Location], filter: TagFilter) -> Vec<&'a Location> {
    locations
        .iter()
        .filter(|l| filter.matches_location(l))
        .collect()
}

/// `All` plus each category that at least one location matches.
pub fn available_filters(locations: &[Location]) -> Vec<TagFilter> {
    let tag_sets: Vec<Vec<String>> = locations
        .iter()
        .map(|l| extract_tags(&l.raw_tags))
        .collect();

    TagFilter::ALL
        .into_iter()
        .filter(|f| *f == TagFilter::All || tag_sets.iter().any(|tags| f.matches(tags)))
        .collect()
}
