//! Priority-ordered marker classification.

use super::{extract_tags, MarkerCategory};
use crate::models::Location;

const VILLAGE_EVENING: &str = "村晚";
const KARAOKE: &str = "卡拉ok";
const FIREWOOD: &str = "木柴";
const GRILL: &str = "烤爐";

const CHURCH: &[&str] = &["教會", "教堂", "長老教會"];
const FESTIVAL: &[&str] = &["射耳祭住宿", "射耳祭"];
const CLAN: &[&str] = &["江氏宗親會", "宗親會"];
const FARM: &[&str] = &["農訪", "農業"];
const DEFENSE: &[&str] = &["防身術", "防身"];

type Rule = fn(&str) -> bool;

/// Evaluated top to bottom; the first rule any tag satisfies wins.
const RULES: &[(MarkerCategory, Rule)] = &[
    (MarkerCategory::Karaoke, |t| t.contains(KARAOKE)),
    (MarkerCategory::Firewood, |t| {
        t.contains(FIREWOOD) && t.contains(VILLAGE_EVENING)
    }),
    (MarkerCategory::Grill, |t| {
        t.contains(GRILL) && t.contains(VILLAGE_EVENING)
    }),
    (MarkerCategory::VillageEvening, |t| t.contains(VILLAGE_EVENING)),
    (MarkerCategory::Church, |t| contains_any(t, CHURCH)),
    (MarkerCategory::Festival, |t| contains_any(t, FESTIVAL)),
    (MarkerCategory::Clan, |t| contains_any(t, CLAN)),
    (MarkerCategory::Farm, |t| contains_any(t, FARM)),
    (MarkerCategory::Defense, |t| contains_any(t, DEFENSE)),
];

fn contains_any(tag: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| tag.contains(k))
}

/// Map raw tag strings to exactly one marker category.
pub fn classify<S: AsRef<str>>(raw_tags: &[S]) -> MarkerCategory {
    let tags = extract_tags(raw_tags);
    RULES
        .iter()
        .find(|(_, rule)| tags.iter().any(|t| rule(t)))
        .map(|(category, _)| *category)
        .unwrap_or(MarkerCategory::Default)
}

pub fn classify_location(location: &Location) -> MarkerCategory {
    classify(&location.raw_tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_karaoke_wins_over_everything() {
        assert_eq!(
            classify(&["教會", "村晚卡拉ok機", "村晚木柴"]),
            MarkerCategory::Karaoke
        );
    }

    #[test]
    fn test_evening_subtypes_need_generic_keyword() {
        assert_eq!(classify(&["村晚木柴"]), MarkerCategory::Firewood);
        assert_eq!(classify(&["村晚烤爐"]), MarkerCategory::Grill);
        // firewood alone is not an evening event
        assert_eq!(classify(&["木柴"]), MarkerCategory::Default);
        assert_eq!(classify(&["烤爐, 村晚"]), MarkerCategory::VillageEvening);
    }

    #[test]
    fn test_generic_evening_beats_other_categories() {
        assert_eq!(classify(&["長老教會, 村晚"]), MarkerCategory::VillageEvening);
    }

    #[test]
    fn test_priority_chain() {
        assert_eq!(classify(&["防身術", "農業", "宗親會", "射耳祭", "教堂"]), MarkerCategory::Church);
        assert_eq!(classify(&["防身術", "農業", "宗親會", "射耳祭住宿"]), MarkerCategory::Festival);
        assert_eq!(classify(&["防身術", "農業", "江氏宗親會"]), MarkerCategory::Clan);
        assert_eq!(classify(&["防身", "農訪"]), MarkerCategory::Farm);
        assert_eq!(classify(&["防身"]), MarkerCategory::Defense);
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(classify(&["加平教會聚會所"]), MarkerCategory::Church);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(classify(&["卡拉OK"]), MarkerCategory::Default);
    }

    #[test]
    fn test_no_tags_is_default() {
        let empty: [&str; 0] = [];
        assert_eq!(classify(&empty), MarkerCategory::Default);
        assert_eq!(classify(&["", " , "]), MarkerCategory::Default);
        assert_eq!(classify(&["咖啡"]), MarkerCategory::Default);
    }

    #[test]
    fn test_every_rule_yields_a_known_category() {
        for (category, _) in RULES {
            assert!(MarkerCategory::ALL.contains(category));
        }
    }
}
