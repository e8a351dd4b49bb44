//! Tag extraction, marker classification and category filtering.
//!
//! Classification and filtering share keywords but are kept as separate
//! rule sets: a location's marker icon is the single highest-priority
//! category, while filter membership is decided per filter.

pub mod category;
pub mod classifier;
pub mod filter;

pub use category::MarkerCategory;
pub use classifier::{classify, classify_location};
pub use filter::{available_filters, filter_locations, TagFilter, UnknownFilter};

/// Split raw tag strings on commas, trim, drop empties and de-duplicate,
/// keeping the first occurrence of each tag.
pub fn extract_tags<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw
        .iter()
        .flat_map(|s| s.as_ref().split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}
