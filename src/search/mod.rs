//! Client-side location search: literal matches first, edit-distance
//! ranking only when nothing matches literally.

pub mod ranking;
pub mod similarity;

pub use ranking::{search_locations, MatchTier, SearchHit, MAX_FUZZY_RESULTS};
pub use similarity::{levenshtein, similarity};
