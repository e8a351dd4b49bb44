//! Two-tier location name search.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use super::similarity::similarity;
use crate::models::Location;

/// Fuzzy results are cut to this many suggestions
pub const MAX_FUZZY_RESULTS: usize = 5;

/// Fuzzy candidates need a score above this unless they contain the query
pub const FUZZY_THRESHOLD: f64 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Name equals, starts with or contains the query
    Exact,
    /// Edit-distance ranked
    Fuzzy,
}

#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub location: &'a Location,
    pub tier: MatchTier,
    /// Only set for fuzzy hits
    pub score: Option<f64>,
}

/// Rank locations by name against `query`.
///
/// Literal matches are returned in full when there are any; otherwise the
/// best fuzzy candidates are returned.
pub fn search_locations<'a>(locations: &'a [Location], query: &str) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let exact = exact_matches(locations, &query);
    if !exact.is_empty() {
        debug!("{} exact matches for '{}'", exact.len(), query);
        return exact;
    }

    let fuzzy = fuzzy_matches(locations, &query);
    debug!("{} fuzzy matches for '{}'", fuzzy.len(), query);
    fuzzy
}

fn exact_matches<'a>(locations: &'a [Location], query: &str) -> Vec<SearchHit<'a>> {
    let mut matches: Vec<(String, &Location)> = locations
        .iter()
        .map(|l| (l.name.to_lowercase(), l))
        .filter(|(name, _)| name.contains(query))
        .collect();

    matches.sort_by_key(|(name, _)| {
        (
            name.as_str() != query,
            !name.starts_with(query),
            name.chars().count(),
        )
    });

    matches
        .into_iter()
        .map(|(_, location)| SearchHit {
            location,
            tier: MatchTier::Exact,
            score: None,
        })
        .collect()
}

struct Candidate<'a> {
    location: &'a Location,
    score: f64,
    /// Character index of the first occurrence of the query, if contained
    position: Option<usize>,
}

fn fuzzy_matches<'a>(locations: &'a [Location], query: &str) -> Vec<SearchHit<'a>> {
    let mut candidates: Vec<Candidate> = locations
        .iter()
        .map(|location| {
            let name = location.name.to_lowercase();
            let position = name.find(query).map(|byte| name[..byte].chars().count());
            Candidate {
                location,
                score: similarity(&name, query),
                position,
            }
        })
        .filter(|c| c.score > FUZZY_THRESHOLD || c.position.is_some())
        .collect();

    candidates.sort_by(compare_candidates);
    candidates.truncate(MAX_FUZZY_RESULTS);

    candidates
        .into_iter()
        .map(|c| SearchHit {
            location: c.location,
            tier: MatchTier::Fuzzy,
            score: Some(c.score),
        })
        .collect()
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    match (a.position, b.position) {
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (Some(pa), Some(pb)) if pa != pb => pa.cmp(&pb),
        _ => b.score.total_cmp(&a.score),
    }
}
