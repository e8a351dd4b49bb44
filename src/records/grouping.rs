//! Year buckets for collapsible record lists.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::models::VisitRecord;

pub const UNKNOWN_YEAR: &str = "unknown year";

fn year_run() -> &'static Regex {
    static YEAR_RUN: OnceLock<Regex> = OnceLock::new();
    YEAR_RUN.get_or_init(|| Regex::new(r"[0-9]{4}").expect("year pattern is valid"))
}

/// Year of a raw or display date string.
///
/// Tries `YYYYMMDD`, then `YYYY-…`, then the first four-digit run anywhere.
pub fn extract_year(date: &str) -> Option<u32> {
    let date = date.trim();

    if date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()) {
        return date[..4].parse().ok();
    }

    if let Some((head, _)) = date.split_once('-') {
        if head.len() == 4 && head.bytes().all(|b| b.is_ascii_digit()) {
            return head.parse().ok();
        }
    }

    year_run().find(date).and_then(|m| m.as_str().parse().ok())
}

/// Group key. Orders newest year first with `Unknown` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearBucket {
    Year(u32),
    Unknown,
}

impl YearBucket {
    pub fn of(record: &VisitRecord) -> Self {
        extract_year(record.sort_key())
            .map(YearBucket::Year)
            .unwrap_or(YearBucket::Unknown)
    }

    pub fn label(&self) -> String {
        match self {
            YearBucket::Year(y) => y.to_string(),
            YearBucket::Unknown => UNKNOWN_YEAR.to_string(),
        }
    }
}

impl Ord for YearBucket {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (YearBucket::Year(a), YearBucket::Year(b)) => b.cmp(a),
            (YearBucket::Year(_), YearBucket::Unknown) => Ordering::Less,
            (YearBucket::Unknown, YearBucket::Year(_)) => Ordering::Greater,
            (YearBucket::Unknown, YearBucket::Unknown) => Ordering::Equal,
        }
    }
}

impl PartialOrd for YearBucket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for YearBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Serialize for YearBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearGroup<'a> {
    pub year: YearBucket,
    pub records: Vec<&'a VisitRecord>,
}

/// Partition records into year buckets, newest first. Records inside a
/// bucket are ordered by descending date string.
pub fn group_by_year(records: &[VisitRecord]) -> Vec<YearGroup<'_>> {
    let mut buckets: BTreeMap<YearBucket, Vec<&VisitRecord>> = BTreeMap::new();
    for record in records {
        buckets.entry(YearBucket::of(record)).or_default().push(record);
    }

    buckets
        .into_iter()
        .map(|(year, mut records)| {
            records.sort_by(|a, b| b.sort_key().cmp(a.sort_key()));
            YearGroup { year, records }
        })
        .collect()
}
