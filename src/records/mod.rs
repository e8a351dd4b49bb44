//! Record presentation helpers.

pub mod grouping;

pub use grouping::{extract_year, group_by_year, YearBucket, YearGroup, UNKNOWN_YEAR};
