//! Kanahcian - village visitation archive map
//!
//! This library provides the shared types and logic for the `mapd` service
//! and the `mapctl` command-line client: marker classification, category
//! filtering, fuzzy location search, year grouping of visit records, and a
//! client for the archive REST API.

pub mod api;
pub mod config;
pub mod models;
pub mod photo;
pub mod records;
pub mod search;
pub mod server;
pub mod store;
pub mod tags;
pub mod view;

pub use models::{Location, Villager, VisitRecord};
pub use tags::{MarkerCategory, TagFilter};
