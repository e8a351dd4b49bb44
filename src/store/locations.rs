//! Client-held copy of the location collection.

use serde::Serialize;

use crate::models::Location;
use crate::tags::{available_filters, classify_location, filter_locations, MarkerCategory, TagFilter};

/// Location with its computed marker category, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Marker<'a> {
    #[serde(flatten)]
    pub location: &'a Location,
    pub category: MarkerCategory,
    pub icon: &'static str,
    pub tags: Vec<String>,
}

impl<'a> Marker<'a> {
    pub fn new(location: &'a Location) -> Self {
        let category = classify_location(location);
        Self {
            location,
            category,
            icon: category.icon_path(),
            tags: location.tags(),
        }
    }
}

/// Ordered location list kept in sync with the API after each confirmed
/// mutation. The set of offered filters is recomputed on every change.
#[derive(Debug, Clone, Default)]
pub struct LocationStore {
    locations: Vec<Location>,
    filters: Vec<TagFilter>,
}

impl LocationStore {
    pub fn new(locations: Vec<Location>) -> Self {
        let mut store = Self::default();
        store.replace_all(locations);
        store
    }

    pub fn replace_all(&mut self, locations: Vec<Location>) {
        self.locations = locations;
        self.refresh_filters();
    }

    /// Append a newly created location.
    pub fn insert(&mut self, location: Location) {
        self.locations.push(location);
        self.refresh_filters();
    }

    /// Replace the location with the same id. Returns false if absent.
    pub fn replace(&mut self, location: Location) -> bool {
        match self.locations.iter_mut().find(|l| l.id == location.id) {
            Some(slot) => {
                *slot = location;
                self.refresh_filters();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<Location> {
        let index = self.locations.iter().position(|l| l.id == id)?;
        let removed = self.locations.remove(index);
        self.refresh_filters();
        Some(removed)
    }

    fn refresh_filters(&mut self) {
        self.filters = available_filters(&self.locations);
    }

    pub fn get(&self, id: i64) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// First location whose name contains `query`, case-insensitive.
    pub fn find_by_name(&self, query: &str) -> Option<&Location> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.locations
            .iter()
            .find(|l| l.name.to_lowercase().contains(&query))
    }

    pub fn available_filters(&self) -> &[TagFilter] {
        &self.filters
    }

    pub fn filtered(&self, filter: TagFilter) -> Vec<&Location> {
        filter_locations(&self.locations, filter)
    }

    /// Markers for the locations passing `filter` that have coordinates.
    pub fn markers(&self, filter: TagFilter) -> Vec<Marker<'_>> {
        self.filtered(filter)
            .into_iter()
            .filter(|l| l.has_coordinates())
            .map(Marker::new)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: i64, name: &str, tags: &[&str]) -> Location {
        Location {
            id,
            name: name.to_string(),
            latitude: 23.0,
            longitude: 121.13,
            address: None,
            brief_description: None,
            photo: None,
            raw_tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_mutations_keep_filters_current() {
        let mut store = LocationStore::new(vec![location(1, "加平教會", &["教會"])]);
        assert_eq!(store.available_filters(), &[TagFilter::All, TagFilter::Church]);

        store.insert(location(2, "農場", &["農訪"]));
        assert_eq!(
            store.available_filters(),
            &[TagFilter::All, TagFilter::Church, TagFilter::Farm]
        );

        assert!(store.replace(location(1, "加平教會", &["防身術"])));
        assert_eq!(
            store.available_filters(),
            &[TagFilter::All, TagFilter::Farm, TagFilter::Defense]
        );

        assert_eq!(store.remove(2).map(|l| l.id), Some(2));
        assert_eq!(store.available_filters(), &[TagFilter::All, TagFilter::Defense]);
        assert!(store.remove(2).is_none());
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let mut store = LocationStore::new(vec![location(1, "a", &[])]);
        assert!(!store.replace(location(9, "b", &[])));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).map(|l| l.name.as_str()), Some("a"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut store = LocationStore::new(vec![
            location(1, "a", &[]),
            location(2, "b", &[]),
            location(3, "c", &[]),
        ]);
        store.replace(location(2, "B", &[]));
        let names: Vec<&str> = store.all().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "B", "c"]);
    }

    #[test]
    fn test_find_by_name() {
        let store = LocationStore::new(vec![
            location(1, "加樂活動中心", &[]),
            location(2, "加平教會", &[]),
        ]);
        assert_eq!(store.find_by_name("教會").map(|l| l.id), Some(2));
        assert!(store.find_by_name(" ").is_none());
    }

    #[test]
    fn test_markers_skip_missing_coordinates() {
        let mut broken = location(2, "b", &["村晚卡拉ok機"]);
        broken.latitude = f64::NAN;
        let store = LocationStore::new(vec![location(1, "a", &["村晚卡拉ok機"]), broken]);

        let markers = store.markers(TagFilter::VillageEvening);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].category, MarkerCategory::Karaoke);
        assert_eq!(markers[0].tags, vec!["村晚卡拉ok機"]);
    }
}
