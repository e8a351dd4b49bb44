use hashbrown::HashMap;

use crate::models::VisitRecord;

/// Name to villager id lookup, filled from records as they are fetched.
///
/// Owned by whoever drives the lookups; clear it whenever the location set
/// is reloaded.
#[derive(Debug, Clone, Default)]
pub struct VillagerIdCache {
    ids: HashMap<String, i64>,
}

impl VillagerIdCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.ids.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: i64) {
        self.ids.insert(name.into(), id);
    }

    /// Remember every participant whose id is known. First sighting wins.
    pub fn remember(&mut self, records: &[VisitRecord]) {
        for participant in records.iter().flat_map(|r| &r.villagers) {
            if let Some(id) = participant.id {
                self.ids.entry(participant.name.clone()).or_insert(id);
            }
        }
    }

    /// Take over the ids of `other` that are not known yet.
    pub fn merge(&mut self, other: VillagerIdCache) {
        for (name, id) in other.ids {
            self.ids.entry(name).or_insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
