//! The selected location and its records.
//!
//! Record fetches are asynchronous and may complete out of order when the
//! selection changes quickly. Each selection hands out a ticket; results are
//! only applied while their ticket is still current.

use crate::models::VisitRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    generation: u64,
    pub location_id: i64,
}

#[derive(Debug, Default)]
pub struct RecordSelection {
    generation: u64,
    location_id: Option<i64>,
    records: Vec<VisitRecord>,
    loading: bool,
    cursor: usize,
}

impl RecordSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a location; previous records are dropped and the cursor reset.
    pub fn select(&mut self, location_id: i64) -> SelectionTicket {
        self.generation += 1;
        self.location_id = Some(location_id);
        self.records.clear();
        self.loading = true;
        self.cursor = 0;
        SelectionTicket {
            generation: self.generation,
            location_id,
        }
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.location_id = None;
        self.records.clear();
        self.loading = false;
        self.cursor = 0;
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation && self.location_id == Some(ticket.location_id)
    }

    /// Install fetched records. Stale tickets are ignored and return false.
    pub fn apply(&mut self, ticket: SelectionTicket, records: Vec<VisitRecord>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.records = records;
        self.loading = false;
        self.cursor = 0;
        true
    }

    /// A failed fetch shows an empty record list.
    pub fn fail(&mut self, ticket: SelectionTicket) -> bool {
        self.apply(ticket, Vec::new())
    }

    pub fn location_id(&self) -> Option<i64> {
        self.location_id
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&VisitRecord> {
        self.records.get(self.cursor)
    }

    pub fn next(&mut self) -> Option<&VisitRecord> {
        if self.cursor + 1 < self.records.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<&VisitRecord> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::format_display_date;

    fn record(id: i64, location_id: i64) -> VisitRecord {
        VisitRecord {
            id,
            location_id,
            semester: "112-1".into(),
            raw_date: None,
            date: format_display_date(None),
            description: String::new(),
            photo: None,
            account: None,
            students: Vec::new(),
            villagers: Vec::new(),
        }
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut selection = RecordSelection::new();
        let first = selection.select(1);
        let second = selection.select(2);

        // response for location 2 arrives first, then the stale one for 1
        assert!(selection.apply(second, vec![record(20, 2)]));
        assert!(!selection.apply(first, vec![record(10, 1)]));

        assert_eq!(selection.location_id(), Some(2));
        assert_eq!(selection.records()[0].id, 20);
    }

    #[test]
    fn test_reselecting_same_location_invalidates_old_ticket() {
        let mut selection = RecordSelection::new();
        let old = selection.select(1);
        let new = selection.select(1);
        assert!(!selection.is_current(&old));
        assert!(selection.is_current(&new));
    }

    #[test]
    fn test_clear_invalidates_pending_fetch() {
        let mut selection = RecordSelection::new();
        let ticket = selection.select(3);
        selection.clear();
        assert!(!selection.apply(ticket, vec![record(1, 3)]));
        assert!(selection.records().is_empty());
    }

    #[test]
    fn test_failure_stops_loading() {
        let mut selection = RecordSelection::new();
        let ticket = selection.select(3);
        assert!(selection.is_loading());
        assert!(selection.fail(ticket));
        assert!(!selection.is_loading());
        assert!(selection.records().is_empty());
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut selection = RecordSelection::new();
        let ticket = selection.select(1);
        selection.apply(ticket, vec![record(1, 1), record(2, 1)]);

        assert_eq!(selection.prev().map(|r| r.id), Some(1));
        assert_eq!(selection.next().map(|r| r.id), Some(2));
        assert_eq!(selection.next().map(|r| r.id), Some(2));
        assert_eq!(selection.cursor(), 1);

        selection.select(4);
        assert_eq!(selection.cursor(), 0);
        assert!(selection.current().is_none());
    }
}
