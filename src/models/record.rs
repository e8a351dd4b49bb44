//! Visit records and the record edit form.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::photo;

/// Shown when a record has no notes
pub const EMPTY_DESCRIPTION: &str = "無訪視筆記";

/// Shown when a record has no date
pub const MISSING_DATE: &str = "未記錄";

/// A villager taking part in a visit. `id` is `None` when upstream only sent
/// the name and the id has to be looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl Participant {
    pub fn needs_id_lookup(&self) -> bool {
        self.id.is_none()
    }
}

/// Upstream shape of a villager reference inside a record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VillagerRef {
    Linked { villager_id: i64, name: String },
    Named(String),
}

impl From<VillagerRef> for Participant {
    fn from(value: VillagerRef) -> Self {
        match value {
            VillagerRef::Linked { villager_id, name } => Participant {
                name,
                id: Some(villager_id),
            },
            VillagerRef::Named(name) => Participant { name, id: None },
        }
    }
}

/// Record as returned by `POST /api/records`
#[derive(Debug, Clone, Deserialize)]
pub struct RecordWire {
    pub recordid: i64,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub account: Option<Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub students: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub villagers: Vec<VillagerRef>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A dated visit to one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitRecord {
    pub id: i64,
    pub location_id: i64,
    pub semester: String,
    /// Unformatted upstream date, used for grouping and ordering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_date: Option<String>,
    /// Display date, e.g. `2023年3月5日`
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Value>,
    pub students: Vec<String>,
    pub villagers: Vec<Participant>,
}

impl VisitRecord {
    pub fn from_wire(wire: RecordWire, location_id: i64, thumbnail_size: &str) -> Self {
        let raw_date = wire.date.filter(|d| !d.trim().is_empty());
        let description = wire
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string());

        Self {
            id: wire.recordid,
            location_id,
            semester: wire.semester.unwrap_or_default(),
            date: format_display_date(raw_date.as_deref()),
            raw_date,
            description,
            photo: photo::thumbnail_url(wire.photo.as_deref(), thumbnail_size),
            account: wire.account,
            students: wire.students,
            villagers: wire.villagers.into_iter().map(Participant::from).collect(),
        }
    }

    /// Calendar date of the visit when the raw date is parseable
    pub fn visit_date(&self) -> Option<NaiveDate> {
        self.raw_date.as_deref().and_then(parse_date)
    }

    /// Key used for ordering and year extraction
    pub fn sort_key(&self) -> &str {
        self.raw_date.as_deref().unwrap_or(&self.date)
    }
}

/// Parse the date formats the archive has been seen to produce.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok()
}

/// zh-TW long date, or the input unchanged if it does not parse.
pub fn format_display_date(raw: Option<&str>) -> String {
    match raw {
        None => MISSING_DATE.to_string(),
        Some(raw) => match parse_date(raw) {
            Some(d) => format!("{}年{}月{}日", d.year(), d.month(), d.day()),
            None => raw.to_string(),
        },
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("semester is required")]
    MissingSemester,
    #[error("date is required")]
    MissingDate,
    #[error("location id is required")]
    MissingLocation,
    #[error("no field was modified")]
    NoChanges,
}

/// Body of `POST /api/record`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location_id: i64,
    pub account_id: i64,
}

/// Body of `PUT /api/record/{id}`: only the fields that changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.semester.is_none()
            && self.date.is_none()
            && self.photo.is_none()
            && self.description.is_none()
    }
}

/// Editable record form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub semester: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default = "default_account")]
    pub account_id: i64,
}

fn default_account() -> i64 {
    1
}

impl Default for RecordDraft {
    fn default() -> Self {
        Self {
            semester: String::new(),
            date: String::new(),
            photo: String::new(),
            description: String::new(),
            location_id: None,
            account_id: default_account(),
        }
    }
}

impl RecordDraft {
    pub fn for_location(location_id: i64) -> Self {
        Self {
            location_id: Some(location_id),
            ..Default::default()
        }
    }

    /// Prefill the form from a stored record.
    pub fn from_record(record: &VisitRecord) -> Self {
        let date = record
            .visit_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let description = if record.description == EMPTY_DESCRIPTION {
            String::new()
        } else {
            record.description.clone()
        };
        let account_id = record
            .account
            .as_ref()
            .and_then(Value::as_i64)
            .unwrap_or_else(default_account);

        Self {
            semester: record.semester.clone(),
            date,
            photo: record.photo.clone().unwrap_or_default(),
            description,
            location_id: Some(record.location_id),
            account_id,
        }
    }

    pub fn create_payload(&self) -> Result<RecordCreate, DraftError> {
        if self.semester.trim().is_empty() {
            return Err(DraftError::MissingSemester);
        }
        if self.date.trim().is_empty() {
            return Err(DraftError::MissingDate);
        }
        let location_id = self.location_id.ok_or(DraftError::MissingLocation)?;

        Ok(RecordCreate {
            semester: non_empty(&self.semester),
            date: non_empty(&self.date),
            photo: non_empty(&self.photo),
            description: non_empty(&self.description).filter(|d| d != EMPTY_DESCRIPTION),
            location_id,
            account_id: self.account_id,
        })
    }

    /// Fields that differ from `original`. Clearing a field is not an edit.
    pub fn changes_since(&self, original: &RecordDraft) -> Result<RecordChanges, DraftError> {
        if self.location_id.is_none() {
            return Err(DraftError::MissingLocation);
        }
        let changes = RecordChanges {
            semester: changed(&self.semester, &original.semester),
            date: changed(&self.date, &original.date),
            photo: changed(&self.photo, &original.photo),
            description: changed(&self.description, &original.description),
        };
        if changes.is_empty() {
            return Err(DraftError::NoChanges);
        }
        Ok(changes)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn changed(current: &str, original: &str) -> Option<String> {
    let current = current.trim();
    (current != original.trim() && !current.is_empty()).then(|| current.to_string())
}
