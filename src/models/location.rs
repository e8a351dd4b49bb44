//! Location documents as served by the archive API.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::photo;
use crate::tags;

/// A point of interest on the village map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,

    pub name: String,

    /// Upstream sends numbers, older rows carry numeric strings. Anything
    /// unparseable becomes NaN and the location gets no marker.
    #[serde(default = "missing_coordinate", deserialize_with = "deserialize_coordinate")]
    pub latitude: f64,

    #[serde(default = "missing_coordinate", deserialize_with = "deserialize_coordinate")]
    pub longitude: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Raw tag strings, each possibly holding several comma-separated tags
    #[serde(rename = "tag", default, deserialize_with = "deserialize_raw_tags")]
    pub raw_tags: Vec<String>,
}

impl Location {
    /// Display-level tags (split, trimmed, de-duplicated).
    pub fn tags(&self) -> Vec<String> {
        tags::extract_tags(&self.raw_tags)
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Photo link rewritten to a directly servable thumbnail
    pub fn thumbnail_url(&self, size: &str) -> Option<String> {
        photo::thumbnail_url(self.photo.as_deref(), size)
    }
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("coordinate is not representable as f64")),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(f64::NAN)),
        Value::Null => Ok(f64::NAN),
        other => Err(de::Error::custom(format!("invalid coordinate: {}", other))),
    }
}

fn deserialize_raw_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

/// Rejected location payload
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("location name must not be empty")]
    MissingName,
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Body for location create and update calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationPayload {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub brief_description: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub tag: Vec<String>,
}

impl LocationPayload {
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.name.trim().is_empty() {
            return Err(PayloadError::MissingName);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PayloadError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PayloadError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Adds a tag unless blank or already present.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tag.iter().any(|t| t == tag) {
            self.tag.push(tag.to_string());
        }
    }

    /// Prefill an edit form from an existing location.
    pub fn from_location(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address.clone().unwrap_or_default(),
            brief_description: location.brief_description.clone().unwrap_or_default(),
            photo: location.photo.clone().unwrap_or_default(),
            tag: location.raw_tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_location() {
        let location: Location = serde_json::from_value(json!({
            "id": 5,
            "name": "加平教會",
            "latitude": 23.001,
            "longitude": "121.13",
            "address": "台東縣",
            "tag": ["教會, 村晚", "教會"]
        }))
        .unwrap();

        assert_eq!(location.id, 5);
        assert_eq!(location.longitude, 121.13);
        assert!(location.has_coordinates());
        assert_eq!(location.tags(), vec!["教會", "村晚"]);
    }

    #[test]
    fn test_malformed_tags_become_empty() {
        let location: Location = serde_json::from_value(json!({
            "id": 1,
            "name": "x",
            "latitude": 1.0,
            "longitude": 2.0,
            "tag": "教會"
        }))
        .unwrap();
        assert!(location.raw_tags.is_empty());

        let location: Location = serde_json::from_value(json!({
            "id": 1,
            "name": "x",
            "latitude": 1.0,
            "longitude": 2.0,
            "tag": null
        }))
        .unwrap();
        assert!(location.raw_tags.is_empty());
    }

    #[test]
    fn test_unparseable_coordinate_has_no_marker() {
        let location: Location = serde_json::from_value(json!({
            "id": 1,
            "name": "x",
            "latitude": "north",
            "longitude": 2.0
        }))
        .unwrap();
        assert!(!location.has_coordinates());
    }

    #[test]
    fn test_payload_validation() {
        let mut payload = LocationPayload {
            name: "  ".into(),
            latitude: 23.0,
            longitude: 121.0,
            ..Default::default()
        };
        assert_eq!(payload.validate(), Err(PayloadError::MissingName));

        payload.name = "加樂活動中心".into();
        payload.latitude = 91.0;
        assert_eq!(payload.validate(), Err(PayloadError::LatitudeOutOfRange(91.0)));

        payload.latitude = 23.0;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_add_tag_skips_duplicates() {
        let mut payload = LocationPayload::default();
        payload.add_tag(" 農訪 ");
        payload.add_tag("農訪");
        payload.add_tag("");
        assert_eq!(payload.tag, vec!["農訪"]);
    }
}
