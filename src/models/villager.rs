use serde::{Deserialize, Serialize};

use crate::photo;

/// Villager as returned by `GET /api/villager/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct VillagerWire {
    pub villagerid: i64,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub locationid: Option<i64>,
}

/// A named individual who appears in visit records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Villager {
    pub id: i64,
    pub name: String,
    /// Display gender; `M`/`F` codes are rendered as 男/女
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub job: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
}

impl Villager {
    pub fn from_wire(wire: VillagerWire, thumbnail_size: &str) -> Self {
        Self {
            id: wire.villagerid,
            name: wire.name,
            gender: wire.gender.map(|g| gender_label(&g).to_string()),
            job: wire
                .job
                .filter(|j| !j.trim().is_empty())
                .unwrap_or_else(|| "無資料".to_string()),
            url: wire.url.filter(|u| !u.trim().is_empty()),
            photo: photo::thumbnail_url(wire.photo.as_deref(), thumbnail_size),
            location_id: wire.locationid,
        }
    }
}

fn gender_label(code: &str) -> &str {
    match code {
        "M" => "男",
        "F" => "女",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_villager_from_wire() {
        let wire: VillagerWire = serde_json::from_value(json!({
            "villagerid": 2,
            "name": "Cina Valis",
            "gender": "F",
            "job": null,
            "url": null,
            "photo": null,
            "locationid": 5
        }))
        .unwrap();

        let villager = Villager::from_wire(wire, "w1000");
        assert_eq!(villager.gender.as_deref(), Some("女"));
        assert_eq!(villager.job, "無資料");
        assert_eq!(villager.photo, None);
        assert_eq!(villager.location_id, Some(5));
    }

    #[test]
    fn test_unknown_gender_code_passes_through() {
        assert_eq!(gender_label("X"), "X");
        assert_eq!(gender_label("M"), "男");
    }
}
