//! HTTP client for the archive REST API.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::ApiError;
use crate::config::{ApiConfig, Config, PhotoConfig};
use crate::models::{
    Envelope, ErrorBody, Location, LocationPayload, RecordChanges, RecordCreate, RecordWire,
    Villager, VillagerWire, VisitRecord,
};
use crate::store::VillagerIdCache;

/// Client for the archive API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    villager_base_url: Url,
    thumbnail_size: String,
}

impl ApiClient {
    pub fn new(api: &ApiConfig, photo: &PhotoConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&api.base_url)?;
        let villager_base_url = match &api.villager_base_url {
            Some(url) => Url::parse(url)?,
            None => base_url.clone(),
        };

        let client = Client::builder()
            .user_agent(concat!("kanahcian/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(api.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            villager_base_url,
            thumbnail_size: photo.thumbnail_size.clone(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(&config.api, &config.photo)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Self::endpoint(&self.base_url, path)
    }

    /// All locations. An unsuccessful envelope yields an empty list and
    /// malformed rows are skipped.
    pub async fn fetch_locations(&self) -> Result<Vec<Location>, ApiError> {
        let response = self.client.get(self.url("api/locations")?).send().await?;
        let envelope: Envelope<Value> = read_json(response).await?;

        if !envelope.is_success() {
            warn!(
                "Fetching locations was not successful: {}",
                envelope.message.as_deref().unwrap_or("no message")
            );
            return Ok(Vec::new());
        }

        let items = match envelope.data {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                warn!("Expected a location array, got: {}", other);
                return Ok(Vec::new());
            }
        };

        let total = items.len();
        let locations = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Location>(item) {
                Ok(location) => Some(location),
                Err(e) => {
                    warn!("Skipping malformed location: {}", e);
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!("Fetched {} of {} locations", locations.len(), total);
        Ok(locations)
    }

    pub async fn add_location(&self, payload: &LocationPayload) -> Result<Location, ApiError> {
        payload.validate()?;
        info!("Adding location '{}'", payload.name);

        let response = self
            .client
            .post(self.url("api/location")?)
            .json(payload)
            .send()
            .await?;
        required_data(read_success(response).await?, "created location")
    }

    pub async fn update_location(
        &self,
        id: i64,
        payload: &LocationPayload,
    ) -> Result<Location, ApiError> {
        payload.validate()?;
        info!("Updating location {}", id);

        let response = self
            .client
            .put(self.url(&format!("api/location/{}", id))?)
            .json(payload)
            .send()
            .await?;
        required_data(read_success(response).await?, "updated location")
    }

    pub async fn delete_location(&self, id: i64) -> Result<(), ApiError> {
        info!("Deleting location {}", id);

        let response = self
            .client
            .delete(self.url(&format!("api/location/{}", id))?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let _: Envelope<Value> = read_success(response).await?;
        Ok(())
    }

    /// Records of one location.
    ///
    /// The id is first sent as a query parameter, then as a JSON body if the
    /// server rejects that. A second rejection yields an empty list.
    pub async fn fetch_records(&self, location_id: i64) -> Result<Vec<VisitRecord>, ApiError> {
        let endpoint = self.url("api/records")?;
        let mut with_query = endpoint.clone();
        with_query
            .query_pairs_mut()
            .append_pair("locationid", &location_id.to_string());

        let mut response = self
            .client
            .post(with_query)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            debug!(
                "Query-parameter records request returned {}, retrying with JSON body",
                response.status()
            );
            response = self
                .client
                .post(endpoint)
                .json(&json!({ "locationid": location_id }))
                .send()
                .await?;
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Records request for location {} failed with {}: {}",
                location_id, status, body
            );
            return Ok(Vec::new());
        }

        let envelope: Envelope<Value> = read_json(response).await?;
        let success = envelope.is_success();
        let items = match envelope.data {
            Some(Value::Array(items)) if success => items,
            _ => {
                warn!(
                    "Unexpected records response for location {}: status '{}'",
                    location_id, envelope.status
                );
                return Ok(Vec::new());
            }
        };

        let records = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RecordWire>(item) {
                Ok(wire) => Some(VisitRecord::from_wire(
                    wire,
                    location_id,
                    &self.thumbnail_size,
                )),
                Err(e) => {
                    warn!("Skipping malformed record for location {}: {}", location_id, e);
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!("Fetched {} records for location {}", records.len(), location_id);
        Ok(records)
    }

    pub async fn create_record(&self, payload: &RecordCreate) -> Result<Value, ApiError> {
        info!("Creating record for location {}", payload.location_id);

        let response = self
            .client
            .post(self.url("api/record")?)
            .json(payload)
            .send()
            .await?;
        let envelope: Envelope<Value> = read_success(response).await?;
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    /// Sends only the changed fields.
    pub async fn update_record(&self, id: i64, changes: &RecordChanges) -> Result<Value, ApiError> {
        if changes.is_empty() {
            return Err(ApiError::InvalidInput("no field was modified".into()));
        }
        info!("Updating record {}", id);

        let response = self
            .client
            .put(self.url(&format!("api/record/{}", id))?)
            .json(changes)
            .send()
            .await?;
        let envelope: Envelope<Value> = read_success(response).await?;
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    pub async fn delete_record(&self, id: i64) -> Result<(), ApiError> {
        info!("Deleting record {}", id);

        let response = self
            .client
            .delete(self.url(&format!("api/record/{}", id))?)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let _: Envelope<Value> = read_success(response).await?;
        Ok(())
    }

    pub async fn fetch_villager_details(&self, id: i64) -> Result<Villager, ApiError> {
        if id <= 0 {
            return Err(ApiError::InvalidInput(format!("invalid villager id: {}", id)));
        }

        let url = Self::endpoint(&self.villager_base_url, &format!("api/villager/{}", id))?;
        let response = self.client.get(url).send().await?;
        let wire: VillagerWire = required_data(read_success(response).await?, "villager")?;
        Ok(Villager::from_wire(wire, &self.thumbnail_size))
    }

    /// Resolve a villager's id from their name.
    ///
    /// Misses scan the records of every location; ids seen along the way are
    /// remembered in `cache`.
    pub async fn find_villager_id(
        &self,
        cache: &mut VillagerIdCache,
        name: &str,
    ) -> Result<Option<i64>, ApiError> {
        let name = name.trim();
        if let Some(id) = cache.get(name) {
            debug!("Villager id for '{}' found in cache: {}", name, id);
            return Ok(Some(id));
        }
        self.scan_villager_id(name, cache).await
    }

    /// Scan the records of every location for `name`, stopping at the first
    /// location that links it to an id. Every linked participant seen is
    /// recorded in `seen`; per-location fetch failures are skipped.
    ///
    /// Callers sharing a cache can scan into a private one and merge it
    /// afterwards.
    pub async fn scan_villager_id(
        &self,
        name: &str,
        seen: &mut VillagerIdCache,
    ) -> Result<Option<i64>, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        for location in self.fetch_locations().await? {
            let records = match self.fetch_records(location.id).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Failed to fetch records of location {}: {}", location.id, e);
                    continue;
                }
            };
            seen.remember(&records);
            if let Some(id) = seen.get(name) {
                info!("Resolved villager '{}' to id {}", name, id);
                return Ok(Some(id));
            }
        }

        debug!("No villager id found for '{}'", name);
        Ok(None)
    }
}

/// Decode a JSON envelope, turning HTTP failures into `ApiError::Status`.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message())
            .unwrap_or_else(|| {
                format!(
                    "{} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                )
            });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Like `read_json`, but an unsuccessful envelope is an error.
async fn read_success<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ApiError> {
    let envelope: Envelope<T> = read_json(response).await?;
    if !envelope.is_success() {
        return Err(ApiError::Upstream(
            envelope
                .message
                .unwrap_or_else(|| format!("status '{}'", envelope.status)),
        ));
    }
    Ok(envelope)
}

fn required_data<T>(envelope: Envelope<T>, what: &str) -> Result<T, ApiError> {
    envelope
        .data
        .ok_or_else(|| ApiError::Upstream(format!("response carried no {}", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_prefix() {
        let base = Url::parse("https://archive.example.org/v2/").unwrap();
        assert_eq!(
            ApiClient::endpoint(&base, "/api/locations").unwrap().as_str(),
            "https://archive.example.org/v2/api/locations"
        );

        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            ApiClient::endpoint(&base, "api/villager/3").unwrap().as_str(),
            "http://localhost:8000/api/villager/3"
        );
    }

    #[test]
    fn test_villager_base_defaults_to_api_base() {
        let api = ApiConfig::default();
        let client = ApiClient::new(&api, &PhotoConfig::default()).unwrap();
        assert_eq!(client.villager_base_url, client.base_url);
    }
}
