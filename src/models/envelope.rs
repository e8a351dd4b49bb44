use serde::{Deserialize, Serialize};

/// Response wrapper used by every archive API endpoint: `{status, data, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub const SUCCESS: &'static str = "success";

    pub fn success(data: T) -> Self {
        Self {
            status: Self::SUCCESS.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }
}

/// FastAPI-style error body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` rendered as a message; validation errors come as arrays.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(json!([1, 2]));
        assert!(envelope.is_success());
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"status": "success", "data": [1, 2]})
        );
    }

    #[test]
    fn test_error_detail_message() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "location not found"})).unwrap();
        assert_eq!(body.message().as_deref(), Some("location not found"));

        let body: ErrorBody =
            serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).unwrap();
        assert_eq!(body.message().as_deref(), Some(r#"[{"msg":"field required"}]"#));

        assert_eq!(ErrorBody::default().message(), None);
    }
}
