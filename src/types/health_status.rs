use serde::{Deserialize, Serialize};

/// Payload of the backend's `GET /health` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Liveness marker; "healthy" when the service is up.
    pub status: String,

    /// Whether conversation memory is written to S3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_s3: Option<bool>,

    /// Model identifier the backend is configured with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrock_model: Option<String>,
}

impl HealthStatus {
    /// Returns true if the backend reported itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_deserialization() {
        let json = serde_json::json!({
            "status": "healthy",
            "use_s3": false,
            "bedrock_model": "amazon.nova-lite-v1:0"
        });
        let health: HealthStatus = serde_json::from_value(json).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.use_s3, Some(false));
        assert_eq!(health.bedrock_model.as_deref(), Some("amazon.nova-lite-v1:0"));
    }

    #[test]
    fn test_is_healthy_ignores_case() {
        let health = HealthStatus {
            status: "Healthy".to_string(),
            use_s3: None,
            bedrock_model: None,
        };
        assert!(health.is_healthy());
    }

    #[test]
    fn test_unhealthy_status() {
        let health = HealthStatus {
            status: "degraded".to_string(),
            use_s3: None,
            bedrock_model: None,
        };
        assert!(!health.is_healthy());
    }
}
