use serde::{Deserialize, Serialize};

/// Metadata reported by the backend's root route.
///
/// Only `message` is guaranteed; the remaining fields describe how the
/// backend was deployed and are treated as optional so the startup probe
/// keeps working against older builds of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service banner, e.g. "AI Digital Twin API".
    pub message: String,

    /// Whether the backend persists conversation memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_enabled: Option<bool>,

    /// Where conversation memory is stored ("s3" or "local").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// Model identifier the backend generates replies with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
}
