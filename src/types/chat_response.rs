use serde::{Deserialize, Serialize};

/// Response body of the backend's `POST /chat` route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The twin's reply text.
    pub response: String,

    /// Conversation identifier for this exchange. Present on every reply;
    /// the widget only adopts it the first time.
    pub session_id: String,
}

impl ChatResponse {
    /// Creates a new chat response.
    pub fn new(response: impl Into<String>, session_id: impl Into<String>) -> Self {
        ChatResponse {
            response: response.into(),
            session_id: session_id.into(),
        }
    }
}
