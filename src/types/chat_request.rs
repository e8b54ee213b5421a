use serde::{Deserialize, Serialize};

/// Request body for the backend's `POST /chat` route.
///
/// One request is sent per submitted turn. The `session_id` key is omitted
/// entirely from the JSON until the backend has assigned one; after that the
/// same identifier is echoed on every request so the backend can keep
/// appending to the same conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message text, sent verbatim.
    pub message: String,

    /// Conversation identifier assigned by the backend, if established.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Creates a request with no session identifier.
    pub fn new(message: impl Into<String>) -> Self {
        ChatRequest {
            message: message.into(),
            session_id: None,
        }
    }

    /// Sets the session identifier to echo back to the backend.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization_without_session() {
        let request = ChatRequest::new("Hello");
        let json = serde_json::to_value(&request).unwrap();
        let expected = serde_json::json!({
            "message": "Hello"
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_chat_request_serialization_with_session() {
        let request = ChatRequest::new("Hello again").with_session_id("abc");
        let json = serde_json::to_value(&request).unwrap();
        let expected = serde_json::json!({
            "message": "Hello again",
            "session_id": "abc"
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_chat_request_deserialization() {
        let json = serde_json::json!({
            "message": "Hello"
        });
        let request: ChatRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.message, "Hello");
        assert_eq!(request.session_id, None);
    }

    #[test]
    fn test_message_is_sent_verbatim() {
        let request = ChatRequest::new("  spaces kept  ");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["message"], "  spaces kept  ");
    }
}
