use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::types::message::MessageRole;

/// One entry of the conversation history the backend keeps per session.
///
/// The backend records timestamps as naive local wall-clock strings with no
/// UTC offset, so they are parsed and re-rendered verbatim rather than being
/// converted into any timezone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Author of the recorded message.
    pub role: MessageRole,

    /// Recorded message text.
    pub content: String,

    /// Wall-clock time at which the backend recorded the message.
    #[serde(with = "crate::utils::time::wall_clock")]
    pub timestamp: PrimitiveDateTime,
}

/// Response body of the backend's `GET /conversation/{session_id}` route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    /// Session the transcript belongs to.
    pub session_id: String,

    /// Recorded messages, oldest first.
    pub messages: Vec<TranscriptEntry>,
}
