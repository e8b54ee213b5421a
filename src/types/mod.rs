// Public modules
pub mod chat_request;
pub mod chat_response;
pub mod conversation_history;
pub mod health_status;
pub mod message;
pub mod service_info;

// Re-exports
pub use chat_request::ChatRequest;
pub use chat_response::ChatResponse;
pub use conversation_history::{ConversationHistory, TranscriptEntry};
pub use health_status::HealthStatus;
pub use message::{Message, MessageRole};
pub use service_info::ServiceInfo;
