//! Client library and terminal chat interface for a Digital Twin backend.
//!
//! The [`TwinClient`] speaks the backend's small HTTP surface (one
//! `POST /chat` per conversational turn, plus read-only probes), and the
//! [`chat`] module layers an interactive widget on top of it.

// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use client::{ChatBackend, TwinClient};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use types::*;
