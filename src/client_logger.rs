//! Logging trait for Digital Twin client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log the chat traffic passing through the [`TwinClient`].
//!
//! [`TwinClient`]: crate::TwinClient

use crate::error::Error;
use crate::types::{ChatRequest, ChatResponse};

/// A trait for logging Digital Twin client operations.
///
/// Implement this trait to capture every chat exchange: the request as it
/// goes out, the reply as it comes back, and any failure in between.
///
/// # Example
///
/// ```rust,ignore
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// use twinchat::{ChatRequest, ChatResponse, ClientLogger, Error};
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, request: &ChatRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Request: {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_reply(&self, reply: &ChatResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Reply: {}", serde_json::to_string(reply).unwrap()).unwrap();
///     }
///
///     fn log_failure(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "Failure: {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a chat request immediately before it is sent.
    fn log_request(&self, request: &ChatRequest);

    /// Log a successful chat reply.
    fn log_reply(&self, reply: &ChatResponse);

    /// Log a failed chat exchange.
    ///
    /// Called for transport failures, timeouts, non-success statuses, and
    /// replies that could not be parsed.
    fn log_failure(&self, error: &Error);
}
