//! Chat interface module for conversations with a Digital Twin backend.
//!
//! This module provides a terminal chat interface built on top of the
//! twinchat client library. It supports:
//!
//! - One-request-per-turn exchanges with the backend
//! - Bubble-style output with a typing indicator while a turn is in flight
//! - Slash commands for shell control
//! - Configurable backend URL, timeout, and page layout
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`widget`]: Conversation state and the submit-a-turn operation
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod widget;

pub use crate::render::{Renderer, TerminalRenderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use widget::{ChatWidget, SessionStats, TURN_FAILED_MESSAGE, TurnOutcome, TurnState};
