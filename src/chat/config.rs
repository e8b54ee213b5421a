//! Configuration types for the chat shell.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::DEFAULT_BASE_URL;

/// Environment variable consulted when `--url` is not given.
const ENV_BASE_URL: &str = "TWINCHAT_URL";

/// Default request timeout, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default page width, in columns.
const DEFAULT_PAGE_WIDTH: usize = 80;

/// Command-line arguments for the twinchat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the Digital Twin backend.
    #[arrrg(optional, "Backend base URL (default: http://localhost:8000)", "URL")]
    pub url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout: Option<u32>,

    /// Page width in columns.
    #[arrrg(optional, "Page width in columns (default: 80)", "COLUMNS")]
    pub width: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Skip the backend probe at startup.
    #[arrrg(flag, "Skip the backend probe at startup")]
    pub no_probe: bool,

    /// Log chat traffic to stderr.
    #[arrrg(flag, "Log chat traffic to stderr")]
    pub verbose: bool,
}

/// Configuration for the chat shell.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the Digital Twin backend.
    pub base_url: String,

    /// Request timeout applied to every backend call.
    pub timeout: Duration,

    /// Page width used to lay out the chat bubbles.
    pub width: usize,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to probe the backend's root route at startup.
    pub probe_on_start: bool,

    /// Whether to log chat traffic to stderr.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://localhost:8000/
    /// - Timeout: 60 seconds
    /// - Width: 80 columns
    /// - Color: enabled
    /// - Startup probe: enabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            width: DEFAULT_PAGE_WIDTH,
            use_color: true,
            probe_on_start: true,
            verbose: false,
        }
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the page width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Disables the startup probe.
    pub fn without_probe(mut self) -> Self {
        self.probe_on_start = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        // Flag beats environment beats default.
        let base_url = args
            .url
            .or_else(|| env::var(ENV_BASE_URL).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        ChatConfig {
            base_url,
            timeout: Duration::from_secs(
                args.timeout.map(u64::from).unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            width: args
                .width
                .map(|width| width as usize)
                .unwrap_or(DEFAULT_PAGE_WIDTH),
            use_color: !args.no_color,
            probe_on_start: !args.no_probe,
            verbose: args.verbose,
        }
    }
}
