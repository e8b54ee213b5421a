//! Output rendering for the chat interface.
//!
//! This module provides a trait-based rendering abstraction over the chat
//! view. The default implementation paints speech-bubble style output to
//! stdout: the twin's messages on the left, the user's on the right, with
//! dim timestamp labels and a transient typing indicator while a turn is in
//! flight.

use std::io::{self, Stdout, Write};

use time::UtcOffset;
use unicode_width::UnicodeWidthStr;

use crate::types::{Message, MessageRole, TranscriptEntry};
use crate::utils::time::{time_label, wall_clock_label};

/// ANSI escape code for dim text (timestamps, the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (the twin's avatar tag).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (the user's avatar tag).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code that returns the cursor and erases the current line.
const ANSI_ERASE_LINE: &str = "\r\x1b[2K";

/// ANSI escape code that moves the cursor up one line.
const ANSI_CURSOR_UP: &str = "\x1b[1A";

/// Avatar tag shown beside the twin's bubbles.
const ASSISTANT_AVATAR: &str = "[twin]";

/// Avatar tag shown beside the user's bubbles.
const USER_AVATAR: &str = "[you]";

/// Greeting shown while the conversation is empty.
const GREETING_HEADLINE: &str = "Hello! I'm your Digital Twin.";
const GREETING_PROMPT: &str = "Ask me anything about AI deployment!";

/// Narrower pages than this render badly; widths below it are bumped up.
const MIN_PAGE_WIDTH: usize = 24;

/// Trait for rendering the chat view.
///
/// This abstraction allows for different rendering strategies:
/// - Bubble-style output with ANSI styling
/// - Plain output without styling (for piping/redirecting)
/// - Recording renderers for tests
pub trait Renderer: Send {
    /// Shown when the conversation has no messages yet.
    fn render_greeting(&mut self);

    /// Called at the single point where the conversation grows.
    ///
    /// Paints the new message at the bottom of the output so the latest
    /// exchange is always in view.
    fn message_appended(&mut self, message: &Message);

    /// Shows the typing indicator.
    ///
    /// Called after the user half of a turn has been appended, while the
    /// backend reply is pending.
    fn typing_started(&mut self);

    /// Removes the typing indicator.
    ///
    /// Called exactly once per started turn, whether the turn succeeded or
    /// failed.
    fn typing_finished(&mut self);

    /// Repaints a transcript recorded by the backend.
    fn render_transcript(&mut self, entries: &[TranscriptEntry]);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

/// Bubble-style renderer with optional ANSI styling.
///
/// Timestamps on locally created messages are shown in `local_offset`;
/// transcript timestamps from the backend are shown verbatim because the
/// backend records naive wall-clock strings.
pub struct TerminalRenderer {
    stdout: Stdout,
    use_color: bool,
    width: usize,
    local_offset: UtcOffset,
    typing_visible: bool,
}

impl TerminalRenderer {
    /// Creates a new TerminalRenderer with ANSI colors enabled.
    pub fn new(width: usize, local_offset: UtcOffset) -> Self {
        Self::with_color(width, local_offset, true)
    }

    /// Creates a new TerminalRenderer with specified color setting.
    pub fn with_color(width: usize, local_offset: UtcOffset, use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            width: width.max(MIN_PAGE_WIDTH),
            local_offset,
            typing_visible: false,
        }
    }

    /// Erases the line the line editor echoed, so submitted text appears
    /// only as a bubble. Only possible when ANSI styling is on.
    pub fn erase_prompt_echo(&mut self) {
        if self.use_color {
            print!("{ANSI_CURSOR_UP}{ANSI_ERASE_LINE}");
            self.flush();
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clear_typing(&mut self) {
        if self.typing_visible {
            if self.use_color {
                print!("{ANSI_ERASE_LINE}");
            }
            self.typing_visible = false;
        }
    }

    fn bubble_width(&self) -> usize {
        (self.width * 7 / 10).max(16)
    }

    fn print_assistant_bubble(&mut self, content: &str, label: &str) {
        let indent = " ".repeat(display_width(ASSISTANT_AVATAR) + 1);
        let lines = wrap_content(content, self.bubble_width());
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                if self.use_color {
                    println!("{ANSI_CYAN}{ASSISTANT_AVATAR}{ANSI_RESET} {line}");
                } else {
                    println!("{ASSISTANT_AVATAR} {line}");
                }
            } else {
                println!("{indent}{line}");
            }
        }
        if self.use_color {
            println!("{indent}{ANSI_DIM}{label}{ANSI_RESET}");
        } else {
            println!("{indent}{label}");
        }
        println!();
    }

    fn print_user_bubble(&mut self, content: &str, label: &str) {
        let right_edge = self.width.saturating_sub(display_width(USER_AVATAR) + 1);
        let lines = wrap_content(content, self.bubble_width());
        for (i, line) in lines.iter().enumerate() {
            let aligned = right_aligned(line, right_edge);
            if i == 0 {
                if self.use_color {
                    println!("{aligned} {ANSI_GREEN}{USER_AVATAR}{ANSI_RESET}");
                } else {
                    println!("{aligned} {USER_AVATAR}");
                }
            } else {
                println!("{aligned}");
            }
        }
        let aligned_label = right_aligned(label, right_edge);
        if self.use_color {
            println!("{ANSI_DIM}{aligned_label}{ANSI_RESET}");
        } else {
            println!("{aligned_label}");
        }
        println!();
    }
}

impl Renderer for TerminalRenderer {
    fn render_greeting(&mut self) {
        println!();
        println!("{}", centered(GREETING_HEADLINE, self.width));
        if self.use_color {
            println!(
                "{ANSI_DIM}{}{ANSI_RESET}",
                centered(GREETING_PROMPT, self.width)
            );
        } else {
            println!("{}", centered(GREETING_PROMPT, self.width));
        }
        println!();
        self.flush();
    }

    fn message_appended(&mut self, message: &Message) {
        self.clear_typing();
        let label = time_label(message.timestamp, self.local_offset);
        match message.role {
            MessageRole::User => self.print_user_bubble(&message.content, &label),
            MessageRole::Assistant => self.print_assistant_bubble(&message.content, &label),
        }
        self.flush();
    }

    fn typing_started(&mut self) {
        if self.use_color {
            print!("{ANSI_DIM}{ASSISTANT_AVATAR} is typing...{ANSI_RESET}");
            self.typing_visible = true;
        } else {
            println!("{ASSISTANT_AVATAR} is typing...");
        }
        self.flush();
    }

    fn typing_finished(&mut self) {
        self.clear_typing();
        self.flush();
    }

    fn render_transcript(&mut self, entries: &[TranscriptEntry]) {
        self.clear_typing();
        for entry in entries {
            let label = wall_clock_label(entry.timestamp);
            match entry.role {
                MessageRole::User => self.print_user_bubble(&entry.content, &label),
                MessageRole::Assistant => self.print_assistant_bubble(&entry.content, &label),
            }
        }
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        self.clear_typing();
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_typing();
        eprintln!("\nError: {error}");
    }
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Wraps content to the given width, preserving explicit line breaks.
fn wrap_content(content: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        for line in textwrap::wrap(paragraph, width) {
            lines.push(line.into_owned());
        }
    }
    lines
}

fn right_aligned(line: &str, right_edge: usize) -> String {
    let pad = right_edge.saturating_sub(display_width(line));
    format!("{}{}", " ".repeat(pad), line)
}

fn centered(line: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(line)) / 2;
    format!("{}{}", " ".repeat(pad), line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = TerminalRenderer::new(80, UtcOffset::UTC);
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = TerminalRenderer::with_color(80, UtcOffset::UTC, false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn bubble_width_is_seventy_percent_of_page() {
        let renderer = TerminalRenderer::new(100, UtcOffset::UTC);
        assert_eq!(renderer.bubble_width(), 70);
    }

    #[test]
    fn bubble_width_has_a_floor() {
        let renderer = TerminalRenderer::new(10, UtcOffset::UTC);
        assert_eq!(renderer.width, MIN_PAGE_WIDTH);
        assert_eq!(renderer.bubble_width(), 16);
    }

    #[test]
    fn wrap_preserves_explicit_line_breaks() {
        assert_eq!(wrap_content("one\ntwo", 40), vec!["one", "two"]);
    }

    #[test]
    fn wrap_keeps_blank_lines() {
        assert_eq!(wrap_content("a\n\nb", 40), vec!["a", "", "b"]);
    }

    #[test]
    fn wrap_breaks_long_paragraphs() {
        let lines = wrap_content("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(display_width(line) <= 10);
        }
    }

    #[test]
    fn right_aligned_pads_to_edge() {
        assert_eq!(right_aligned("hi", 10), "        hi");
    }

    #[test]
    fn right_aligned_never_truncates() {
        assert_eq!(right_aligned("abcdefghijk", 5), "abcdefghijk");
    }

    #[test]
    fn centered_splits_padding() {
        assert_eq!(centered("ab", 10), "    ab");
    }
}
