use std::time::{Duration, Instant};

use crate::client::ChatBackend;
use crate::error::Error;
use crate::observability::{WIDGET_TURN_FAILURES, WIDGET_TURNS, WIDGET_TURNS_IGNORED};
use crate::render::Renderer;
use crate::types::{ChatRequest, Message};

/// Fixed assistant-voiced text appended to the conversation when a turn
/// fails for any reason. The underlying error is reported out of band.
pub const TURN_FAILED_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Whether a turn is currently in flight.
///
/// There is exactly one of these per widget; a second submission while
/// `AwaitingResponse` is ignored rather than queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// No request outstanding; input can be submitted.
    #[default]
    Idle,
    /// A request has been sent and its reply has not resolved yet.
    AwaitingResponse,
}

/// How a call to [`ChatWidget::submit_turn`] resolved.
#[derive(Debug)]
pub enum TurnOutcome {
    /// The submission precondition failed (blank input, or a turn already
    /// in flight). Nothing changed.
    Ignored,
    /// The backend replied and its message was appended.
    Replied,
    /// The exchange failed; the fallback message was appended in the
    /// twin's voice and the cause is carried here.
    Failed(Error),
}

impl TurnOutcome {
    /// Returns true if the submission was ignored.
    pub fn is_ignored(&self) -> bool {
        matches!(self, TurnOutcome::Ignored)
    }

    /// Returns true if the backend replied.
    pub fn is_replied(&self) -> bool {
        matches!(self, TurnOutcome::Replied)
    }

    /// Returns true if the turn failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, TurnOutcome::Failed(_))
    }
}

/// The chat widget: conversation state plus the submit-a-turn operation.
///
/// The widget owns an append-only message list, the pending input draft,
/// the in-flight flag, and the backend-assigned session identifier. It
/// drives a [`Renderer`] for everything the user sees; all appends funnel
/// through one place so the newest message is always brought into view.
pub struct ChatWidget {
    messages: Vec<Message>,
    input: String,
    turn_state: TurnState,
    session_id: Option<String>,
    turns_completed: u64,
    turns_failed: u64,
    last_turn_duration: Option<Duration>,
}

/// Aggregated stats for a chat widget.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The backend-assigned session identifier, if established.
    pub session_id: Option<String>,
    /// Turns that completed with a backend reply.
    pub turns_completed: u64,
    /// Turns that completed with the fallback message.
    pub turns_failed: u64,
    /// Wall-clock duration of the most recent turn, if any.
    pub last_turn_duration: Option<Duration>,
}

impl ChatWidget {
    /// Creates an empty widget with no session established.
    pub fn new() -> Self {
        ChatWidget {
            messages: Vec::new(),
            input: String::new(),
            turn_state: TurnState::Idle,
            session_id: None,
            turns_completed: 0,
            turns_failed: 0,
            last_turn_duration: None,
        }
    }

    /// Replaces the pending input draft.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns the pending input draft.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the conversation so far, oldest message first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns the backend-assigned session identifier, if established.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Returns whether a turn is currently in flight.
    pub fn turn_state(&self) -> TurnState {
        self.turn_state
    }

    /// Returns true while a request is outstanding.
    pub fn is_awaiting_response(&self) -> bool {
        self.turn_state == TurnState::AwaitingResponse
    }

    /// Submits the pending input as one conversational turn.
    ///
    /// If the draft is blank after trimming, or a turn is already in
    /// flight, nothing happens and the draft is left alone. Otherwise the
    /// draft is appended verbatim as a user message, cleared, and sent as
    /// exactly one request. The turn always resolves by appending exactly
    /// one assistant-voiced message: the backend's reply, or
    /// [`TURN_FAILED_MESSAGE`] if anything went wrong. The in-flight flag
    /// is cleared on both paths.
    ///
    /// The first successful reply establishes the session identifier;
    /// later replies never change it, and failures never clear it.
    pub async fn submit_turn<B: ChatBackend>(
        &mut self,
        backend: &B,
        renderer: &mut dyn Renderer,
    ) -> TurnOutcome {
        if self.input.trim().is_empty() || self.turn_state == TurnState::AwaitingResponse {
            WIDGET_TURNS_IGNORED.click();
            return TurnOutcome::Ignored;
        }

        let text = std::mem::take(&mut self.input);
        self.push_message(Message::user(text.clone()), renderer);
        self.turn_state = TurnState::AwaitingResponse;
        renderer.typing_started();

        let mut request = ChatRequest::new(text);
        if let Some(session_id) = &self.session_id {
            request = request.with_session_id(session_id.clone());
        }

        let started = Instant::now();
        let result = backend.send_chat(request).await;
        self.last_turn_duration = Some(started.elapsed());

        renderer.typing_finished();
        let outcome = match result {
            Ok(reply) => {
                if self.session_id.is_none() {
                    self.session_id = Some(reply.session_id);
                }
                self.push_message(Message::assistant(reply.response), renderer);
                self.turns_completed += 1;
                WIDGET_TURNS.click();
                TurnOutcome::Replied
            }
            Err(error) => {
                self.push_message(Message::assistant(TURN_FAILED_MESSAGE), renderer);
                self.turns_failed += 1;
                WIDGET_TURNS.click();
                WIDGET_TURN_FAILURES.click();
                TurnOutcome::Failed(error)
            }
        };
        self.turn_state = TurnState::Idle;
        outcome
    }

    /// Returns the current widget statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.message_count(),
            session_id: self.session_id.clone(),
            turns_completed: self.turns_completed,
            turns_failed: self.turns_failed,
            last_turn_duration: self.last_turn_duration,
        }
    }

    /// The only place the conversation grows. Messages are never edited or
    /// removed once appended.
    fn push_message(&mut self, message: Message, renderer: &mut dyn Renderer) {
        renderer.message_appended(&message);
        self.messages.push(message);
    }
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}
