//! Client-side conversation state
//!
//! `ChatSession` is the single state container for one conversation. It is
//! only mutated through send-start, send-success/error, mode-change and
//! recognition-start/stop transitions.

use serde::{Deserialize, Serialize};

use crate::api::{ChatFailure, ChatRequest, HistoryEntry, TextPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// Model turn produced from a failed send
    pub failed: bool,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            failed: false,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            failed: false,
        }
    }

    fn failure(text: String) -> Self {
        Self {
            failed: true,
            ..Self::model(text)
        }
    }

    fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            role: self.role,
            parts: vec![TextPart {
                text: self.text.clone(),
            }],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenState {
    Off,
    Listening,
}

#[derive(Debug)]
pub struct ChatSession {
    transcript: Vec<Turn>,
    mode: String,
    draft: String,
    send_state: SendState,
    listen_state: ListenState,
    speak_replies: bool,
}

impl ChatSession {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            transcript: Vec::new(),
            mode: mode.into(),
            draft: String::new(),
            send_state: SendState::Idle,
            listen_state: ListenState::Off,
            speak_replies: false,
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    pub fn listen_state(&self) -> ListenState {
        self.listen_state
    }

    pub fn is_busy(&self) -> bool {
        self.send_state == SendState::Sending
    }

    pub fn speak_replies(&self) -> bool {
        self.speak_replies
    }

    pub fn set_speak_replies(&mut self, enabled: bool) {
        self.speak_replies = enabled;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Switch persona; later sends use the new mode
    pub fn set_mode(&mut self, mode: impl Into<String>) {
        self.mode = mode.into();
    }

    /// Send-start: returns the request to submit, or `None` when the draft is
    /// blank or a send is already in flight. `None` leaves state untouched.
    pub fn begin_send(&mut self) -> Option<ChatRequest> {
        if self.is_busy() || self.draft.trim().is_empty() {
            return None;
        }

        let message = std::mem::take(&mut self.draft);
        let history = self
            .transcript
            .iter()
            .map(Turn::to_history_entry)
            .collect();

        self.transcript.push(Turn::user(message.clone()));
        self.send_state = SendState::Sending;

        Some(ChatRequest {
            message,
            history,
            mode: self.mode.clone(),
        })
    }

    /// Send-success / send-error: appends the model turn and returns to idle
    pub fn finish_send(&mut self, outcome: Result<String, ChatFailure>) -> Option<&Turn> {
        if !self.is_busy() {
            return None;
        }

        let turn = match outcome {
            Ok(text) => Turn::model(text),
            Err(failure) => Turn::failure(failure.transcript_text()),
        };
        self.transcript.push(turn);
        self.send_state = SendState::Idle;
        self.transcript.last()
    }

    /// Recognition-start; false when already listening
    pub fn start_listening(&mut self) -> bool {
        if self.listen_state == ListenState::Listening {
            return false;
        }
        self.listen_state = ListenState::Listening;
        true
    }

    /// Recognition-stop: a transcript replaces the draft, errors and silence
    /// leave it alone
    pub fn finish_listening<E>(&mut self, outcome: Result<Option<String>, E>) -> bool {
        self.listen_state = ListenState::Off;
        match outcome {
            Ok(Some(text)) => {
                self.draft = text;
                true
            }
            Ok(None) | Err(_) => false,
        }
    }

    /// Start a new conversation with the same persona
    pub fn clear(&mut self) {
        if !self.is_busy() {
            self.transcript.clear();
        }
    }
}
