//! Chat transcript: the ordered message history of one session.
//!
//! Append-only. The only mutation besides append is growing the active
//! streaming entry — the assistant message currently being revealed.

use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the transcript (role + text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Ordered message history. Historical messages are never edited, deleted,
/// or reordered, so indices are stable and append order is chronological
/// order.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    /// Index of the assistant entry currently being grown, if any.
    streaming: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished message; returns its index.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> usize {
        self.messages.push(Message {
            role,
            text: text.into(),
        });
        self.messages.len() - 1
    }

    /// Append an empty assistant message to be grown chunk by chunk; returns
    /// its index.
    pub fn begin_streaming_entry(&mut self) -> usize {
        let index = self.append(Role::Assistant, "");
        self.streaming = Some(index);
        index
    }

    /// Append `delta` to the active streaming entry. Growing anything other
    /// than the active last entry is a controller bug: debug builds abort,
    /// release builds log and drop the delta.
    pub fn grow_streaming_entry(&mut self, index: usize, delta: &str) {
        let active = self.streaming == Some(index) && index + 1 == self.messages.len();
        debug_assert!(active, "grow_streaming_entry on inactive entry {}", index);
        if !active {
            log::error!("transcript: grow_streaming_entry on inactive entry {}", index);
            return;
        }
        self.messages[index].text.push_str(delta);
    }

    /// Mark the streaming entry finished; its text is immutable from then on.
    pub fn finish_streaming_entry(&mut self, index: usize) {
        debug_assert!(
            self.streaming == Some(index),
            "finish_streaming_entry on inactive entry {}",
            index
        );
        if self.streaming == Some(index) {
            self.streaming = None;
        }
    }

    /// Read-only snapshot for the presentation layer.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
