//! Session controller: the single entry point the presentation layer calls.
//!
//! Owns the transcript and the request state machine, gates submissions on
//! connectivity, and drives one exchange at a time through the backend and
//! the typewriter reveal. All mutation happens through `&mut self` on one
//! event-loop task; the only concurrent activity is the connectivity monitor,
//! which shares nothing but its watch channel.

use std::sync::Arc;
use tokio::sync::watch;

use crate::backend::AnswerBackend;
use crate::config::Config;
use crate::connectivity::{self, ConnectivityState};
use crate::reveal::{self, RevealPacing};
use crate::transcript::{Message, Role, Transcript};

/// Fixed reply appended when the answer request fails. The underlying error
/// goes to the log, never into the transcript.
pub const APOLOGY: &str = "Üzgünüm, bir hata oluştu. Lütfen tekrar deneyin.";

/// Canonical sidebar questions, offered to pre-fill the input.
pub const EXAMPLE_QUESTIONS: [&str; 4] = [
    "Garanti belgesi nedir?",
    "İade süresi kaç gün?",
    "Elektronik ürünlerin garantisi kaç yıl?",
    "Tüketici hakem heyetine nasıl başvurabilirim?",
];

/// Where the controller is in the current exchange. There is never more than
/// one exchange in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Ready for a new question.
    #[default]
    Idle,
    /// Question sent, waiting for the backend.
    AwaitingAnswer,
    /// Answer received, reveal in progress.
    Streaming,
}

/// Result of one `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exchange finished; the full answer is the last transcript message.
    Completed,
    /// Backend request failed; the apology was appended instead.
    Failed,
    /// A precondition did not hold; the transcript is unchanged.
    Ignored,
}

pub struct ChatController<B: AnswerBackend> {
    backend: Arc<B>,
    transcript: Transcript,
    state: RequestState,
    connectivity: watch::Receiver<ConnectivityState>,
    pacing: RevealPacing,
}

impl<B: AnswerBackend + 'static> ChatController<B> {
    /// Build the controller and start connectivity polling.
    pub fn start(backend: B, config: &Config) -> Self {
        let backend = Arc::new(backend);
        let rx = connectivity::spawn_monitor(backend.clone(), config.connectivity.poll_interval());
        Self::with_connectivity(backend, rx, config.reveal.pacing())
    }

    /// Controller wired to an externally provided connectivity feed.
    pub fn with_connectivity(
        backend: Arc<B>,
        connectivity: watch::Receiver<ConnectivityState>,
        pacing: RevealPacing,
    ) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            state: RequestState::Idle,
            connectivity,
            pacing,
        }
    }

    pub fn connectivity(&self) -> ConnectivityState {
        *self.connectivity.borrow()
    }

    pub fn request_state(&self) -> RequestState {
        self.state
    }

    /// Read-only transcript snapshot for the presentation layer.
    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// True while the input field should accept typing.
    pub fn input_enabled(&self) -> bool {
        self.connectivity() == ConnectivityState::Connected && self.state == RequestState::Idle
    }

    /// True when `draft` could be submitted right now.
    pub fn can_submit(&self, draft: &str) -> bool {
        self.input_enabled() && !draft.trim().is_empty()
    }

    /// Example question text for pre-filling the input; never submits.
    pub fn pick_example(&self, index: usize) -> Option<&'static str> {
        EXAMPLE_QUESTIONS.get(index).copied()
    }

    /// Suspend until connectivity changes; returns the new state. Falls back
    /// to the last known state if the monitor task is gone.
    pub async fn connectivity_changed(&mut self) -> ConnectivityState {
        let _ = self.connectivity.changed().await;
        *self.connectivity.borrow()
    }

    /// Run one question/answer exchange. A no-op (`Ignored`) unless the
    /// question is non-empty after trimming, the backend is connected, and no
    /// exchange is in flight. `on_chunk` receives each revealed delta so the
    /// caller can render partial answers between chunks.
    ///
    /// An exchange in flight cannot be cancelled; resubmission while one is
    /// running is rejected rather than queued.
    pub async fn submit(
        &mut self,
        question: &str,
        on_chunk: Option<&mut (dyn FnMut(&str) + Send)>,
    ) -> SubmitOutcome {
        let question = question.trim();
        if !self.can_submit(question) {
            log::debug!(
                "controller: submit ignored (state {:?}, connectivity {})",
                self.state,
                self.connectivity()
            );
            return SubmitOutcome::Ignored;
        }

        self.state = RequestState::AwaitingAnswer;
        self.transcript.append(Role::User, question);
        log::info!("controller: question submitted ({} chars)", question.len());

        let answer = match self.backend.answer(question).await {
            Ok(a) => a,
            Err(e) => {
                log::warn!("controller: answer request failed: {}", e);
                self.transcript.append(Role::Assistant, APOLOGY);
                self.state = RequestState::Idle;
                return SubmitOutcome::Failed;
            }
        };

        self.state = RequestState::Streaming;
        reveal::reveal(&mut self.transcript, self.pacing, &answer, on_chunk).await;
        self.state = RequestState::Idle;
        SubmitOutcome::Completed
    }
}
