//! Query intake controller
//!
//! Owns the live query buffer, the suggestion overlay, the recent-query cache
//! and voice dictation, and dispatches submissions to the search service.
//!
//! Background work (debounce timer, search requests, dictation, transcript
//! replay) runs on spawned tasks that only report back through a channel.
//! `process_next` applies those reports one at a time on the caller's task,
//! so all controller state is mutated from a single place.
//!
//! Submissions carry a generation number. Only a reply for the latest
//! generation is applied; anything older is discarded when it arrives.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::recent::RecentQueries;
use crate::config::Settings;
use crate::error::{OracleError, RecognitionError};
use crate::oracle::SearchOracle;
use crate::search::matching::contains_ignore_case;
use crate::search::{Candidate, PipelineOptions, ResultSet};
use crate::speech::SpeechRecognizer;

/// Search flow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeState {
    Idle,
    Typing,
    Submitted,
    AwaitingResponse,
    ResultsReady,
    Failed,
}

/// Voice dictation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceState {
    Idle,
    Listening,
    Transcribing,
}

/// Outcome of a submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Blank query; nothing was sent
    EmptyQuery,
    Dispatched { generation: u64 },
}

/// What `process_next` changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeEvent {
    SuggestionsUpdated { count: usize },
    ResultsReady { generation: u64, total: usize },
    SearchFailed {
        generation: u64,
        message: String,
        error: OracleError,
    },
    /// A reply for a superseded submission was dropped
    StaleDiscarded { generation: u64 },
    /// Dictation produced a transcript and replay started
    TranscriptReceived { chars: usize },
    TranscriptProgress { typed: usize, total: usize },
    /// Replay finished and the transcript was submitted
    VoiceSubmitted { submission: Submission },
    VoiceFailed { message: String },
    /// A timer or session that was cancelled after it fired
    Superseded,
}

/// Snapshot of intake state for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeView {
    pub state: IntakeState,
    pub voice: VoiceState,
    pub buffer: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub recent: Vec<String>,
    pub suggestions: Vec<String>,
    pub recent_overlay_visible: bool,
}

/// Tunables taken from `Settings`
#[derive(Debug, Clone)]
pub struct IntakeOptions {
    pub debounce: Duration,
    pub typing_interval: Duration,
    pub request_timeout: Duration,
    pub recent_capacity: usize,
    pub pipeline: PipelineOptions,
}

impl Default for IntakeOptions {
    fn default() -> Self {
        IntakeOptions::from(&Settings::default())
    }
}

impl From<&Settings> for IntakeOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            debounce: settings.debounce(),
            typing_interval: settings.typing_interval(),
            request_timeout: settings.request_timeout(),
            recent_capacity: settings.recent_capacity,
            pipeline: settings.pipeline_options(),
        }
    }
}

/// Reports sent back by background tasks
#[derive(Debug)]
enum Completion {
    SuggestDue {
        seq: u64,
    },
    SearchReply {
        generation: u64,
        query: String,
        reply: Result<Vec<Candidate>, OracleError>,
    },
    Recognized {
        session: u64,
        transcript: Result<String, RecognitionError>,
    },
    Typed {
        session: u64,
        typed: usize,
    },
    TypingDone {
        session: u64,
    },
}

pub struct IntakeController {
    oracle: Arc<dyn SearchOracle>,
    recognizer: Arc<dyn SpeechRecognizer>,
    options: IntakeOptions,

    state: IntakeState,
    buffer: String,
    suggestion_source: Vec<String>,
    suggestions: Vec<String>,
    recent: RecentQueries,
    recent_overlay_visible: bool,
    error_message: Option<String>,

    debouncer: Debouncer,
    /// Latest submission; replies for anything else are stale
    generation: u64,
    in_flight: Option<u64>,
    results: Option<ResultSet>,

    voice: VoiceState,
    voice_session: u64,
    voice_task: Option<JoinHandle<()>>,
    transcript: String,

    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl IntakeController {
    pub fn new(
        oracle: Arc<dyn SearchOracle>,
        recognizer: Arc<dyn SpeechRecognizer>,
        suggestion_source: Vec<String>,
        options: IntakeOptions,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            oracle,
            recognizer,
            debouncer: Debouncer::new(options.debounce),
            recent: RecentQueries::new(options.recent_capacity),
            options,
            state: IntakeState::Idle,
            buffer: String::new(),
            suggestion_source,
            suggestions: Vec::new(),
            recent_overlay_visible: false,
            error_message: None,
            generation: 0,
            in_flight: None,
            results: None,
            voice: VoiceState::Idle,
            voice_session: 0,
            voice_task: None,
            transcript: String::new(),
            tx,
            rx,
        }
    }

    /// A keystroke changed the input box
    ///
    /// The buffer updates at once; the suggestion filter runs after the
    /// debounce delay, and only for the last change inside that window.
    pub fn on_input_change(&mut self, text: &str) {
        if self.voice == VoiceState::Transcribing {
            debug!("Manual input interrupted transcript replay");
            self.cancel_voice();
        }

        self.buffer = text.to_string();
        self.recent_overlay_visible = self.buffer.is_empty();
        self.state = if self.buffer.is_empty() {
            IntakeState::Idle
        } else {
            IntakeState::Typing
        };

        let tx = self.tx.clone();
        self.debouncer.schedule(move |seq| {
            let _ = tx.send(Completion::SuggestDue { seq });
        });
    }

    /// The input box gained focus; offer recent searches while it is empty
    pub fn on_focus(&mut self) {
        self.recent_overlay_visible = self.buffer.is_empty() && !self.recent.is_empty();
    }

    /// Submit a query (Enter, search button, or finished dictation)
    pub fn on_submit(&mut self, text: &str) -> Submission {
        let query = text.trim();
        if query.is_empty() {
            debug!("Ignoring empty submission");
            return Submission::EmptyQuery;
        }

        // A manual submission overrides any dictation still in progress
        if self.voice != VoiceState::Idle {
            debug!("Submission cancelled active dictation");
            self.cancel_voice();
        }

        self.recent.push(query);
        self.buffer = query.to_string();
        self.hide_overlays();
        self.error_message = None;
        // No results are shown until the reply for this query lands
        self.results = None;

        self.generation += 1;
        let generation = self.generation;
        self.state = IntakeState::Submitted;
        info!("Submitting search #{}: '{}'", generation, query);

        let oracle = Arc::clone(&self.oracle);
        let tx = self.tx.clone();
        let limit = self.options.request_timeout;
        let query = query.to_string();
        tokio::spawn(async move {
            let reply = match tokio::time::timeout(limit, oracle.search(&query)).await {
                Ok(reply) => reply,
                Err(_) => Err(OracleError::Timeout(format!("no response after {:?}", limit))),
            };
            let _ = tx.send(Completion::SearchReply {
                generation,
                query,
                reply,
            });
        });

        self.in_flight = Some(generation);
        self.state = IntakeState::AwaitingResponse;

        Submission::Dispatched { generation }
    }

    /// Submit the `index`-th recent query (0 = most recent)
    pub fn select_recent(&mut self, index: usize) -> Option<Submission> {
        let query = self.recent.get(index)?.to_string();
        Some(self.on_submit(&query))
    }

    /// Start a single dictation session; false if one is already running
    pub fn on_voice_start(&mut self) -> bool {
        if self.voice != VoiceState::Idle {
            debug!("Dictation already in progress");
            return false;
        }

        self.voice_session += 1;
        let session = self.voice_session;
        self.voice = VoiceState::Listening;
        self.error_message = None;
        info!("Listening for dictation");

        let recognizer = Arc::clone(&self.recognizer);
        let tx = self.tx.clone();
        self.voice_task = Some(tokio::spawn(async move {
            let transcript = recognizer.recognize().await;
            let _ = tx.send(Completion::Recognized {
                session,
                transcript,
            });
        }));

        true
    }

    /// Empty the input box and close overlays; the recent cache is kept
    pub fn on_clear(&mut self) {
        if self.voice != VoiceState::Idle {
            debug!("Clear cancelled active dictation");
            self.cancel_voice();
        }
        self.debouncer.cancel();
        self.buffer.clear();
        self.hide_overlays();
        if self.state == IntakeState::Typing {
            self.state = IntakeState::Idle;
        }
    }

    /// Forget all recent queries
    pub fn clear_recent(&mut self) {
        self.recent.clear();
        self.recent_overlay_visible = false;
    }

    /// Wait for the next background report and apply it
    ///
    /// Cancel-safe: dropping the future before it completes loses nothing.
    pub async fn process_next(&mut self) -> IntakeEvent {
        // The controller holds a sender itself, so the channel never closes
        match self.rx.recv().await {
            Some(completion) => self.apply(completion),
            None => IntakeEvent::Superseded,
        }
    }

    fn apply(&mut self, completion: Completion) -> IntakeEvent {
        match completion {
            Completion::SuggestDue { seq } => {
                if !self.debouncer.settle(seq) {
                    return IntakeEvent::Superseded;
                }
                self.refresh_suggestions();
                IntakeEvent::SuggestionsUpdated {
                    count: self.suggestions.len(),
                }
            }
            Completion::SearchReply {
                generation,
                query,
                reply,
            } => self.apply_search_reply(generation, &query, reply),
            Completion::Recognized {
                session,
                transcript,
            } => self.apply_transcript(session, transcript),
            Completion::Typed { session, typed } => {
                if session != self.voice_session || self.voice != VoiceState::Transcribing {
                    return IntakeEvent::Superseded;
                }
                self.buffer = self.transcript.chars().take(typed).collect();
                IntakeEvent::TranscriptProgress {
                    typed,
                    total: self.transcript.chars().count(),
                }
            }
            Completion::TypingDone { session } => {
                if session != self.voice_session || self.voice != VoiceState::Transcribing {
                    return IntakeEvent::Superseded;
                }
                self.voice = VoiceState::Idle;
                self.voice_task = None;
                let transcript = std::mem::take(&mut self.transcript);
                let submission = self.on_submit(&transcript);
                IntakeEvent::VoiceSubmitted { submission }
            }
        }
    }

    fn apply_search_reply(
        &mut self,
        generation: u64,
        query: &str,
        reply: Result<Vec<Candidate>, OracleError>,
    ) -> IntakeEvent {
        if generation != self.generation {
            debug!(
                "Discarding stale reply #{} for '{}' (latest is #{})",
                generation, query, self.generation
            );
            return IntakeEvent::StaleDiscarded { generation };
        }

        self.in_flight = None;

        match reply {
            Ok(candidates) => {
                let set = ResultSet::build(query, generation, &candidates, self.options.pipeline);
                let total = set.len();
                info!(
                    "Search #{} '{}': {} of {} candidates relevant",
                    generation,
                    query,
                    total,
                    candidates.len()
                );
                self.results = Some(set);
                self.state = IntakeState::ResultsReady;
                IntakeEvent::ResultsReady { generation, total }
            }
            Err(e) => {
                warn!("Search #{} '{}' failed: {}", generation, query, e);
                let message = format!("Search failed: {}", e);
                self.error_message = Some(message.clone());
                self.state = IntakeState::Failed;
                IntakeEvent::SearchFailed {
                    generation,
                    message,
                    error: e,
                }
            }
        }
    }

    fn apply_transcript(
        &mut self,
        session: u64,
        transcript: Result<String, RecognitionError>,
    ) -> IntakeEvent {
        if session != self.voice_session || self.voice != VoiceState::Listening {
            return IntakeEvent::Superseded;
        }
        self.voice_task = None;

        let transcript = match transcript {
            Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
            Ok(_) => return self.fail_voice(RecognitionError::NoSpeech),
            Err(e) => return self.fail_voice(e),
        };

        self.start_replay(transcript)
    }

    fn fail_voice(&mut self, error: RecognitionError) -> IntakeEvent {
        warn!("Dictation failed: {}", error);
        self.voice = VoiceState::Idle;
        self.voice_task = None;
        if self.in_flight.is_none() {
            self.state = IntakeState::Idle;
        }

        let message = format!("Voice input failed: {}", error);
        self.error_message = Some(message.clone());
        IntakeEvent::VoiceFailed { message }
    }

    /// Replay the transcript into the buffer one char per interval, then submit
    fn start_replay(&mut self, transcript: String) -> IntakeEvent {
        let total = transcript.chars().count();
        debug!("Replaying {} transcript chars", total);

        self.voice = VoiceState::Transcribing;
        self.buffer.clear();
        self.hide_overlays();
        self.transcript = transcript;

        let session = self.voice_session;
        let interval = self.options.typing_interval;
        let tx = self.tx.clone();
        self.voice_task = Some(tokio::spawn(async move {
            for typed in 1..=total {
                tokio::time::sleep(interval).await;
                if tx.send(Completion::Typed { session, typed }).is_err() {
                    return;
                }
            }
            let _ = tx.send(Completion::TypingDone { session });
        }));

        IntakeEvent::TranscriptReceived { chars: total }
    }

    fn cancel_voice(&mut self) {
        if let Some(task) = self.voice_task.take() {
            task.abort();
        }
        // Reports already queued for the old session are ignored
        self.voice_session += 1;
        self.voice = VoiceState::Idle;
        self.transcript.clear();
    }

    fn hide_overlays(&mut self) {
        self.debouncer.cancel();
        self.suggestions.clear();
        self.recent_overlay_visible = false;
    }

    fn refresh_suggestions(&mut self) {
        self.suggestions = if self.buffer.is_empty() {
            Vec::new()
        } else {
            self.suggestion_source
                .iter()
                .filter(|s| contains_ignore_case(s, &self.buffer))
                .cloned()
                .collect()
        };
        debug!(
            "{} suggestions for '{}'",
            self.suggestions.len(),
            self.buffer
        );
    }

    pub fn view(&self) -> IntakeView {
        IntakeView {
            state: self.state,
            voice: self.voice,
            buffer: self.buffer.clone(),
            is_loading: self.in_flight.is_some(),
            error_message: self.error_message.clone(),
            recent: self.recent.to_vec(),
            suggestions: self.suggestions.clone(),
            recent_overlay_visible: self.recent_overlay_visible,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> IntakeState {
        self.state
    }

    #[cfg(test)]
    pub fn voice_state(&self) -> VoiceState {
        self.voice
    }

    #[cfg(test)]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Results of the latest successful search
    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// Mutable access for page navigation
    pub fn results_mut(&mut self) -> Option<&mut ResultSet> {
        self.results.as_mut()
    }
}

impl Drop for IntakeController {
    fn drop(&mut self) {
        if let Some(task) = self.voice_task.take() {
            task.abort();
        }
        self.recent.clear();
    }
}
