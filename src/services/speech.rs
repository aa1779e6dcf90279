//! Speech-to-Text Service
//!
//! Thin state machine over a platform recognition backend. The backend owns
//! the actual audio capture and recognition; this service owns the
//! idle/recording/paused lifecycle and guarantees transitions only happen
//! from valid states. Pause is synthesized: the backend has no native pause,
//! so pausing stops the stream and resuming starts a fresh one against the
//! same sink.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Lifecycle state of the recognition session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    Paused,
}

/// Errors raised by the recognition backend.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech recognition not supported on this platform")]
    Unsupported,

    #[error("recognition failed to start: {0}")]
    StartFailed(String),
}

type TranscriptFn = Box<dyn FnMut(&str, bool) + Send>;
type ErrorFn = Box<dyn FnMut(&str) + Send>;

/// Delivery target for recognition output. Cloneable so a resumed stream can
/// reuse the sink the session started with.
#[derive(Clone, Default)]
pub struct RecognitionSink {
    inner: Arc<Mutex<SinkCallbacks>>,
}

#[derive(Default)]
struct SinkCallbacks {
    on_transcript: Option<TranscriptFn>,
    on_error: Option<ErrorFn>,
}

impl RecognitionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_transcript(self, f: impl FnMut(&str, bool) + Send + 'static) -> Self {
        self.inner.lock().unwrap().on_transcript = Some(Box::new(f));
        self
    }

    pub fn on_error(self, f: impl FnMut(&str) + Send + 'static) -> Self {
        self.inner.lock().unwrap().on_error = Some(Box::new(f));
        self
    }

    /// Deliver a transcript fragment. `is_final` marks a finalized segment as
    /// opposed to an interim hypothesis.
    pub fn transcript(&self, text: &str, is_final: bool) {
        if let Some(f) = self.inner.lock().unwrap().on_transcript.as_mut() {
            f(text, is_final);
        }
    }

    /// Deliver a recognition error message.
    pub fn error(&self, message: &str) {
        if let Some(f) = self.inner.lock().unwrap().on_error.as_mut() {
            f(message);
        }
    }
}

/// Platform recognition backend. One `start` opens one stream; `stop` ends
/// it. A backend reports transcripts and errors through the sink it was
/// started with.
pub trait RecognitionBackend: Send {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(&mut self, sink: RecognitionSink) -> Result<(), SpeechError>;

    fn stop(&mut self);
}

/// State machine driving a recognition backend.
pub struct SpeechToTextService<B> {
    backend: B,
    state: RecordingState,
    sink: Option<RecognitionSink>,
}

impl<B: RecognitionBackend> SpeechToTextService<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RecordingState::Idle,
            sink: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Start a new recognition session delivering into `sink`.
    ///
    /// Unsupported platforms report through the sink's error callback rather
    /// than panicking. Calling while already recording is a no-op.
    pub fn start_recording(&mut self, sink: RecognitionSink) {
        if self.state == RecordingState::Recording {
            tracing::debug!("start_recording ignored, already recording");
            return;
        }
        if !self.backend.is_supported() {
            sink.error("Speech recognition not supported");
            return;
        }

        match self.backend.start(sink.clone()) {
            Ok(()) => {
                self.sink = Some(sink);
                self.state = RecordingState::Recording;
            }
            Err(e) => {
                tracing::warn!(error = %e, "recognition failed to start");
                sink.error(&format!("Failed to start recording: {}", e));
            }
        }
    }

    /// End the session from any active state.
    pub fn stop_recording(&mut self) {
        if self.state == RecordingState::Idle {
            return;
        }
        self.backend.stop();
        self.sink = None;
        self.state = RecordingState::Idle;
    }

    /// Suspend capture, keeping the session resumable. Only valid while
    /// recording.
    pub fn pause_recording(&mut self) {
        if self.state != RecordingState::Recording {
            return;
        }
        self.backend.stop();
        self.state = RecordingState::Paused;
    }

    /// Resume a paused session on a fresh backend stream, reusing the
    /// original sink.
    pub fn resume_recording(&mut self) {
        if self.state != RecordingState::Paused {
            return;
        }
        let Some(sink) = self.sink.clone() else {
            self.state = RecordingState::Idle;
            return;
        };

        match self.backend.start(sink.clone()) {
            Ok(()) => self.state = RecordingState::Recording,
            Err(e) => {
                tracing::warn!(error = %e, "recognition failed to resume");
                sink.error(&format!("Failed to start recording: {}", e));
                self.sink = None;
                self.state = RecordingState::Idle;
            }
        }
    }

    /// Notification that the backend stream ended on its own. While paused
    /// the stop was deliberate and the paused state survives; otherwise the
    /// session is over.
    pub fn handle_stream_end(&mut self) {
        if self.state == RecordingState::Recording {
            self.sink = None;
            self.state = RecordingState::Idle;
        }
    }
}
