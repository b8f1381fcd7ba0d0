use std::time::Duration;

use async_trait::async_trait;
use futures::stream::Stream;
use log::{debug, info, warn};
use tokio_stream::StreamExt;

use crate::error::Result;

/// How long the capture loop waits between recognition events before
/// treating the candidate as done speaking.
pub const SILENCE_TIMEOUT: Duration = Duration::from_secs(3);

/// One event from the speech-to-text provider. Interim fragments are
/// delivered with `is_final = false` and are not accumulated.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechEvent {
    pub fragment: String,
    pub is_final: bool,
}

impl SpeechEvent {
    pub fn interim(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            is_final: false,
        }
    }

    pub fn final_result(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            is_final: true,
        }
    }
}

/// Boundary contract for the speech-to-text provider. At most one
/// recognition session runs at a time; `start` on a running recognizer
/// implicitly supersedes the previous session.
#[async_trait]
pub trait SpeechRecognizer: Send {
    async fn start(&mut self) -> Result<()>;
    async fn stop(&mut self) -> Result<()>;
    /// Next recognition event, or `None` once the provider's stream ends.
    async fn next_event(&mut self) -> Option<Result<SpeechEvent>>;
}

/// Adapter that drives a `SpeechRecognizer` from any event stream, e.g. a
/// provider websocket or a scripted test sequence.
pub struct StreamRecognizer<S> {
    events: S,
    running: bool,
}

impl<S> StreamRecognizer<S> {
    pub fn new(events: S) -> Self {
        Self {
            events,
            running: false,
        }
    }
}

#[async_trait]
impl<S> SpeechRecognizer for StreamRecognizer<S>
where
    S: Stream<Item = Result<SpeechEvent>> + Unpin + Send,
{
    async fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<Result<SpeechEvent>> {
        if !self.running {
            return None;
        }
        self.events.next().await
    }
}

/// Accumulates the answer transcript for the question currently being
/// answered. Final fragments are appended with a separating space; interim
/// fragments are ignored.
#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    buffer: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &SpeechEvent) {
        if event.is_final {
            self.buffer.push_str(&event.fragment);
            self.buffer.push(' ');
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whitespace-only accumulations count as empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Drain the buffer, returning the trimmed transcript. Leaves the
    /// accumulator ready for the next question.
    pub fn take(&mut self) -> String {
        let text = self.buffer.trim().to_string();
        self.buffer.clear();
        text
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Run one recording pass for the current question: start recognition, feed
/// every final fragment into the accumulator, and stop after
/// `SILENCE_TIMEOUT` without any event. Text accumulated before a silence
/// stop or a provider error is kept, so the candidate can submit or retry.
pub async fn listen_for_answer(
    recognizer: &mut dyn SpeechRecognizer,
    accumulator: &mut TranscriptAccumulator,
) -> Result<()> {
    recognizer.start().await?;
    info!("Listening for answer");

    loop {
        match tokio::time::timeout(SILENCE_TIMEOUT, recognizer.next_event()).await {
            Err(_) => {
                debug!("Silence timeout reached, stopping recognition");
                recognizer.stop().await?;
                return Ok(());
            }
            Ok(None) => return Ok(()),
            Ok(Some(Ok(event))) => accumulator.push(&event),
            Ok(Some(Err(e))) => {
                warn!("{}", e);
                let _ = recognizer.stop().await;
                return Err(e);
            }
        }
    }
}
