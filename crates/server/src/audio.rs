//! Channel-fed audio session loop.
//!
//! Chunks arrive from a capture callback or socket reader on an mpsc
//! channel; transcript events leave on another. One session owns one
//! transcriber, so inference steps are strictly sequential within it.

use std::sync::Arc;

use livecap_asr::{ChunkOutcome, IncrementalTranscriber, Transcriber};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::Result;

/// What the sink receives from an audio session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// Take-back-and-extend step: retract `revise` trailing characters of
    /// the previously emitted text, then append `append`.
    Delta { revise: usize, append: String },
    /// A finalized utterance; preceding deltas for it will not be revised
    /// again.
    Utterance(String),
}

pub struct AudioSession {
    transcriber: IncrementalTranscriber,
    engine: Arc<dyn Transcriber>,
}

impl AudioSession {
    pub fn new(transcriber: IncrementalTranscriber, engine: Arc<dyn Transcriber>) -> Self {
        Self {
            transcriber,
            engine,
        }
    }

    /// Drive the session until the source closes or the token cancels.
    ///
    /// Engine calls run on the blocking pool; the session state is never
    /// borrowed across them, and results arriving after cancellation are
    /// discarded. Engine failures are non-fatal: the diff baseline is
    /// untouched and the next chunk retries.
    pub async fn run(
        mut self,
        mut chunks: mpsc::Receiver<Vec<f32>>,
        events: mpsc::Sender<TranscriptEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        loop {
            let chunk = tokio::select! {
                _ = cancel.cancelled() => break,
                received = chunks.recv() => match received {
                    Some(chunk) => chunk,
                    None => break,
                },
            };

            match self.transcriber.push_chunk(&chunk) {
                Ok(ChunkOutcome::Admitted) => {
                    if self.step(&events, &cancel).await.is_none() {
                        break;
                    }
                }
                Ok(ChunkOutcome::Silence { flushed }) => {
                    if let Some(utterance) = flushed {
                        if events
                            .send(TranscriptEvent::Utterance(utterance))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                }
                Err(e) => {
                    // Bad unit (e.g. empty chunk): drop it, keep the session.
                    tracing::warn!(error = %e, "chunk rejected");
                }
            }
        }

        // Source gone or cancelled: finalize whatever accumulated.
        if let Some(utterance) = self.transcriber.flush() {
            let _ = events.send(TranscriptEvent::Utterance(utterance)).await;
        }
        Ok(())
    }

    /// One inference step. Returns `None` when the session should stop.
    async fn step(
        &mut self,
        events: &mpsc::Sender<TranscriptEvent>,
        cancel: &CancellationToken,
    ) -> Option<()> {
        let wav = match self.transcriber.wav_snapshot() {
            Ok(Some(wav)) => wav,
            Ok(None) => return Some(()),
            Err(e) => {
                tracing::warn!(error = %e, "window serialization failed");
                return Some(());
            }
        };

        let engine = Arc::clone(&self.engine);
        let outcome = tokio::select! {
            _ = cancel.cancelled() => return None,
            joined = tokio::task::spawn_blocking(move || engine.transcribe(&wav)) => joined,
        };

        match outcome {
            Ok(Ok(text)) => {
                if let Some(delta) = self.transcriber.apply_transcript(text) {
                    if events
                        .send(TranscriptEvent::Delta {
                            revise: delta.revise,
                            append: delta.append,
                        })
                        .await
                        .is_err()
                    {
                        return None;
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "transcription failed, baseline kept");
            }
            Err(join) => {
                tracing::warn!(error = %join, "transcription task panicked");
            }
        }
        Some(())
    }
}
