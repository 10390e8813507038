//! TCP session loop for frame-by-frame OCR.
//!
//! One connection is one session: frames in, one JSON response per frame
//! out. A lost connection tears down that session only; the accept loop
//! keeps serving.

use std::sync::Arc;

use livecap_ocr::{filter_confident, Frame, TextDetector};
use livecap_text::SegmentGrouper;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

use crate::codec::{self, FrameResponse};
use crate::config::OcrConfig;
use crate::{Result, ServerError};

pub struct OcrServer {
    detector: Arc<dyn TextDetector>,
    grouper: Arc<SegmentGrouper>,
    config: OcrConfig,
}

impl OcrServer {
    pub fn new(
        detector: Arc<dyn TextDetector>,
        grouper: Arc<SegmentGrouper>,
        config: OcrConfig,
    ) -> Self {
        Self {
            detector,
            grouper,
            config,
        }
    }

    /// Accept connections until cancelled.
    ///
    /// Each connection runs as its own task with fully independent session
    /// state; a session-fatal error closes that connection and the loop
    /// returns to accepting.
    pub async fn serve(&self, listener: TcpListener, cancel: CancellationToken) -> Result<()> {
        tracing::info!(addr = %listener.local_addr()?, "ocr server listening");

        loop {
            let (stream, peer) = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("ocr server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => accepted?,
            };

            tracing::info!(%peer, "client connected");
            let session = OcrSession::new(
                Arc::clone(&self.detector),
                Arc::clone(&self.grouper),
                self.config,
            );
            let session_cancel = cancel.child_token();

            tokio::spawn(async move {
                match session.run(stream, session_cancel).await {
                    Ok(()) => tracing::info!(%peer, "session ended"),
                    Err(ServerError::ConnectionLost) => {
                        tracing::info!(%peer, "client disconnected, awaiting reconnection")
                    }
                    Err(e) => tracing::warn!(%peer, error = %e, "session failed"),
                }
            });
        }
    }
}

/// Per-connection session state.
struct OcrSession {
    detector: Arc<dyn TextDetector>,
    grouper: Arc<SegmentGrouper>,
    config: OcrConfig,
    /// Concatenated text of the previous emission; identical consecutive
    /// frames are suppressed. Per-session on purpose: a process-wide key
    /// would let concurrent sessions corrupt each other's de-duplication.
    last_emitted: Option<String>,
}

impl OcrSession {
    fn new(detector: Arc<dyn TextDetector>, grouper: Arc<SegmentGrouper>, config: OcrConfig) -> Self {
        Self {
            detector,
            grouper,
            config,
            last_emitted: None,
        }
    }

    async fn run(mut self, mut stream: TcpStream, cancel: CancellationToken) -> Result<()> {
        loop {
            let frame = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                read = codec::read_frame(&mut stream) => match read {
                    Ok(frame) => frame,
                    Err(ServerError::MalformedFrame(detail)) => {
                        // Unit rejected, session continues; the client still
                        // gets its one response for the frame.
                        tracing::warn!(%detail, "rejected malformed frame");
                        codec::write_response(&mut stream, &FrameResponse::empty()).await?;
                        continue;
                    }
                    Err(e) => return Err(e),
                },
            };

            let response = tokio::select! {
                // In-flight detection results are discarded once cancelled.
                _ = cancel.cancelled() => return Ok(()),
                resp = self.process_frame(frame) => match resp {
                    Ok(response) => response,
                    Err(ServerError::Ocr(e)) => {
                        // Inference failure is non-fatal: drop the unit,
                        // retry fresh on the next frame.
                        tracing::warn!(error = %e, "detection failed, frame dropped");
                        FrameResponse::empty()
                    }
                    Err(e) => return Err(e),
                },
            };

            codec::write_response(&mut stream, &response).await?;
        }
    }

    /// Detect, confidence-filter, group, and de-duplicate one frame.
    async fn process_frame(&mut self, frame: Frame) -> Result<FrameResponse> {
        let detector = Arc::clone(&self.detector);
        let detections = tokio::task::spawn_blocking(move || detector.detect(&frame))
            .await
            .map_err(|e| livecap_ocr::OcrError::DetectionFailed(e.to_string()))??;

        let fragments = filter_confident(detections, self.config.min_confidence);
        if fragments.is_empty() {
            return Ok(FrameResponse::empty());
        }

        let paragraphs = self.grouper.group(&fragments)?;
        let key: String = paragraphs.iter().map(|p| p.text.as_str()).collect();
        if self.last_emitted.as_deref() == Some(key.as_str()) {
            tracing::debug!("duplicate frame suppressed");
            return Ok(FrameResponse::empty());
        }
        self.last_emitted = Some(key);

        Ok(FrameResponse::from_paragraphs(paragraphs))
    }
}
