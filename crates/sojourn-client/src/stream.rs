//! Plan generation over the streaming endpoint.
//!
//! [`PlanClient`] POSTs the student profile to `/api/generate-plan-stream`
//! and reads the chunked response incrementally, emitting each decoded
//! [`StreamEvent`] through an [`EventSink`] in arrival order. A malformed
//! record is logged and dropped so one bad record does not abort the run.
//!
//! Cancellation: the caller holds a [`CancelToken`] and the read loop checks
//! it at every suspension point. Cancelling drops the response body, which
//! closes the underlying connection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, warn};

use sojourn_core::types::{StreamEvent, StudentProfile};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::sse::SseFramer;

/// Receiver for decoded stream events.
///
/// The TUI implements this over its UI message channel; tests collect into
/// a vector. Events are emitted strictly in arrival order, so a `result`
/// event is always seen after every preceding `status` event of its run.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: StreamEvent);
}

/// [`EventSink`] backed by a standard mpsc channel.
pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<StreamEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<StreamEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: StreamEvent) {
        let _ = self.tx.send(event);
    }
}

/// Cooperative cancellation handle for an in-flight plan stream.
///
/// Cloned freely; `cancel()` from any clone is observed by the read loop at
/// its next suspension point.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the associated stream.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Client for the plan generation stream.
pub struct PlanClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl PlanClient {
    /// Create a client from config.
    ///
    /// Only a connect timeout is set; the stream itself is open-ended and a
    /// stalled server simply leaves the last status in place.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ClientError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Submit `profile` and pump the event stream into `sink`.
    ///
    /// Returns once the server closes the stream, the token is cancelled,
    /// or transport fails. Application-level `error` events are emitted
    /// through the sink like any other event; they do not end the read loop.
    pub async fn generate_plan(
        &self,
        profile: &StudentProfile,
        sink: &dyn EventSink,
        cancel: &CancelToken,
    ) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let url = format!("{}/api/generate-plan-stream", self.config.base_url);
        debug!(%url, "submitting plan request");

        let response = self.client.post(&url).json(profile).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut framer = SseFramer::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            if cancel.is_cancelled() {
                debug!("plan stream cancelled, dropping connection");
                return Err(ClientError::Cancelled);
            }
            let chunk = chunk?;
            for payload in framer.push(&chunk) {
                dispatch_payload(&payload, sink);
            }
        }

        if let Some(payload) = framer.finish() {
            dispatch_payload(&payload, sink);
        }

        debug!("plan stream completed");
        Ok(())
    }
}

/// Parse one record payload and hand it to the sink.
///
/// Malformed JSON is swallowed by design: logged at warn, stream continues.
fn dispatch_payload(payload: &str, sink: &dyn EventSink) {
    match serde_json::from_str::<StreamEvent>(payload) {
        Ok(event) => sink.emit(event),
        Err(e) => {
            warn!(error = %e, payload_len = payload.len(), "skipping malformed stream record");
        }
    }
}
