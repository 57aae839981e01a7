//! Core session struct and CDP command dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cdp::client::{send_request, PendingRequest, WsSink};
use crate::cdp::error::CdpError;
use crate::cdp::protocol::{CdpRequest, CdpResponse, ScreenshotFormat, Viewport};

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// WebSocket sender (shared with client).
    pub(super) ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    /// Pending requests (shared with client).
    pub(super) pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    /// Request ID counter (shared with client).
    pub(super) request_id: Arc<AtomicU64>,
    /// Event receiver (kept alive to prevent sender errors).
    pub(super) _event_rx: mpsc::UnboundedReceiver<CdpResponse>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
        pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
        request_id: Arc<AtomicU64>,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            ws_tx,
            pending,
            request_id,
            _event_rx: event_rx,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        let request = CdpRequest {
            id: self.request_id.fetch_add(1, Ordering::SeqCst),
            method: method.to_string(),
            params,
            session_id: Some(self.session_id.clone()),
        };
        send_request(&self.ws_tx, &self.pending, request).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("DOM.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Take a screenshot, returning base64 image data.
    pub async fn screenshot(
        &self,
        format: ScreenshotFormat,
        clip: Option<Viewport>,
    ) -> Result<String, CdpError> {
        let mut params = json!({
            "format": format,
            "captureBeyondViewport": false,
        });

        if let Some(c) = clip {
            params["clip"] = serde_json::to_value(c)?;
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;

        result["data"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| CdpError::InvalidResponse("Missing screenshot data".to_string()))
    }
}
