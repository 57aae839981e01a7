//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, trace, warn};

use super::error::CdpError;
use super::protocol::{BrowserVersion, CdpRequest, CdpResponse, PageInfo};
use super::session::PageSession;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// Per-command response timeout.
pub(crate) const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Pending request waiting for response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

/// Send one request over the shared socket and wait for its response.
pub(crate) async fn send_request(
    ws_tx: &tokio::sync::Mutex<WsSink>,
    pending: &Mutex<HashMap<u64, PendingRequest>>,
    request: CdpRequest,
) -> Result<Value, CdpError> {
    let id = request.id;
    let method = request.method.clone();
    let json = serde_json::to_string(&request)?;
    trace!("CDP send: {}", json);

    let (tx, rx) = oneshot::channel();
    pending.lock().insert(id, PendingRequest { tx });

    {
        let mut ws = ws_tx.lock().await;
        if let Err(e) = ws.send(Message::Text(json.into())).await {
            pending.lock().remove(&id);
            return Err(e.into());
        }
    }

    match tokio::time::timeout(COMMAND_TIMEOUT, rx).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(CdpError::SessionClosed),
        Err(_) => {
            pending.lock().remove(&id);
            Err(CdpError::Timeout(format!("Request {} timed out", method)))
        }
    }
}

/// CDP client for browser automation.
pub struct CdpClient {
    /// HTTP endpoint for page discovery.
    http_endpoint: String,
    /// Browser WebSocket URL.
    browser_ws_url: String,
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    request_id: Arc<AtomicU64>,
    pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
    /// Event channels by session ID.
    event_handlers: EventHandlers,
    _recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given endpoint (e.g. "http://localhost:9222").
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        debug!("Connected to browser: {}", version.browser);

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let ws_tx = Arc::new(tokio::sync::Mutex::new(ws_sink));
        let pending: Arc<Mutex<HashMap<u64, PendingRequest>>> = Arc::new(Mutex::new(HashMap::new()));
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending, event_handlers).await;
            })
        };

        debug!("CDP client connected to {}", browser_ws_url);

        Ok(Self {
            http_endpoint,
            browser_ws_url,
            ws_tx,
            request_id: Arc::new(AtomicU64::new(1)),
            pending,
            event_handlers,
            _recv_task: recv_task,
        })
    }

    async fn receive_loop(
        mut ws_source: WsSource,
        pending: Arc<Mutex<HashMap<u64, PendingRequest>>>,
        event_handlers: EventHandlers,
    ) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => {
                            if let Some(id) = resp.id {
                                let pending_req = pending.lock().remove(&id);
                                if let Some(req) = pending_req {
                                    let result = if let Some(error) = resp.error {
                                        Err(CdpError::Protocol {
                                            code: error.code,
                                            message: error.message,
                                        })
                                    } else {
                                        Ok(resp.result.unwrap_or(Value::Null))
                                    };
                                    let _ = req.tx.send(result);
                                }
                            } else if resp.method.is_some() {
                                let session_id = resp.session_id.clone().unwrap_or_default();
                                let handlers = event_handlers.read().await;
                                if let Some(tx) = handlers.get(&session_id) {
                                    let _ = tx.send(resp);
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Failed to parse CDP message: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        // Wake any callers still waiting; their senders drop here.
        pending.lock().clear();
    }

    /// Send a browser-level CDP command and wait for the response.
    pub async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let request = CdpRequest {
            id: self.request_id.fetch_add(1, Ordering::SeqCst),
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };
        send_request(&self.ws_tx, &self.pending, request).await
    }

    pub fn browser_ws_url(&self) -> &str {
        &self.browser_ws_url
    }

    /// Open a blank tab and attach a flattened session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // Chrome requires PUT for /json/new
        let create_url = format!("{}/json/new", self.http_endpoint);
        let page_info: PageInfo = reqwest::Client::new()
            .put(&create_url)
            .send()
            .await?
            .json()
            .await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": page_info.id,
                    "flatten": true
                })),
                None,
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        let session = PageSession::new(
            page_info.id.clone(),
            session_id,
            self.ws_tx.clone(),
            self.pending.clone(),
            self.request_id.clone(),
            event_rx,
        );

        session.enable_domains().await?;

        Ok(session)
    }

    /// Close a page/target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.call(
            "Target.closeTarget",
            Some(json!({"targetId": target_id})),
            None,
        )
        .await?;
        Ok(())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
