//! Navigation operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::debug;

use crate::cdp::error::CdpError;

use super::core::PageSession;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Navigate to URL and wait for the document to load.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        self.wait_for_load(timeout).await?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Wait for page load.
    pub async fn wait_for_load(&self, timeout: Duration) -> Result<(), CdpError> {
        self.wait_until("document.readyState === 'complete' || document.readyState === 'interactive'", timeout)
            .await
            .map_err(|e| match e {
                CdpError::Timeout(_) => CdpError::Timeout("Page load timeout".to_string()),
                other => other,
            })
    }

    /// Poll a boolean JavaScript expression until it holds.
    pub async fn wait_until(&self, expression: &str, timeout: Duration) -> Result<(), CdpError> {
        let start = Instant::now();

        loop {
            if self.evaluate(expression).await?.as_bool() == Some(true) {
                return Ok(());
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout(format!(
                    "Waiting for '{}' timed out",
                    expression
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Go back one history entry. Does nothing at the start of history.
    pub async fn go_back(&self, timeout: Duration) -> Result<(), CdpError> {
        let history = self.call("Page.getNavigationHistory", None).await?;

        if let Some(entry_id) = Self::previous_history_entry(&history) {
            self.call(
                "Page.navigateToHistoryEntry",
                Some(json!({"entryId": entry_id})),
            )
            .await?;
            self.wait_for_load(timeout).await?;
        }
        Ok(())
    }

    /// Entry id preceding the current one in a `Page.getNavigationHistory` result.
    pub(super) fn previous_history_entry(history: &Value) -> Option<i64> {
        let current_index = history["currentIndex"].as_i64()?;
        if current_index <= 0 {
            return None;
        }
        history["entries"]
            .as_array()?
            .get((current_index - 1) as usize)?["id"]
            .as_i64()
    }

    /// Get current URL.
    pub async fn get_url(&self) -> Result<String, CdpError> {
        let result = self.evaluate("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }
}
