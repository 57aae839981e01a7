//! Mouse input for CDP page session.
//!
//! Prototype canvases react to pointer sequences, so gestures are built
//! from press/move/release primitives rather than synthesized clicks.

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{MouseButton, MouseEventType};

use super::core::PageSession;

impl PageSession {
    async fn mouse_event(
        &self,
        event: MouseEventType,
        x: f64,
        y: f64,
        button: MouseButton,
    ) -> Result<(), CdpError> {
        let click_count = match button {
            MouseButton::None => 0,
            MouseButton::Left => 1,
        };
        self.call(
            "Input.dispatchMouseEvent",
            Some(json!({
                "type": event,
                "x": x,
                "y": y,
                "button": button,
                "clickCount": click_count,
            })),
        )
        .await?;
        Ok(())
    }

    /// Press the left button at coordinates.
    pub async fn mouse_press(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_event(MouseEventType::MousePressed, x, y, MouseButton::Left)
            .await
    }

    /// Move the mouse, optionally with the left button held.
    pub async fn mouse_move(&self, x: f64, y: f64, dragging: bool) -> Result<(), CdpError> {
        let button = if dragging {
            MouseButton::Left
        } else {
            MouseButton::None
        };
        self.mouse_event(MouseEventType::MouseMoved, x, y, button)
            .await
    }

    /// Release the left button at coordinates.
    pub async fn mouse_release(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_event(MouseEventType::MouseReleased, x, y, MouseButton::Left)
            .await
    }

    /// Click at coordinates.
    pub async fn click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        self.mouse_move(x, y, false).await?;
        self.mouse_press(x, y).await?;
        self.mouse_release(x, y).await?;
        debug!("Clicked at ({}, {})", x, y);
        Ok(())
    }
}
