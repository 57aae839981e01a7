//! Action execution stage.
//!
//! Element boxes are in screenshot coordinates; gestures need page
//! coordinates, so the region offset is added before calling the driver.
//! Annotations stay in screenshot coordinates.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use autoprobe_protocols::{
    ActionDecision, ActionKind, Annotator, BrowserDriver, ExploreError, Point, UIElement,
};

/// A gesture that was performed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedAction {
    pub element: UIElement,
    /// 1-based tag of the element.
    pub index: usize,
    pub kind: ActionKind,
    /// Page coordinates the gesture started at.
    pub point: Point,
}

/// Performs decided actions through the browser driver.
pub struct ActionExecutionStage {
    driver: Arc<dyn BrowserDriver>,
    annotator: Arc<dyn Annotator>,
    offset: Point,
    screen_width: f64,
}

impl ActionExecutionStage {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        annotator: Arc<dyn Annotator>,
        offset: Point,
        screen_width: f64,
    ) -> Self {
        Self {
            driver,
            annotator,
            offset,
            screen_width,
        }
    }

    /// Perform the gesture `action` on its element.
    ///
    /// `before` is copied to `marked` with the element box and a tap circle
    /// or swipe arrow drawn on it before the gesture is sent. Only tap,
    /// long press and swipe are gestures.
    pub async fn execute(
        &self,
        action: &ActionDecision,
        elements: &[UIElement],
        before: &Path,
        marked: &Path,
    ) -> Result<ExecutedAction, ExploreError> {
        let (Some(index), Some(kind)) = (action.element_index(), action.kind()) else {
            return Err(ExploreError::ProtocolViolation(format!(
                "action {} cannot be executed",
                action
            )));
        };
        let element = elements
            .get(index.wrapping_sub(1))
            .ok_or_else(|| {
                ExploreError::ProtocolViolation(format!(
                    "element index {} out of range ({} elements)",
                    index,
                    elements.len()
                ))
            })?
            .clone();

        let local = element.bbox.center();
        let point = local.offset(self.offset);

        self.annotator.mark_element(before, marked, &element.bbox)?;

        match action {
            ActionDecision::Tap { .. } => {
                self.annotator.draw_circle(marked, local)?;
                self.driver.tap(point).await?;
            }
            ActionDecision::LongPress { .. } => {
                self.annotator.draw_circle(marked, local)?;
                self.driver.long_press(point).await?;
            }
            ActionDecision::Swipe {
                direction,
                distance,
                ..
            } => {
                let pixels = distance.pixels(self.screen_width);
                self.annotator.draw_arrow(marked, local, *direction, pixels)?;
                self.driver.swipe(point, *direction, pixels).await?;
            }
            ActionDecision::Finish | ActionDecision::Text { .. } | ActionDecision::Undefined { .. } => {
                return Err(ExploreError::ProtocolViolation(format!(
                    "action {} is not a gesture",
                    action
                )));
            }
        }

        info!(
            "Performed {} on element {} ({}) at ({:.0}, {:.0})",
            action.name(),
            index,
            element.uid,
            point.x,
            point.y
        );

        Ok(ExecutedAction {
            element,
            index,
            kind,
            point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{DriverCall, FakeAnnotator, FakeDriver};
    use autoprobe_protocols::{BoundingBox, DriverError, SwipeDirection, SwipeDistance};
    use tempfile::TempDir;

    fn elements() -> Vec<UIElement> {
        vec![
            UIElement::new("1:3", BoundingBox::from_coords(0.0, 0.0, 40.0, 10.0)),
            UIElement::new("1:4", BoundingBox::from_coords(10.0, 10.0, 30.0, 30.0)),
        ]
    }

    fn stage(driver: Arc<FakeDriver>, annotator: Arc<FakeAnnotator>) -> ActionExecutionStage {
        ActionExecutionStage::new(driver, annotator, Point::new(300.0, 40.0), 375.0)
    }

    #[tokio::test]
    async fn test_tap_center_plus_offset() {
        let temp_dir = TempDir::new().unwrap();
        let before = temp_dir.path().join("1_before.png");
        std::fs::write(&before, b"png").unwrap();
        let marked = temp_dir.path().join("1_before_labeled_action.png");

        let driver = Arc::new(FakeDriver::new("1:2"));
        let annotator = Arc::new(FakeAnnotator::default());
        let result = stage(driver.clone(), annotator.clone())
            .execute(&ActionDecision::Tap { index: 2 }, &elements(), &before, &marked)
            .await
            .unwrap();

        assert_eq!(driver.calls(), vec![DriverCall::Tap(Point::new(320.0, 60.0))]);
        assert_eq!(result.element.uid, "1:4");
        assert_eq!(result.kind, ActionKind::Tap);
        assert_eq!(result.index, 2);
        assert!(marked.exists());
        assert_eq!(annotator.circles(), vec![Point::new(20.0, 20.0)]);
    }

    #[tokio::test]
    async fn test_swipe_distance() {
        let temp_dir = TempDir::new().unwrap();
        let before = temp_dir.path().join("b.png");
        std::fs::write(&before, b"png").unwrap();

        let driver = Arc::new(FakeDriver::new("1:2"));
        let action = ActionDecision::Swipe {
            index: 1,
            direction: SwipeDirection::Left,
            distance: SwipeDistance::Long,
        };
        let result = stage(driver.clone(), Arc::new(FakeAnnotator::default()))
            .execute(&action, &elements(), &before, &temp_dir.path().join("m.png"))
            .await
            .unwrap();

        assert_eq!(
            driver.calls(),
            vec![DriverCall::Swipe(Point::new(320.0, 45.0), SwipeDirection::Left, 222.0)]
        );
        assert_eq!(result.kind, ActionKind::HSwipe);
    }

    #[tokio::test]
    async fn test_non_gesture_rejected() {
        let driver = Arc::new(FakeDriver::new("1:2"));
        let result = stage(driver.clone(), Arc::new(FakeAnnotator::default()))
            .execute(
                &ActionDecision::Text { input: "hi".into() },
                &elements(),
                Path::new("unused"),
                Path::new("unused"),
            )
            .await;

        assert!(matches!(result, Err(ExploreError::ProtocolViolation(_))));
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_driver_failure() {
        let temp_dir = TempDir::new().unwrap();
        let before = temp_dir.path().join("b.png");
        std::fs::write(&before, b"png").unwrap();

        let driver = Arc::new(FakeDriver::new("1:2").failing_gestures());
        let result = stage(driver, Arc::new(FakeAnnotator::default()))
            .execute(
                &ActionDecision::LongPress { index: 1 },
                &elements(),
                &before,
                &temp_dir.path().join("m.png"),
            )
            .await;

        assert!(matches!(
            result,
            Err(ExploreError::Driver(DriverError::GestureFailed(_)))
        ));
    }
}
