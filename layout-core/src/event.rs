//! Input events for the layout canvas.
//!
//! Coordinates are screen pixels. Mouse and single-touch input drive the
//! same drag state machine.

use serde::{Deserialize, Serialize};

use crate::{LayerId, Point};

/// Phase of a pointer (mouse) event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Pointer interaction aborted by the platform.
    Cancel,
}

/// What the pointer landed on, as resolved by the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    /// The body of a layer.
    Layer(LayerId),
    /// A text region of a layer that is currently being edited. Never starts a drag.
    EditableText(LayerId),
    /// Empty page area.
    Background,
    /// Unknown; the editor hit-tests the document itself.
    #[default]
    Unresolved,
}

/// A pointer (mouse) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Event phase.
    pub phase: PointerPhase,
    /// Screen X.
    pub x: f32,
    /// Screen Y.
    pub y: f32,
    /// Hit target (meaningful on `Down`).
    #[serde(default)]
    pub target: PointerTarget,
}

impl PointerEvent {
    /// Create a pointer event with an unresolved target.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            target: PointerTarget::Unresolved,
        }
    }

    /// Set the hit target.
    #[must_use]
    pub fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    /// Screen position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// Screen X.
    pub x: f32,
    /// Screen Y.
    pub y: f32,
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Whether the platform allows the default action (scrolling) to be suppressed.
    #[serde(default)]
    pub cancelable: bool,
    /// Hit target of the primary touch (meaningful on `Start`).
    #[serde(default)]
    pub target: PointerTarget,
}

impl TouchEvent {
    /// Create a new cancelable touch event with an unresolved target.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self {
            phase,
            touches,
            cancelable: true,
            target: PointerTarget::Unresolved,
        }
    }

    /// Single-touch event at a screen position.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self::new(phase, vec![TouchPoint { id: 0, x, y }])
    }

    /// Set the hit target.
    #[must_use]
    pub fn with_target(mut self, target: PointerTarget) -> Self {
        self.target = target;
        self
    }

    /// Set whether the event is cancelable.
    #[must_use]
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum InputEvent {
    /// Mouse pointer event.
    Pointer(PointerEvent),
    /// Touch event.
    Touch(TouchEvent),
}

/// How the shell should treat an event after the editor has seen it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResponse {
    /// The editor acted on the event.
    pub handled: bool,
    /// The shell should suppress the platform default (page scrolling).
    pub prevent_default: bool,
}

impl EventResponse {
    /// The editor ignored the event.
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };

    /// The editor acted on the event.
    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_helpers() {
        let single = TouchEvent::single(TouchPhase::Start, 1.0, 2.0);
        assert!(!single.is_multi_touch());
        assert!(single.cancelable);
        assert_eq!(single.primary_touch().map(|t| (t.x, t.y)), Some((1.0, 2.0)));

        let multi = TouchEvent::new(
            TouchPhase::Start,
            vec![TouchPoint { id: 0, x: 0.0, y: 0.0 }, TouchPoint { id: 1, x: 5.0, y: 5.0 }],
        );
        assert!(multi.is_multi_touch());
    }

    #[test]
    fn input_event_json_shape() {
        let id = LayerId::new();
        let event = InputEvent::Pointer(
            PointerEvent::new(PointerPhase::Down, 10.0, 20.0).with_target(PointerTarget::Layer(id)),
        );
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "pointer");
        assert_eq!(json["data"]["phase"], "down");
        assert_eq!(json["data"]["target"]["kind"], "layer");

        let parsed: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, event);
    }

    #[test]
    fn touch_event_defaults_when_fields_missing() {
        let json =
            r#"{"type":"touch","data":{"phase":"move","touches":[{"id":0,"x":1.0,"y":2.0}]}}"#;
        let event: InputEvent = serde_json::from_str(json).expect("deserialize");
        match event {
            InputEvent::Touch(t) => {
                assert!(!t.cancelable);
                assert_eq!(t.target, PointerTarget::Unresolved);
            }
            InputEvent::Pointer(_) => panic!("expected touch"),
        }
    }
}
