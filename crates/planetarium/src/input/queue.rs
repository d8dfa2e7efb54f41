use glam::Vec2;
use serde::Deserialize;

/// User-interface events the session understands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// A tap at view coordinates (x, y).
    Tap { x: f32, y: f32 },
    /// The back / zoom-out button.
    Back,
    PausePlay,
    Reset,
    /// The user confirmed the scale prompt with this raw text.
    ScaleConfirmed { text: Option<String> },
    ToggleLabels,
    /// Background opacity slider, 0 = transparent.
    BackgroundOpacity { value: f32 },
}

impl InputEvent {
    pub fn tap(point: Vec2) -> Self {
        InputEvent::Tap { x: point.x, y: point.y }
    }
}

/// A queue of input events.
/// The host pushes events as they happen; the session drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
