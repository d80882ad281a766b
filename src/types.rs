//! Core types for touchpad gesture classification
//!
//! This module defines the values that flow into the classifier (contact
//! samples) and out of it (gestures and the events reported to listeners).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happened to a contact in a single sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    /// A finger touched the surface
    Start,
    /// A finger already on the surface moved
    Move,
    /// A finger left the surface
    End,
    /// The host aborted the touch sequence
    Cancel,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Start => "start",
            ContactKind::Move => "move",
            ContactKind::End => "end",
            ContactKind::Cancel => "cancel",
        }
    }
}

/// Which finger a sample belongs to, by order of arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerSlot {
    /// The finger that started the session
    #[default]
    First,
    /// A finger that joined while the first was down
    Second,
}

impl PointerSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerSlot::First => "first",
            PointerSlot::Second => "second",
        }
    }
}

/// One update in the touch stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactSample {
    /// Event kind
    pub kind: ContactKind,
    /// Finger the update belongs to
    #[serde(default, alias = "slot")]
    pub pointer_slot: PointerSlot,
    /// Surface X coordinate (px); may be omitted for `cancel` records
    #[serde(default)]
    pub x: f32,
    /// Surface Y coordinate (px, grows downward)
    #[serde(default)]
    pub y: f32,
    /// Monotonic timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl ContactSample {
    pub fn new(kind: ContactKind, pointer_slot: PointerSlot, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self {
            kind,
            pointer_slot,
            x,
            y,
            timestamp_ms,
        }
    }

    /// Primary finger touch-down
    pub fn start(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(ContactKind::Start, PointerSlot::First, x, y, timestamp_ms)
    }

    /// Primary finger motion
    pub fn moved(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(ContactKind::Move, PointerSlot::First, x, y, timestamp_ms)
    }

    /// Primary finger lift
    pub fn end(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(ContactKind::End, PointerSlot::First, x, y, timestamp_ms)
    }

    /// Host cancellation
    pub fn cancel(timestamp_ms: u64) -> Self {
        Self::new(ContactKind::Cancel, PointerSlot::First, 0.0, 0.0, timestamp_ms)
    }

    /// The same update reassigned to the secondary finger
    pub fn on_second_finger(mut self) -> Self {
        self.pointer_slot = PointerSlot::Second;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.pointer_slot == PointerSlot::First
    }
}

/// Direction of a swipe relative to the wearer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Forward,
    Backward,
    Up,
    Down,
}

/// Gestures recognised on the touchpad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    Tap,
    TwoFingerTap,
    SwipeForward,
    TwoFingerSwipeForward,
    SwipeBackward,
    TwoFingerSwipeBackward,
    SwipeUp,
    TwoFingerSwipeUp,
    SwipeDown,
    TwoFingerSwipeDown,
}

impl Gesture {
    /// Every gesture, in declaration order
    pub const ALL: [Gesture; 10] = [
        Gesture::Tap,
        Gesture::TwoFingerTap,
        Gesture::SwipeForward,
        Gesture::TwoFingerSwipeForward,
        Gesture::SwipeBackward,
        Gesture::TwoFingerSwipeBackward,
        Gesture::SwipeUp,
        Gesture::TwoFingerSwipeUp,
        Gesture::SwipeDown,
        Gesture::TwoFingerSwipeDown,
    ];

    /// Wire name, e.g. `TWO_FINGER_SWIPE_UP`
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Tap => "TAP",
            Gesture::TwoFingerTap => "TWO_FINGER_TAP",
            Gesture::SwipeForward => "SWIPE_FORWARD",
            Gesture::TwoFingerSwipeForward => "TWO_FINGER_SWIPE_FORWARD",
            Gesture::SwipeBackward => "SWIPE_BACKWARD",
            Gesture::TwoFingerSwipeBackward => "TWO_FINGER_SWIPE_BACKWARD",
            Gesture::SwipeUp => "SWIPE_UP",
            Gesture::TwoFingerSwipeUp => "TWO_FINGER_SWIPE_UP",
            Gesture::SwipeDown => "SWIPE_DOWN",
            Gesture::TwoFingerSwipeDown => "TWO_FINGER_SWIPE_DOWN",
        }
    }

    pub fn finger_count(&self) -> u8 {
        match self {
            Gesture::TwoFingerTap
            | Gesture::TwoFingerSwipeForward
            | Gesture::TwoFingerSwipeBackward
            | Gesture::TwoFingerSwipeUp
            | Gesture::TwoFingerSwipeDown => 2,
            _ => 1,
        }
    }

    pub fn is_swipe(&self) -> bool {
        self.direction().is_some()
    }

    /// Swipe direction, `None` for taps
    pub fn direction(&self) -> Option<SwipeDirection> {
        match self {
            Gesture::Tap | Gesture::TwoFingerTap => None,
            Gesture::SwipeForward | Gesture::TwoFingerSwipeForward => Some(SwipeDirection::Forward),
            Gesture::SwipeBackward | Gesture::TwoFingerSwipeBackward => {
                Some(SwipeDirection::Backward)
            }
            Gesture::SwipeUp | Gesture::TwoFingerSwipeUp => Some(SwipeDirection::Up),
            Gesture::SwipeDown | Gesture::TwoFingerSwipeDown => Some(SwipeDirection::Down),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown gesture name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gesture: {0}")]
pub struct UnknownGesture(pub String);

impl FromStr for Gesture {
    type Err = UnknownGesture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.name() == upper)
            .ok_or_else(|| UnknownGesture(s.to_string()))
    }
}

/// Everything the classifier reports to a listener, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GestureEvent {
    /// A gesture was recognised when the session ended
    Gesture { gesture: Gesture },
    /// The primary finger moved by at least one unit since the last report
    Scroll {
        /// Sample that started the session
        start: ContactSample,
        /// Sample that triggered this report
        current: ContactSample,
        /// Last reported X minus current X
        distance_x: f32,
        /// Last reported Y minus current Y
        distance_y: f32,
    },
    /// All fingers are off the surface
    TouchEnded,
}

impl GestureEvent {
    pub fn gesture(&self) -> Option<Gesture> {
        match self {
            GestureEvent::Gesture { gesture } => Some(*gesture),
            _ => None,
        }
    }
}
