//! Listener seam between the classifier and whatever consumes its output
//!
//! Push-style consumers implement [`GestureListener`]. Consumers that prefer
//! to poll can hand the classifier an [`EventQueue`] and drain it after each
//! sample.

use crate::types::{ContactSample, Gesture, GestureEvent};
use std::collections::VecDeque;

/// Receives classifier output synchronously from within `feed`
pub trait GestureListener {
    /// Called at most once per session with the recognised gesture.
    ///
    /// Returns `true` if the gesture was handled.
    fn on_gesture(&mut self, gesture: Gesture) -> bool;

    /// Called while the primary finger moves.
    ///
    /// `distance_x`/`distance_y` are the distance scrolled since the last call
    /// (last position minus current position), not the distance between
    /// `start` and `current`. Returns `true` if the scroll was consumed.
    fn on_scroll(
        &mut self,
        _start: &ContactSample,
        _current: &ContactSample,
        _distance_x: f32,
        _distance_y: f32,
    ) -> bool {
        false
    }

    /// Called when the primary finger lifts, whether or not a gesture was recognised.
    fn on_touch_ended(&mut self) {}
}

impl<L: GestureListener + ?Sized> GestureListener for &mut L {
    fn on_gesture(&mut self, gesture: Gesture) -> bool {
        (**self).on_gesture(gesture)
    }

    fn on_scroll(
        &mut self,
        start: &ContactSample,
        current: &ContactSample,
        distance_x: f32,
        distance_y: f32,
    ) -> bool {
        (**self).on_scroll(start, current, distance_x, distance_y)
    }

    fn on_touch_ended(&mut self) {
        (**self).on_touch_ended()
    }
}

impl<L: GestureListener + ?Sized> GestureListener for Box<L> {
    fn on_gesture(&mut self, gesture: Gesture) -> bool {
        (**self).on_gesture(gesture)
    }

    fn on_scroll(
        &mut self,
        start: &ContactSample,
        current: &ContactSample,
        distance_x: f32,
        distance_y: f32,
    ) -> bool {
        (**self).on_scroll(start, current, distance_x, distance_y)
    }

    fn on_touch_ended(&mut self) {
        (**self).on_touch_ended()
    }
}

/// Listener that records every event for later polling
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<GestureEvent>,
    gestures_handled: bool,
    scrolls_handled: bool,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Queue that reports gestures as handled and scrolls as not consumed
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            gestures_handled: true,
            scrolls_handled: false,
        }
    }

    /// Override what `on_gesture`/`on_scroll` report back to the classifier
    pub fn with_acknowledgements(gestures_handled: bool, scrolls_handled: bool) -> Self {
        Self {
            events: VecDeque::new(),
            gestures_handled,
            scrolls_handled,
        }
    }

    /// Oldest pending event
    pub fn pop(&mut self) -> Option<GestureEvent> {
        self.events.pop_front()
    }

    /// All pending events, oldest first
    pub fn drain(&mut self) -> Vec<GestureEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Recognised gestures still pending, oldest first
    pub fn gestures(&self) -> Vec<Gesture> {
        self.events.iter().filter_map(GestureEvent::gesture).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GestureListener for EventQueue {
    fn on_gesture(&mut self, gesture: Gesture) -> bool {
        self.events.push_back(GestureEvent::Gesture { gesture });
        self.gestures_handled
    }

    fn on_scroll(
        &mut self,
        start: &ContactSample,
        current: &ContactSample,
        distance_x: f32,
        distance_y: f32,
    ) -> bool {
        self.events.push_back(GestureEvent::Scroll {
            start: *start,
            current: *current,
            distance_x,
            distance_y,
        });
        self.scrolls_handled
    }

    fn on_touch_ended(&mut self) {
        self.events.push_back(GestureEvent::TouchEnded);
    }
}
