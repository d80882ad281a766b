//! Gesture classifier
//!
//! Turns an ordered stream of [`ContactSample`]s into taps and swipes.
//!
//! Swipe direction depends on the movement slope, distance and release
//! velocity of the primary finger. Up and down swipes are only recognised when
//! the movement is steeper than the vertical gate (60° by default, i.e. between
//! 60° and 120° from the horizontal axis); anything flatter is forward or
//! backward, depending on the sign of the X movement:
//!
//! ```text
//!  ______________________________________________________________
//! |                     \        UP         /                    |
//! |                       \               /                      |
//! |                         60         120                       |
//! |                             \   /                            |
//! |  FORWARD  <-------  0  ------------  180  ------>  BACKWARD  |
//! |                             /   \                            |
//! |                         60         120                       |
//! |                       /               \                      |
//! |                     /       DOWN        \                    |
//!  --------------------------------------------------------------
//! ```

use crate::config::{ClassifierConfig, DEFAULT_TOUCH_SLOP_PX};
use crate::listener::GestureListener;
use crate::session::{FingerTrack, GestureSessionState};
use crate::types::{ContactKind, ContactSample, Gesture, PointerSlot};
use crate::velocity::Velocity;
use tracing::{debug, trace, warn};

/// Scroll deltas smaller than this on both axes are not reported
const MIN_SCROLL_DELTA_PX: f32 = 1.0;

/// Decision thresholds, resolved once from the config
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub distance_px: f32,
    pub velocity_px_per_sec: f32,
    pub vertical_gate_tan: f64,
}

impl From<&ClassifierConfig> for Thresholds {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            distance_px: config.swipe_distance_threshold_px,
            velocity_px_per_sec: config.swipe_velocity_threshold_px_per_sec,
            vertical_gate_tan: config.vertical_gate_tan(),
        }
    }
}

impl Thresholds {
    /// Too short or too slow along an axis to be a swipe
    fn below(&self, distance: f32, velocity: f32) -> bool {
        distance.abs() <= self.distance_px || velocity.abs() < self.velocity_px_per_sec
    }
}

/// Stateful tap/swipe recogniser for a single touch surface
pub struct GestureClassifier<L: GestureListener> {
    config: ClassifierConfig,
    tap_tolerance_squared_px: f32,
    thresholds: Thresholds,
    session: GestureSessionState,
    listener: L,
}

impl<L: GestureListener> GestureClassifier<L> {
    /// Classifier with default swipe thresholds.
    ///
    /// `tap_tolerance_squared_px` is the host's touch slop, squared. A negative
    /// or non-finite value falls back to [`DEFAULT_TOUCH_SLOP_PX`].
    pub fn new(tap_tolerance_squared_px: f32, listener: L) -> Self {
        if !tap_tolerance_squared_px.is_finite() || tap_tolerance_squared_px < 0.0 {
            warn!(
                tap_tolerance_squared_px,
                "invalid tap tolerance, using default touch slop"
            );
            return Self::with_config(ClassifierConfig::default(), listener);
        }

        let config = ClassifierConfig::with_touch_slop(tap_tolerance_squared_px.sqrt());
        let mut classifier = Self::with_config(config, listener);
        classifier.tap_tolerance_squared_px = tap_tolerance_squared_px;
        classifier
    }

    /// Classifier with explicit thresholds. Call [`ClassifierConfig::validate`] first
    /// for configs that come from outside the program.
    pub fn with_config(config: ClassifierConfig, listener: L) -> Self {
        Self {
            tap_tolerance_squared_px: config.tap_tolerance_squared_px(),
            thresholds: Thresholds::from(&config),
            config,
            session: GestureSessionState::default(),
            listener,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// State of the live session (all defaults between sessions)
    pub fn session(&self) -> &GestureSessionState {
        &self.session
    }

    /// A primary finger is currently down
    pub fn is_session_active(&self) -> bool {
        self.session.is_action_down_performed
    }

    /// Processes one sample.
    ///
    /// Returns `true` if this sample produced an outcome the listener handled:
    /// a consumed scroll on `Move`, or a handled gesture on the primary `End`.
    pub fn feed(&mut self, sample: ContactSample) -> bool {
        trace!(
            kind = sample.kind.as_str(),
            slot = sample.pointer_slot.as_str(),
            x = sample.x,
            y = sample.y,
            timestamp_ms = sample.timestamp_ms,
            "contact sample"
        );

        match (sample.kind, sample.pointer_slot) {
            (ContactKind::Start, PointerSlot::First) => {
                self.on_primary_start(&sample);
                false
            }
            (ContactKind::Start, PointerSlot::Second) => {
                self.on_secondary_start(&sample);
                false
            }
            (ContactKind::Move, PointerSlot::First) => self.on_primary_move(&sample),
            (ContactKind::Move, PointerSlot::Second) => {
                self.on_secondary_move(&sample);
                false
            }
            (ContactKind::End, PointerSlot::First) => self.on_primary_end(&sample),
            (ContactKind::End, PointerSlot::Second) => {
                self.on_secondary_end();
                false
            }
            (ContactKind::Cancel, _) => {
                self.on_cancel();
                false
            }
        }
    }

    /// Feeds samples in order, returning how many were handled
    pub fn feed_all<I>(&mut self, samples: I) -> usize
    where
        I: IntoIterator<Item = ContactSample>,
    {
        samples.into_iter().filter(|s| self.feed(*s)).count()
    }

    fn on_primary_start(&mut self, sample: &ContactSample) {
        if self.session.is_action_down_performed {
            warn!(
                timestamp_ms = sample.timestamp_ms,
                "primary start while a session is live, restarting session"
            );
        }
        self.session = GestureSessionState::begin(sample, &self.config.velocity);
        debug!(x = sample.x, y = sample.y, timestamp_ms = sample.timestamp_ms, "session started");
    }

    fn on_secondary_start(&mut self, sample: &ContactSample) {
        if !self.session.is_action_down_performed {
            debug!(timestamp_ms = sample.timestamp_ms, "secondary start without session, ignored");
            return;
        }
        self.session.add_second_finger(sample);
        debug!(x = sample.x, y = sample.y, "second finger joined");
    }

    fn on_primary_move(&mut self, sample: &ContactSample) -> bool {
        if !self.session.is_action_down_performed {
            debug!(timestamp_ms = sample.timestamp_ms, "move without session, ignored");
            return false;
        }

        self.session.track_velocity(sample);
        self.session.first.move_to(sample.x, sample.y);
        self.update_tap_region();

        let scroll_x = self.session.last_focus_x - sample.x;
        let scroll_y = self.session.last_focus_y - sample.y;
        if scroll_x.abs() < MIN_SCROLL_DELTA_PX && scroll_y.abs() < MIN_SCROLL_DELTA_PX {
            return false;
        }

        let handled = match self.session.current_down_event {
            Some(down) => self.listener.on_scroll(&down, sample, scroll_x, scroll_y),
            None => false,
        };
        self.session.last_focus_x = sample.x;
        self.session.last_focus_y = sample.y;
        handled
    }

    fn on_secondary_move(&mut self, sample: &ContactSample) {
        if !self.session.is_action_down_performed || !self.session.second.active {
            debug!(timestamp_ms = sample.timestamp_ms, "secondary move without contact, ignored");
            return;
        }
        self.session.second.move_to(sample.x, sample.y);
        self.update_tap_region();
    }

    fn update_tap_region(&mut self) {
        if self.session.check_tap_region(self.tap_tolerance_squared_px) {
            debug!("left tap region");
        }
    }

    fn on_primary_end(&mut self, sample: &ContactSample) -> bool {
        if !self.session.is_action_down_performed {
            debug!(timestamp_ms = sample.timestamp_ms, "end without session, ignored");
            return false;
        }

        self.session.track_velocity(sample);
        let velocity = self.session.release_velocity();

        let handled = if self.session.is_cancelled {
            debug!("session was cancelled, not classifying");
            false
        } else {
            match classify(&self.session, velocity, &self.thresholds) {
                Some(gesture) => {
                    debug!(gesture = %gesture, "gesture recognised");
                    self.listener.on_gesture(gesture)
                }
                None => {
                    debug!(
                        distance_x = self.session.first.distance_x,
                        distance_y = self.session.first.distance_y,
                        velocity_x = velocity.x,
                        velocity_y = velocity.y,
                        "no gesture recognised"
                    );
                    false
                }
            }
        };

        self.session.reset();
        self.listener.on_touch_ended();
        handled
    }

    fn on_secondary_end(&mut self) {
        // Displacement is kept; the finger just stops counting against the tap region.
        self.session.second.active = false;
    }

    fn on_cancel(&mut self) {
        if !self.session.is_action_down_performed {
            debug!("cancel without session, ignored");
            return;
        }
        self.session.cancel();
        debug!("session cancelled");
    }
}

/// Classifies a finished session given the primary finger's release velocity.
pub fn classify(
    session: &GestureSessionState,
    velocity: Velocity,
    thresholds: &Thresholds,
) -> Option<Gesture> {
    if !session.is_action_down_performed {
        return None;
    }

    if session.is_two_finger_gesture {
        classify_two_finger(session, velocity, thresholds)
    } else {
        classify_one_finger(session, velocity, thresholds)
    }
}

fn classify_one_finger(
    session: &GestureSessionState,
    velocity: Velocity,
    thresholds: &Thresholds,
) -> Option<Gesture> {
    let first = &session.first;

    if first.slope() > thresholds.vertical_gate_tan {
        if thresholds.below(first.distance_y, velocity.y) {
            session.is_in_tap_region.then_some(Gesture::Tap)
        } else if first.distance_y < 0.0 {
            Some(Gesture::SwipeUp)
        } else if first.distance_y > 0.0 {
            Some(Gesture::SwipeDown)
        } else {
            None
        }
    } else if thresholds.below(first.distance_x, velocity.x) {
        session.is_in_tap_region.then_some(Gesture::Tap)
    } else if first.distance_x < 0.0 {
        Some(Gesture::SwipeForward)
    } else if first.distance_x > 0.0 {
        Some(Gesture::SwipeBackward)
    } else {
        None
    }
}

fn classify_two_finger(
    session: &GestureSessionState,
    velocity: Velocity,
    thresholds: &Thresholds,
) -> Option<Gesture> {
    let first: &FingerTrack = &session.first;
    let second: &FingerTrack = &session.second;
    let gate = thresholds.vertical_gate_tan;

    if first.slope() > gate && second.slope() > gate {
        if thresholds.below(first.distance_y, velocity.y) {
            session.is_in_tap_region.then_some(Gesture::TwoFingerTap)
        } else if first.distance_y < 0.0 && second.distance_y < 0.0 {
            Some(Gesture::TwoFingerSwipeUp)
        } else if first.distance_y > 0.0 && second.distance_y > 0.0 {
            Some(Gesture::TwoFingerSwipeDown)
        } else {
            None
        }
    } else if thresholds.below(first.distance_x, velocity.x) {
        session.is_in_tap_region.then_some(Gesture::TwoFingerTap)
    } else if first.distance_x < 0.0 && second.distance_x < 0.0 {
        Some(Gesture::TwoFingerSwipeForward)
    } else if first.distance_x > 0.0 && second.distance_x > 0.0 {
        Some(Gesture::TwoFingerSwipeBackward)
    } else {
        None
    }
}
