//! Per-session bookkeeping
//!
//! A session lives from the primary finger's `Start` until its `End`. All of
//! its state is reset in one place so nothing leaks into the next session.

use crate::config::VelocityConfig;
use crate::types::ContactSample;
use crate::velocity::{Velocity, VelocityTracker};

/// Position history of one finger within a session
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FingerTrack {
    /// Finger is currently on the surface
    pub active: bool,
    /// Position at this finger's `Start`
    pub down_x: f32,
    pub down_y: f32,
    /// Last position seen on a `Move`
    pub last_x: f32,
    pub last_y: f32,
    /// Last position minus anchor
    pub distance_x: f32,
    pub distance_y: f32,
}

impl FingerTrack {
    pub fn anchored_at(x: f32, y: f32) -> Self {
        Self {
            active: true,
            down_x: x,
            down_y: y,
            last_x: x,
            last_y: y,
            distance_x: 0.0,
            distance_y: 0.0,
        }
    }

    /// Records a new position and updates the distance from the anchor
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.last_x = x;
        self.last_y = y;
        self.distance_x = x - self.down_x;
        self.distance_y = y - self.down_y;
    }

    /// Squared distance from the anchor
    pub fn distance_squared(&self) -> f32 {
        self.distance_x * self.distance_x + self.distance_y * self.distance_y
    }

    /// `|dy / dx|`, infinite for purely vertical (or no) movement
    pub fn slope(&self) -> f64 {
        if self.distance_x != 0.0 {
            (self.distance_y as f64 / self.distance_x as f64).abs()
        } else {
            f64::INFINITY
        }
    }
}

/// Mutable state of the live touch session
#[derive(Debug, Clone, Default)]
pub struct GestureSessionState {
    /// A primary contact is currently down
    pub is_action_down_performed: bool,
    /// A second contact joined this session
    pub is_two_finger_gesture: bool,
    /// Every active finger has stayed within the tap tolerance so far
    pub is_in_tap_region: bool,
    /// A `Cancel` arrived; nothing will be classified this session
    pub is_cancelled: bool,
    pub first: FingerTrack,
    pub second: FingerTrack,
    /// Primary-finger position last reported through `on_scroll`
    pub last_focus_x: f32,
    pub last_focus_y: f32,
    /// Sample that began this session
    pub current_down_event: Option<ContactSample>,
    /// Released (set to `None`) on cancel and at session end
    pub velocity_tracker: Option<VelocityTracker>,
}

impl GestureSessionState {
    /// Fresh session anchored at a primary `Start`
    pub fn begin(sample: &ContactSample, velocity: &VelocityConfig) -> Self {
        let mut tracker = VelocityTracker::new(velocity);
        tracker.add_position(sample.timestamp_ms, sample.x, sample.y);

        Self {
            is_action_down_performed: true,
            is_two_finger_gesture: false,
            is_in_tap_region: true,
            is_cancelled: false,
            first: FingerTrack::anchored_at(sample.x, sample.y),
            second: FingerTrack::default(),
            last_focus_x: sample.x,
            last_focus_y: sample.y,
            current_down_event: Some(*sample),
            velocity_tracker: Some(tracker),
        }
    }

    /// Secondary finger joined; tap-region bookkeeping is left untouched
    pub fn add_second_finger(&mut self, sample: &ContactSample) {
        self.is_two_finger_gesture = true;
        self.second = FingerTrack::anchored_at(sample.x, sample.y);
    }

    /// Clears the tap region if any active finger left the tolerance.
    ///
    /// Returns `true` only on the transition.
    pub fn check_tap_region(&mut self, tap_tolerance_squared_px: f32) -> bool {
        if !self.is_in_tap_region {
            return false;
        }
        let first_out = self.first.active && self.first.distance_squared() > tap_tolerance_squared_px;
        let second_out =
            self.second.active && self.second.distance_squared() > tap_tolerance_squared_px;
        if first_out || second_out {
            self.is_in_tap_region = false;
            return true;
        }
        false
    }

    pub fn track_velocity(&mut self, sample: &ContactSample) {
        if let Some(tracker) = self.velocity_tracker.as_mut() {
            tracker.add_position(sample.timestamp_ms, sample.x, sample.y);
        }
    }

    /// Primary-finger release velocity, zero once the tracker has been released
    pub fn release_velocity(&self) -> Velocity {
        self.velocity_tracker
            .as_ref()
            .map(VelocityTracker::velocity)
            .unwrap_or_default()
    }

    /// Host aborted the sequence; the fingers may still be down
    pub fn cancel(&mut self) {
        self.velocity_tracker = None;
        self.is_in_tap_region = false;
        self.is_cancelled = true;
    }

    /// Drops every piece of session state, including the velocity buffer
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
