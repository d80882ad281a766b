//! Release velocity estimation
//!
//! Keeps a fixed-size ring buffer of recent primary-finger positions and
//! estimates velocity with the impulse strategy: the velocity whose kinetic
//! energy equals the work done by the finger over the recent samples. A
//! finger that stops before lifting adds no work, so a trailing stationary
//! sample does not cancel an otherwise fast swipe.

use crate::config::VelocityConfig;

/// Ring buffer size for velocity tracking samples.
const HISTORY_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
struct PositionAtTime {
    time_ms: u64,
    x: f32,
    y: f32,
}

/// Velocity in px/s along both axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// 2D position tracker for a single finger.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: [Option<PositionAtTime>; HISTORY_SIZE],
    index: usize,
    horizon_ms: u64,
    assume_stopped_ms: u64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(&VelocityConfig::default())
    }
}

impl VelocityTracker {
    pub fn new(config: &VelocityConfig) -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            index: 0,
            horizon_ms: config.horizon_ms,
            assume_stopped_ms: config.assume_stopped_ms,
        }
    }

    /// Adds a position observed at `time_ms`.
    pub fn add_position(&mut self, time_ms: u64, x: f32, y: f32) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(PositionAtTime { time_ms, x, y });
    }

    /// Number of buffered samples (never more than the ring size)
    pub fn len(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.samples[self.index].is_none()
    }

    /// Calculates the velocity in px/second.
    ///
    /// Returns zero if there aren't enough recent samples.
    pub fn velocity(&self) -> Velocity {
        let mut xs = [0.0f32; HISTORY_SIZE];
        let mut ys = [0.0f32; HISTORY_SIZE];
        let mut times = [0.0f32; HISTORY_SIZE];
        let mut sample_count = 0;

        let newest = match self.samples[self.index] {
            Some(sample) => sample,
            None => return Velocity::default(),
        };

        let mut current_index = self.index;
        let mut previous = newest;

        while let Some(sample) = self.samples[current_index] {
            // Out-of-order timestamps are treated as simultaneous.
            let age = newest.time_ms.saturating_sub(sample.time_ms);
            let gap = previous.time_ms.abs_diff(sample.time_ms);
            previous = sample;

            if age > self.horizon_ms || gap > self.assume_stopped_ms {
                break;
            }

            xs[sample_count] = sample.x;
            ys[sample_count] = sample.y;
            times[sample_count] = -(age as f32);

            current_index = if current_index == 0 {
                HISTORY_SIZE - 1
            } else {
                current_index - 1
            };

            sample_count += 1;
            if sample_count >= HISTORY_SIZE {
                break;
            }
        }

        if sample_count < 2 {
            return Velocity::default();
        }

        Velocity {
            x: impulse_velocity(&xs, &times, sample_count) * 1000.0,
            y: impulse_velocity(&ys, &times, sample_count) * 1000.0,
        }
    }
}

/// Impulse velocity in units/ms; samples are ordered newest first.
fn impulse_velocity(
    positions: &[f32; HISTORY_SIZE],
    times: &[f32; HISTORY_SIZE],
    sample_count: usize,
) -> f32 {
    if sample_count < 2 {
        return 0.0;
    }

    let mut work = 0.0f32;
    let start = sample_count - 1;
    let mut next_time = times[start];

    for i in (1..=start).rev() {
        let current_time = next_time;
        next_time = times[i - 1];
        if current_time == next_time {
            continue;
        }

        let v_curr = (positions[i] - positions[i - 1]) / (current_time - next_time);
        let v_prev = kinetic_energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == start {
            work *= 0.5;
        }
    }

    kinetic_energy_to_velocity(work)
}

/// Converts kinetic energy to velocity using E = 0.5 * m * v^2 (with m = 1).
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> VelocityTracker {
        VelocityTracker::default()
    }

    #[test]
    fn test_empty_tracker_returns_zero() {
        let tracker = tracker();
        assert!(tracker.is_empty());
        assert_eq!(tracker.velocity(), Velocity::default());
    }

    #[test]
    fn test_single_point_returns_zero() {
        let mut tracker = tracker();
        tracker.add_position(0, 100.0, 100.0);
        assert_eq!(tracker.velocity(), Velocity::default());
    }

    #[test]
    fn test_constant_velocity() {
        let mut tracker = tracker();
        // 10 px per 10ms on X, -5 px per 10ms on Y
        for step in 0..=5u64 {
            tracker.add_position(step * 10, step as f32 * 10.0, 200.0 - step as f32 * 5.0);
        }

        let velocity = tracker.velocity();
        assert!((velocity.x - 1000.0).abs() < 1.0, "got {}", velocity.x);
        assert!((velocity.y + 500.0).abs() < 1.0, "got {}", velocity.y);
    }

    #[test]
    fn test_trailing_stationary_sample_keeps_velocity() {
        let mut tracker = tracker();
        for step in 0..=5u64 {
            tracker.add_position(step * 10, 300.0 - step as f32 * 20.0, 0.0);
        }
        // Lift at the last position, 10ms later
        tracker.add_position(60, 200.0, 0.0);

        let velocity = tracker.velocity();
        assert!((velocity.x + 2000.0).abs() < 1.0, "got {}", velocity.x);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_old_samples_ignored() {
        let mut tracker = tracker();
        tracker.add_position(0, 0.0, 0.0);
        tracker.add_position(150, 100.0, 0.0);
        tracker.add_position(160, 110.0, 0.0);
        tracker.add_position(170, 120.0, 0.0);

        let velocity = tracker.velocity();
        assert!((velocity.x - 1000.0).abs() < 1.0, "got {}", velocity.x);
    }

    #[test]
    fn test_gap_over_stopped_threshold_returns_zero() {
        let config = VelocityConfig::default();
        let mut tracker = VelocityTracker::new(&config);
        tracker.add_position(0, 0.0, 0.0);
        tracker.add_position(config.assume_stopped_ms + 1, 100.0, 0.0);

        assert_eq!(tracker.velocity(), Velocity::default());
    }

    #[test]
    fn test_stop_gap_must_exceed_sampling_interval() {
        // 20 Hz host: 50ms between samples
        let samples: Vec<(u64, f32)> = (0..=5u64).map(|step| (step * 50, step as f32 * 50.0)).collect();

        let mut tracker = tracker();
        for (time, x) in &samples {
            tracker.add_position(*time, *x, 0.0);
        }
        assert_eq!(tracker.velocity(), Velocity::default());

        let mut tracker = VelocityTracker::new(&VelocityConfig {
            horizon_ms: 200,
            assume_stopped_ms: 60,
        });
        for (time, x) in &samples {
            tracker.add_position(*time, *x, 0.0);
        }
        let velocity = tracker.velocity();
        assert!((velocity.x - 1000.0).abs() < 1.0, "got {}", velocity.x);
    }

    #[test]
    fn test_buffer_is_bounded() {
        let mut tracker = tracker();
        for step in 0..500u64 {
            tracker.add_position(step, step as f32, 0.0);
        }
        assert_eq!(tracker.len(), HISTORY_SIZE);
    }
}
