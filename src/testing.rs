//! Synthetic contact streams for tests

use crate::types::ContactSample;

pub const INITIAL_X: f32 = 200.0;
pub const INITIAL_Y: f32 = 200.0;
pub const SECOND_FINGER_INITIAL_X: f32 = 300.0;
pub const SECOND_FINGER_INITIAL_Y: f32 = 200.0;
pub const DOWN_TIME_MS: u64 = 100;
/// Interval between generated move samples
pub const FRAME_MS: u64 = 10;

/// Linear positions from `(x, y)` to `(x + dx, y + dy)`, one per frame, excluding the origin
fn path(x: f32, y: f32, dx: f32, dy: f32, duration_ms: u64) -> Vec<(f32, f32)> {
    let steps = (duration_ms / FRAME_MS).max(1);
    (1..=steps)
        .map(|k| {
            let t = k as f32 / steps as f32;
            (x + dx * t, y + dy * t)
        })
        .collect()
}

/// Primary finger down, straight-line drag by `(dx, dy)` over `duration_ms`, then up.
///
/// The lift happens one frame after the last move, at the final position.
pub fn swipe(dx: f32, dy: f32, duration_ms: u64) -> Vec<ContactSample> {
    let mut samples = vec![ContactSample::start(INITIAL_X, INITIAL_Y, DOWN_TIME_MS)];
    let mut time = DOWN_TIME_MS;
    let mut last = (INITIAL_X, INITIAL_Y);
    for (x, y) in path(INITIAL_X, INITIAL_Y, dx, dy, duration_ms) {
        time += FRAME_MS;
        samples.push(ContactSample::moved(x, y, time));
        last = (x, y);
    }
    samples.push(ContactSample::end(last.0, last.1, time + FRAME_MS));
    samples
}

/// Down, a move back onto the same spot, up.
pub fn tap() -> Vec<ContactSample> {
    vec![
        ContactSample::start(INITIAL_X, INITIAL_Y, DOWN_TIME_MS),
        ContactSample::moved(INITIAL_X, INITIAL_Y, DOWN_TIME_MS + FRAME_MS),
        ContactSample::end(INITIAL_X, INITIAL_Y, DOWN_TIME_MS + 2 * FRAME_MS),
    ]
}

/// Both fingers drag simultaneously; secondary lifts first.
pub fn two_finger_swipe(
    first: (f32, f32),
    second: (f32, f32),
    duration_ms: u64,
) -> Vec<ContactSample> {
    let mut samples = vec![
        ContactSample::start(INITIAL_X, INITIAL_Y, DOWN_TIME_MS),
        ContactSample::start(SECOND_FINGER_INITIAL_X, SECOND_FINGER_INITIAL_Y, DOWN_TIME_MS)
            .on_second_finger(),
    ];
    let first_path = path(INITIAL_X, INITIAL_Y, first.0, first.1, duration_ms);
    let second_path = path(
        SECOND_FINGER_INITIAL_X,
        SECOND_FINGER_INITIAL_Y,
        second.0,
        second.1,
        duration_ms,
    );

    let mut time = DOWN_TIME_MS;
    let mut last_first = (INITIAL_X, INITIAL_Y);
    let mut last_second = (SECOND_FINGER_INITIAL_X, SECOND_FINGER_INITIAL_Y);
    for (a, b) in first_path.into_iter().zip(second_path) {
        time += FRAME_MS;
        samples.push(ContactSample::moved(a.0, a.1, time));
        samples.push(ContactSample::moved(b.0, b.1, time).on_second_finger());
        last_first = a;
        last_second = b;
    }
    samples.push(ContactSample::end(last_second.0, last_second.1, time + FRAME_MS).on_second_finger());
    samples.push(ContactSample::end(last_first.0, last_first.1, time + FRAME_MS));
    samples
}

/// Both fingers down and up without moving.
pub fn two_finger_tap() -> Vec<ContactSample> {
    two_finger_swipe((0.0, 0.0), (0.0, 0.0), FRAME_MS)
}

/// Horizontal run that gives a movement of vertical rise `rise` the slope of `degrees`
pub fn run_for_angle(rise: f32, degrees: f64) -> f32 {
    (rise.abs() as f64 / degrees.to_radians().tan().abs()) as f32
}
