//! Replays a short recorded trace and prints what the classifier recognised.
//!
//! Run with `cargo run --example replay_trace`.

use touchpad_gestures::trace::{replay, TraceAdapter};
use touchpad_gestures::{ClassifierConfig, GestureError};

/// A tap, then a quick one-finger swipe toward the wearer's face.
const TRACE: &str = r#"
{"kind":"start","x":200.0,"y":200.0,"timestamp_ms":0}
{"kind":"move","x":201.0,"y":200.0,"timestamp_ms":10}
{"kind":"end","x":201.0,"y":200.0,"timestamp_ms":20}
{"kind":"start","x":400.0,"y":200.0,"timestamp_ms":500}
{"kind":"move","x":370.0,"y":201.0,"timestamp_ms":510}
{"kind":"move","x":340.0,"y":202.0,"timestamp_ms":520}
{"kind":"move","x":310.0,"y":202.0,"timestamp_ms":530}
{"kind":"move","x":280.0,"y":203.0,"timestamp_ms":540}
{"kind":"end","x":280.0,"y":203.0,"timestamp_ms":550}
"#;

fn main() -> Result<(), GestureError> {
    let samples = TraceAdapter::parse_ndjson(TRACE)?;
    TraceAdapter::ensure_valid(&samples)?;

    let report = replay(&ClassifierConfig::default(), &samples)?;

    for (n, session) in report.sessions.iter().enumerate() {
        let outcome = session
            .gesture
            .map(|g| g.to_string())
            .unwrap_or_else(|| "no gesture".to_string());
        println!(
            "session {} ({}ms..{}): {}",
            n + 1,
            session.started_ms,
            session
                .ended_ms
                .map(|ms| format!("{ms}ms"))
                .unwrap_or_else(|| "open".to_string()),
            outcome
        );
    }

    for (name, count) in report.gesture_counts() {
        println!("{name}: {count}");
    }

    Ok(())
}
