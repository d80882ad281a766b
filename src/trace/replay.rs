//! Replays a recorded trace through a fresh classifier

use crate::classifier::GestureClassifier;
use crate::config::ClassifierConfig;
use crate::error::GestureError;
use crate::listener::EventQueue;
use crate::types::{ContactKind, ContactSample, Gesture, GestureEvent, PointerSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// How one touch session in a trace ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    /// Timestamp of the primary `Start`
    pub started_ms: u64,
    /// Timestamp of the primary `End`; `None` if the trace stopped first or a
    /// new primary `Start` replaced the session
    pub ended_ms: Option<u64>,
    pub gesture: Option<Gesture>,
    pub cancelled: bool,
    pub two_finger: bool,
}

/// Everything a replay produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub sample_count: usize,
    pub events: Vec<GestureEvent>,
    pub gestures: Vec<Gesture>,
    pub sessions: Vec<SessionOutcome>,
}

impl ReplayReport {
    /// How often each gesture was recognised, keyed by wire name
    pub fn gesture_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for gesture in &self.gestures {
            *counts.entry(gesture.name()).or_insert(0) += 1;
        }
        counts
    }
}

/// Feeds `samples` in order to a new classifier built from `config`.
pub fn replay(
    config: &ClassifierConfig,
    samples: &[ContactSample],
) -> Result<ReplayReport, GestureError> {
    config.validate()?;

    let mut classifier = GestureClassifier::with_config(config.clone(), EventQueue::new());
    let mut report = ReplayReport {
        sample_count: samples.len(),
        ..ReplayReport::default()
    };
    let mut open: Option<SessionOutcome> = None;

    for sample in samples {
        let was_active = classifier.is_session_active();
        classifier.feed(*sample);
        let emitted = classifier.listener_mut().drain();
        let gesture = emitted.iter().find_map(GestureEvent::gesture);

        match (sample.kind, sample.pointer_slot) {
            (ContactKind::Start, PointerSlot::First) => {
                if let Some(abandoned) = open.take() {
                    report.sessions.push(abandoned);
                }
                open = Some(SessionOutcome {
                    started_ms: sample.timestamp_ms,
                    ended_ms: None,
                    gesture: None,
                    cancelled: false,
                    two_finger: false,
                });
            }
            (ContactKind::Start, PointerSlot::Second) if was_active => {
                if let Some(session) = open.as_mut() {
                    session.two_finger = true;
                }
            }
            (ContactKind::Cancel, _) if was_active => {
                if let Some(session) = open.as_mut() {
                    session.cancelled = true;
                }
            }
            (ContactKind::End, PointerSlot::First) if was_active => {
                if let Some(mut session) = open.take() {
                    session.ended_ms = Some(sample.timestamp_ms);
                    session.gesture = gesture;
                    report.sessions.push(session);
                }
            }
            _ => {}
        }

        report.gestures.extend(gesture);
        report.events.extend(emitted);
    }

    report.sessions.extend(open);
    debug!(
        samples = report.sample_count,
        sessions = report.sessions.len(),
        gestures = report.gestures.len(),
        "trace replayed"
    );
    Ok(report)
}
