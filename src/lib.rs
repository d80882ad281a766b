//! Touchpad Gestures - tap and swipe classification for head-worn touchpads
//!
//! A [`GestureClassifier`] consumes an ordered stream of contact samples
//! (start, move, end, cancel for up to two fingers) and reports taps and
//! one- or two-finger swipes forward, backward, up and down to a
//! [`GestureListener`].
//!
//! ## Modules
//!
//! - **Classifier**: Session state, velocity estimation and the gesture decision
//! - **Trace**: Parse, validate and replay recorded sample streams
//! - **FFI**: C ABI for hosts that own the touch input loop

pub mod classifier;
pub mod config;
pub mod error;
pub mod listener;
pub mod session;
pub mod trace;
pub mod types;
pub mod velocity;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

#[cfg(test)]
mod testing;

pub use classifier::GestureClassifier;
pub use config::ClassifierConfig;
pub use error::GestureError;
pub use listener::{EventQueue, GestureListener};
pub use types::{ContactKind, ContactSample, Gesture, GestureEvent, PointerSlot, SwipeDirection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI
pub const PRODUCER_NAME: &str = "touchpad-gestures";
