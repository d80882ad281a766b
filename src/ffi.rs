//! FFI bindings for touchpad gesture classification
//!
//! This module provides C-compatible functions so the classifier can be driven
//! from the host's input layer. Events are handed back as JSON C strings that
//! must be freed by the caller using `tg_free_string`.
//!
//! Sample kinds are encoded as `0` start, `1` move, `2` end, `3` cancel; pointer
//! slots as `0` first finger, `1` second finger.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::classifier::GestureClassifier;
use crate::config::{ClassifierConfig, DEFAULT_TOUCH_SLOP_PX};
use crate::error::GestureError;
use crate::listener::EventQueue;
use crate::types::{ContactKind, ContactSample, PointerSlot};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn decode_kind(kind: i32) -> Result<ContactKind, GestureError> {
    match kind {
        0 => Ok(ContactKind::Start),
        1 => Ok(ContactKind::Move),
        2 => Ok(ContactKind::End),
        3 => Ok(ContactKind::Cancel),
        other => Err(GestureError::InvalidSample(format!("unknown sample kind {other}"))),
    }
}

fn decode_slot(slot: i32) -> Result<PointerSlot, GestureError> {
    match slot {
        0 => Ok(PointerSlot::First),
        1 => Ok(PointerSlot::Second),
        other => Err(GestureError::InvalidSample(format!("unknown pointer slot {other}"))),
    }
}

fn decode_sample(
    kind: i32,
    slot: i32,
    x: f32,
    y: f32,
    timestamp_ms: u64,
) -> Result<ContactSample, GestureError> {
    let kind = decode_kind(kind)?;
    let slot = decode_slot(slot)?;
    if !x.is_finite() || !y.is_finite() {
        return Err(GestureError::InvalidSample(format!(
            "non-finite coordinate ({x}, {y})"
        )));
    }
    Ok(ContactSample::new(kind, slot, x, y, timestamp_ms))
}

// ============================================================================
// Classifier API
// ============================================================================

/// Opaque handle to a GestureClassifier
pub struct TgClassifierHandle {
    classifier: GestureClassifier<EventQueue>,
}

impl TgClassifierHandle {
    fn boxed(config: ClassifierConfig) -> *mut TgClassifierHandle {
        let classifier = GestureClassifier::with_config(config, EventQueue::new());
        Box::into_raw(Box::new(TgClassifierHandle { classifier }))
    }
}

/// Create a classifier with default thresholds and the given touch slop (px).
///
/// A negative or non-finite slop falls back to the default.
///
/// # Safety
/// - Returns a pointer to a newly allocated classifier.
/// - Must be freed with `tg_classifier_free`.
#[no_mangle]
pub unsafe extern "C" fn tg_classifier_new(touch_slop_px: f32) -> *mut TgClassifierHandle {
    clear_last_error();

    let slop = if touch_slop_px.is_finite() && touch_slop_px >= 0.0 {
        touch_slop_px
    } else {
        DEFAULT_TOUCH_SLOP_PX
    };

    TgClassifierHandle::boxed(ClassifierConfig::with_touch_slop(slop))
}

/// Create a classifier from a TOML config document.
///
/// # Safety
/// - `config` must be a valid null-terminated C string.
/// - Must be freed with `tg_classifier_free`.
/// - Returns NULL on error; call `tg_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn tg_classifier_new_from_toml(
    config: *const c_char,
) -> *mut TgClassifierHandle {
    clear_last_error();

    let toml_str = match cstr_to_string(config) {
        Some(s) => s,
        None => {
            set_last_error("Invalid config string pointer");
            return ptr::null_mut();
        }
    };

    match ClassifierConfig::from_toml_str(&toml_str) {
        Ok(config) => TgClassifierHandle::boxed(config),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Free a classifier.
///
/// # Safety
/// - `classifier` must be a valid pointer returned by `tg_classifier_new*`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn tg_classifier_free(classifier: *mut TgClassifierHandle) {
    if !classifier.is_null() {
        drop(Box::from_raw(classifier));
    }
}

/// Feed one contact sample.
///
/// # Safety
/// - `classifier` must be a valid pointer returned by `tg_classifier_new*`.
/// - Returns 1 if the sample produced a handled gesture or scroll, 0 if not,
///   and -1 on invalid arguments; call `tg_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn tg_classifier_feed(
    classifier: *mut TgClassifierHandle,
    kind: i32,
    slot: i32,
    x: f32,
    y: f32,
    timestamp_ms: u64,
) -> i32 {
    clear_last_error();

    if classifier.is_null() {
        set_last_error("Null classifier pointer");
        return -1;
    }

    let handle = &mut *classifier;

    match decode_sample(kind, slot, x, y, timestamp_ms) {
        Ok(sample) => i32::from(handle.classifier.feed(sample)),
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Take the oldest pending event as JSON.
///
/// # Safety
/// - `classifier` must be a valid pointer returned by `tg_classifier_new*`.
/// - Returns a newly allocated string that must be freed with `tg_free_string`.
/// - Returns NULL when no event is pending or on error; `tg_last_error` is
///   only set in the error case.
#[no_mangle]
pub unsafe extern "C" fn tg_classifier_poll(classifier: *mut TgClassifierHandle) -> *mut c_char {
    clear_last_error();

    if classifier.is_null() {
        set_last_error("Null classifier pointer");
        return ptr::null_mut();
    }

    let handle = &mut *classifier;

    match handle.classifier.listener_mut().pop() {
        Some(event) => match serde_json::to_string(&event) {
            Ok(json) => string_to_cstr(&json),
            Err(e) => {
                set_last_error(&e.to_string());
                ptr::null_mut()
            }
        },
        None => ptr::null_mut(),
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by a `tg_*` function.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a `tg_*` function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn tg_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next `tg_*` call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn tg_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn tg_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GestureEvent;

    unsafe fn poll_all(classifier: *mut TgClassifierHandle) -> Vec<GestureEvent> {
        let mut events = Vec::new();
        loop {
            let json = tg_classifier_poll(classifier);
            if json.is_null() {
                break;
            }
            let text = CStr::from_ptr(json).to_str().unwrap().to_string();
            tg_free_string(json);
            events.push(serde_json::from_str(&text).unwrap());
        }
        events
    }

    #[test]
    fn test_ffi_tap_lifecycle() {
        unsafe {
            let classifier = tg_classifier_new(8.0);
            assert!(!classifier.is_null());

            assert_eq!(tg_classifier_feed(classifier, 0, 0, 200.0, 200.0, 100), 0);
            assert_eq!(tg_classifier_feed(classifier, 1, 0, 201.0, 200.0, 110), 0);
            assert_eq!(tg_classifier_feed(classifier, 2, 0, 201.0, 200.0, 120), 1);

            let events = poll_all(classifier);
            let gestures: Vec<_> = events.iter().filter_map(GestureEvent::gesture).collect();
            assert_eq!(gestures, vec![crate::types::Gesture::Tap]);
            assert_eq!(events.last(), Some(&GestureEvent::TouchEnded));

            tg_classifier_free(classifier);
        }
    }

    #[test]
    fn test_ffi_poll_json_shape() {
        unsafe {
            let classifier = tg_classifier_new(8.0);
            tg_classifier_feed(classifier, 0, 0, 0.0, 0.0, 0);
            tg_classifier_feed(classifier, 2, 0, 0.0, 0.0, 10);

            let json = tg_classifier_poll(classifier);
            assert!(!json.is_null());
            let text = CStr::from_ptr(json).to_str().unwrap();
            assert_eq!(text, r#"{"event":"gesture","gesture":"TAP"}"#);
            tg_free_string(json);

            tg_classifier_free(classifier);
        }
    }

    #[test]
    fn test_ffi_invalid_arguments() {
        unsafe {
            assert_eq!(tg_classifier_feed(ptr::null_mut(), 0, 0, 0.0, 0.0, 0), -1);
            assert!(!tg_last_error().is_null());

            let classifier = tg_classifier_new(f32::NAN);
            assert_eq!(tg_classifier_feed(classifier, 7, 0, 0.0, 0.0, 0), -1);
            let error = CStr::from_ptr(tg_last_error()).to_str().unwrap();
            assert!(error.contains("kind"), "got {error}");

            assert_eq!(tg_classifier_feed(classifier, 0, 5, 0.0, 0.0, 0), -1);
            assert_eq!(tg_classifier_feed(classifier, 0, 0, f32::INFINITY, 0.0, 0), -1);

            // A successful call clears the error
            assert_eq!(tg_classifier_feed(classifier, 0, 0, 0.0, 0.0, 0), 0);
            assert!(tg_last_error().is_null());

            tg_classifier_free(classifier);
        }
    }

    #[test]
    fn test_ffi_new_from_toml() {
        unsafe {
            let toml = CString::new(
                "touch_slop_px = 4.0\nswipe_distance_threshold_px = 100.0\n\
                 swipe_velocity_threshold_px_per_sec = 100.0\nvertical_gate_degrees = 60.0\n",
            )
            .unwrap();
            let classifier = tg_classifier_new_from_toml(toml.as_ptr());
            assert!(!classifier.is_null());
            assert_eq!((*classifier).classifier.config().touch_slop_px, 4.0);
            tg_classifier_free(classifier);

            let bad = CString::new("vertical_gate_degrees = \"steep\"").unwrap();
            assert!(tg_classifier_new_from_toml(bad.as_ptr()).is_null());
            assert!(!tg_last_error().is_null());

            assert!(tg_classifier_new_from_toml(ptr::null()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = tg_version();
            assert!(!version.is_null());

            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
