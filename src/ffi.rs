//! FFI bindings for the Vitalspan engine
//!
//! C-compatible functions for calling the engine from a mobile host app.
//! All functions use null-terminated C strings carrying JSON and return
//! allocated memory that must be freed by the caller using
//! `vitalspan_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::cache::MemoryStore;
use crate::engine::ImpactEngine;
use crate::types::{HealthMetric, ReportingPeriod, UserProfile};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert a C string to a Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert a Rust string to a C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn parse_inputs(
    metrics_json: &str,
    profile_json: &str,
    period: &str,
) -> Result<(Vec<HealthMetric>, UserProfile, ReportingPeriod), String> {
    let metrics: Vec<HealthMetric> =
        serde_json::from_str(metrics_json).map_err(|e| format!("metrics: {e}"))?;
    let profile: UserProfile =
        serde_json::from_str(profile_json).map_err(|e| format!("profile: {e}"))?;
    let period: ReportingPeriod = period.parse()?;
    Ok((metrics, profile, period))
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compute the aggregated impact for a metric set and return TotalImpact JSON.
///
/// # Safety
/// - `metrics_json`, `profile_json`, and `period` must be valid
///   null-terminated C strings; `period` is one of "day", "month", "year".
/// - Returns a newly allocated string that must be freed with
///   `vitalspan_free_string`.
/// - Returns NULL on error; call `vitalspan_last_error` for the message.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_total_impact(
    metrics_json: *const c_char,
    profile_json: *const c_char,
    period: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let (Some(metrics), Some(profile), Some(period)) = (
        cstr_to_string(metrics_json),
        cstr_to_string(profile_json),
        cstr_to_string(period),
    ) else {
        set_last_error("Invalid string pointer");
        return ptr::null_mut();
    };

    match parse_inputs(&metrics, &profile, &period) {
        Ok((metrics, profile, period)) => {
            let engine = ImpactEngine::new();
            let total = engine.total_impact(&metrics, &profile, period);
            match serde_json::to_string(&total) {
                Ok(json) => string_to_cstr(&json),
                Err(e) => {
                    set_last_error(&e.to_string());
                    ptr::null_mut()
                }
            }
        }
        Err(e) => {
            set_last_error(&e);
            ptr::null_mut()
        }
    }
}

/// List currently-firing interactions for a metric set as a JSON array.
///
/// # Safety
/// - `metrics_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with
///   `vitalspan_free_string`; NULL on error.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_active_interactions(
    metrics_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(metrics) = cstr_to_string(metrics_json) else {
        set_last_error("Invalid metrics string pointer");
        return ptr::null_mut();
    };

    let metrics: Vec<HealthMetric> = match serde_json::from_str(&metrics) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(&format!("metrics: {e}"));
            return ptr::null_mut();
        }
    };

    let engine = ImpactEngine::new();
    match serde_json::to_string(&engine.active_interactions(&metrics)) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Engine API
// ============================================================================

/// Opaque handle to an ImpactEngine with an in-memory target cache
pub struct EngineHandle {
    engine: ImpactEngine<MemoryStore>,
}

/// Create a new engine.
///
/// # Safety
/// - Returns a pointer to a newly allocated engine.
/// - Must be freed with `vitalspan_engine_free`.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_engine_new() -> *mut EngineHandle {
    clear_last_error();
    let handle = Box::new(EngineHandle {
        engine: ImpactEngine::new(),
    });
    Box::into_raw(handle)
}

/// Free an engine.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `vitalspan_engine_new`.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_engine_free(engine: *mut EngineHandle) {
    if !engine.is_null() {
        drop(Box::from_raw(engine));
    }
}

/// Look up (or solve) the daily target for one metric and return DailyTarget
/// JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `vitalspan_engine_new`.
/// - `metric_json`, `profile_json`, and `period` must be valid
///   null-terminated C strings.
/// - Returns a newly allocated string that must be freed with
///   `vitalspan_free_string`; NULL on error.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_engine_daily_target(
    engine: *mut EngineHandle,
    metric_json: *const c_char,
    profile_json: *const c_char,
    period: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }
    let handle = &mut *engine;

    let (Some(metric), Some(profile), Some(period)) = (
        cstr_to_string(metric_json),
        cstr_to_string(profile_json),
        cstr_to_string(period),
    ) else {
        set_last_error("Invalid string pointer");
        return ptr::null_mut();
    };

    let metric: HealthMetric = match serde_json::from_str(&metric) {
        Ok(m) => m,
        Err(e) => {
            set_last_error(&format!("metric: {e}"));
            return ptr::null_mut();
        }
    };
    let profile: UserProfile = match serde_json::from_str(&profile) {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&format!("profile: {e}"));
            return ptr::null_mut();
        }
    };
    let period: ReportingPeriod = match period.parse() {
        Ok(p) => p,
        Err(e) => {
            set_last_error(&e);
            return ptr::null_mut();
        }
    };

    let target = handle.engine.daily_target(&metric, &profile, period);
    match serde_json::to_string(&target) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Export the engine's target cache as JSON.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `vitalspan_engine_new`.
/// - Returns a newly allocated string that must be freed with
///   `vitalspan_free_string`; NULL on error.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_engine_export_cache(
    engine: *mut EngineHandle,
) -> *mut c_char {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return ptr::null_mut();
    }
    let handle = &*engine;

    match handle.engine.export_cache() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Restore a previously exported target cache.
///
/// # Safety
/// - `engine` must be a valid pointer returned by `vitalspan_engine_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_engine_import_cache(
    engine: *mut EngineHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if engine.is_null() {
        set_last_error("Null engine pointer");
        return -1;
    }
    let handle = &mut *engine;

    let Some(json) = cstr_to_string(json) else {
        set_last_error("Invalid JSON string pointer");
        return -1;
    };

    match handle.engine.import_cache(&json) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Vitalspan functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Vitalspan function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next Vitalspan call on this
///   thread. Do NOT free it.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Vitalspan library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn vitalspan_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
