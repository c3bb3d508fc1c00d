//! C-ABI wrapper around `openforms-core`.
//!
//! # Overview
//! Lets a host written in any language with a C FFI create an Open Forms
//! client, run the health check, build the cached form choice list and fetch
//! forms as JSON. Unlike the core's transport seam, the I/O happens inside
//! these calls: each one blocks for at most the configured timeout.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - A client handle owns its own in-memory choice cache; there is no
//!   process-wide state.
//! - The C caller owns all returned pointers and must call the matching
//!   `openforms_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use openforms_core::{
    get_form_choices, ChoiceOptions, ClientConfig, MemoryCache, OpenFormsClient,
    DEFAULT_CLIENT_TIMEOUT,
};

use types::*;

/// Borrow a C string as `&str`; null or invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned reference.
unsafe fn str_arg<'a>(ptr: *const c_char) -> &'a str {
    if ptr.is_null() {
        return "";
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `api_root` authenticating with `api_token`.
///
/// `api_token` may be null (empty token). A `timeout_secs` of 0 selects the
/// default timeout. An empty `api_root` yields a null client on which every
/// remote call is skipped. Returns null if `api_root` is null or an internal
/// panic occurs. Free with `openforms_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_new(
    api_root: *const c_char,
    api_token: *const c_char,
    timeout_secs: u32,
) -> *mut FfiClient {
    catch_unwind(AssertUnwindSafe(|| {
        if api_root.is_null() {
            return std::ptr::null_mut();
        }
        let root = unsafe { str_arg(api_root) };
        let token = unsafe { str_arg(api_token) };
        let timeout = match timeout_secs {
            0 => DEFAULT_CLIENT_TIMEOUT,
            secs => u64::from(secs),
        };
        let config = ClientConfig::new(root, token, Duration::from_secs(timeout));
        Box::into_raw(Box::new(FfiClient {
            inner: OpenFormsClient::new(config),
            choices: MemoryCache::new(),
        }))
    }))
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `openforms_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_free(client: *mut FfiClient) {
    if !client.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            drop(unsafe { Box::from_raw(client) });
        }));
    }
}

/// False for a null client or a null pointer.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_has_config(client: *const FfiClient) -> bool {
    if client.is_null() {
        return false;
    }
    catch_unwind(AssertUnwindSafe(|| unsafe { &*client }.inner.has_config())).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Health and choices
// ---------------------------------------------------------------------------

/// Run the health check. Never returns null.
///
/// Free with `openforms_free_health`.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_is_healthy(client: *const FfiClient) -> *mut FfiHealth {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiHealth::new(false, "null argument: client");
        }
        let client = unsafe { &*client };
        let (ok, message) = client.inner.is_healthy();
        FfiHealth::new(ok, &message)
    }))
    .unwrap_or_else(|_| {
        tracing::error!("panic in openforms_client_is_healthy");
        FfiHealth::new(false, "panic in openforms_client_is_healthy")
    })
}

/// Build the form choice list, served from the client's cache for 60 s.
///
/// `blank_label` may be null to use the default placeholder. Returns null
/// only if `client` is null or a panic occurs. Free with
/// `openforms_free_choices`.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_form_choices(
    client: *const FfiClient,
    use_uuids: bool,
    include_blank: bool,
    blank_label: *const c_char,
) -> *mut FfiChoiceList {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let mut options = ChoiceOptions::new(use_uuids, include_blank);
        if !blank_label.is_null() {
            options = options.blank_label(unsafe { str_arg(blank_label) });
        }
        let choices = get_form_choices(&client.inner, &client.choices, &options);
        FfiChoiceList::from_core(choices)
    }))
    .unwrap_or_else(|_| {
        tracing::error!("panic in openforms_client_form_choices");
        std::ptr::null_mut()
    })
}

// ---------------------------------------------------------------------------
// Fetch functions
// ---------------------------------------------------------------------------

/// Fetch all forms. On success `json` holds a JSON array.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_get_forms(client: *const FfiClient) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        let client = unsafe { &*client };
        match client.inner.get_forms() {
            Ok(forms) => match serde_json::to_string(&forms) {
                Ok(json) => FfiResult::ok_json(&json),
                Err(e) => FfiResult::panic(&format!("serialization failed: {e}")),
            },
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in openforms_client_get_forms"))
}

/// Fetch one form by UUID or slug. On success `json` holds a JSON object.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_client_get_form(
    client: *const FfiClient,
    uuid_or_slug: *const c_char,
) -> *mut FfiResult {
    catch_unwind(AssertUnwindSafe(|| {
        if client.is_null() {
            return FfiResult::null_arg("client");
        }
        if uuid_or_slug.is_null() {
            return FfiResult::null_arg("uuid_or_slug");
        }
        let client = unsafe { &*client };
        let identifier = unsafe { str_arg(uuid_or_slug) };
        match client.inner.get_form(identifier) {
            Ok(form) => match serde_json::to_string(&form) {
                Ok(json) => FfiResult::ok_json(&json),
                Err(e) => FfiResult::panic(&format!("serialization failed: {e}")),
            },
            Err(e) => FfiResult::from_error(e),
        }
    }))
    .unwrap_or_else(|_| FfiResult::panic("panic in openforms_client_get_form"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHealth`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_free_health(health: *mut FfiHealth) {
    if health.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let health = unsafe { Box::from_raw(health) };
        free_c_string(health.message);
    }));
}

/// Free an `FfiChoiceList` and every string in it. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_free_choices(list: *mut FfiChoiceList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let list = unsafe { Box::from_raw(list) };
        if list.items.is_null() || list.len == 0 {
            return;
        }
        let items = unsafe {
            Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                list.items,
                list.len as usize,
            ))
        };
        for item in items.iter() {
            free_c_string(item.value);
            free_c_string(item.label);
        }
    }));
}

/// Free an `FfiResult`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.json);
    }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn openforms_free_string(s: *mut c_char) {
    let _ = catch_unwind(AssertUnwindSafe(|| free_c_string(s)));
}

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
