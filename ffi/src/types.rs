//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core value with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointer + length instead of `Vec`,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use openforms_core::{ApiError, Choice, MemoryCache, OpenFormsClient, TransportError};

/// Opaque handle to a client and its private choice-list cache.
pub struct FfiClient {
    pub(crate) inner: OpenFormsClient,
    pub(crate) choices: MemoryCache<Vec<Choice>>,
}

/// Copy `s` into a heap C string owned by the caller.
///
/// Interior NUL bytes cannot be represented and are dropped.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    let bytes: Vec<u8> = s.bytes().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

/// Outcome of `openforms_client_is_healthy`. `message` is empty when `ok`.
#[repr(C)]
pub struct FfiHealth {
    pub ok: bool,
    pub message: *mut c_char,
}

impl FfiHealth {
    pub(crate) fn new(ok: bool, message: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiHealth {
            ok,
            message: to_c_string(message),
        }))
    }
}

// ---------------------------------------------------------------------------
// Choices
// ---------------------------------------------------------------------------

/// A single `(value, label)` pair exposed to C.
#[repr(C)]
pub struct FfiChoice {
    pub value: *mut c_char,
    pub label: *mut c_char,
}

/// An ordered list of choices exposed to C.
#[repr(C)]
pub struct FfiChoiceList {
    pub items: *mut FfiChoice,
    pub len: u32,
}

impl FfiChoiceList {
    pub(crate) fn from_core(choices: Vec<Choice>) -> *mut Self {
        let len = choices.len() as u32;
        let items: Box<[FfiChoice]> = choices
            .into_iter()
            .map(|(value, label)| FfiChoice {
                value: to_c_string(&value),
                label: to_c_string(&label),
            })
            .collect();

        // Freed by `openforms_free_choices`, which rebuilds the boxed slice.
        let items = if items.is_empty() {
            std::ptr::null_mut()
        } else {
            Box::into_raw(items) as *mut FfiChoice
        };
        Box::into_raw(Box::new(FfiChoiceList { items, len }))
    }
}

// ---------------------------------------------------------------------------
// Fetch results
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiResult`.
#[repr(C)]
#[derive(Debug, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Transport = 3,
    Timeout = 4,
    Deserialization = 5,
    InvalidUrl = 6,
    Panic = 7,
    NullArg = 8,
}

/// Result envelope for `openforms_client_get_forms` / `openforms_client_get_form`.
///
/// On success `error_code` is `Ok`, `error_message` is null and `json` holds
/// the form (or list of forms) serialized as JSON. On failure `json` is null,
/// `error_message` describes the problem and `http_status` is set when the
/// server answered.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiResult {
    pub(crate) fn ok_json(json: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            json: to_c_string(json),
        }))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::NotFound => FfiErrorCode::NotFound,
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Transport(TransportError::Timeout(_)) => FfiErrorCode::Timeout,
            ApiError::Transport(_) => FfiErrorCode::Transport,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::InvalidUrl(_) => FfiErrorCode::InvalidUrl,
        };
        Self::error(error_code, err.status().unwrap_or(0), &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: to_c_string(msg),
            http_status,
            json: std::ptr::null_mut(),
        }))
    }
}
