//! C-ABI wrapper around `vet-core`.
//!
//! # Overview
//! Exposes the boarding API client through `extern "C"` functions so a host
//! written in any language with a C FFI can build requests, perform the
//! HTTP exchange itself, and hand the response back for parsing.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Collections are addressed by their path name (`"specimens"`,
//!   `"specimen-categories"`, ...) and one `vet_build_request` /
//!   `vet_parse_response` pair serves all of them.
//! - Bodies and payloads cross as JSON text inside a single `FfiVetResult`
//!   envelope.
//! - The C caller owns all returned pointers and must call the matching
//!   `vet_free_*` function to release them.

mod dispatch;
#[cfg(test)]
mod roundtrip;
pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use vet_core::auth::AuthClient;
use vet_core::http::HttpResponse;
use vet_core::types::{ChangePassword, ForgotPassword, LoginRequest, ResetPassword};
use vet_core::{schemas, ApiClient, ApiError, FileTokenStore, FormValues, MemoryTokenStore, ResourceKind, Session, TokenStore};

use dispatch::Rejected;
use types::*;

/// `catch_unwind` for bodies that touch the client handle, which is not
/// `RefUnwindSafe` because its token store is a trait object.
fn guard<R>(f: impl FnOnce() -> R) -> std::thread::Result<R> {
    catch_unwind(AssertUnwindSafe(f))
}

/// Borrow a C string as `&str`. Null and non-UTF-8 input yield `None`.
fn read_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

fn read_id(id: *const c_char) -> Result<Option<uuid::Uuid>, String> {
    match read_str(id) {
        None => Ok(None),
        Some(raw) => uuid::Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| format!("invalid id: {raw}")),
    }
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_str(resp.body).unwrap_or(""))
}

/// Install a `tracing` subscriber writing to stderr, filtered by `RUST_LOG`.
/// Hosts that route logs elsewhere simply never call this.
#[unsafe(no_mangle)]
pub extern "C" fn vet_init_logging() {
    let _ = catch_unwind(vet_core::logging::init);
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`.
///
/// `token_file` may be null, in which case the session lives in memory only.
/// Otherwise the bearer token is persisted to that file; call
/// `vet_session_restore` to pick up a token saved by an earlier run.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `vet_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_client_new(base_url: *const c_char, token_file: *const c_char) -> *mut FfiVetClient {
    guard(|| {
        let Some(url) = read_str(base_url) else {
            return std::ptr::null_mut();
        };
        let store: Arc<dyn TokenStore> = match read_str(token_file) {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        let inner = ApiClient::new(url, Session::new(store));
        Box::into_raw(Box::new(FfiVetClient { inner }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `vet_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn vet_client_free(client: *mut FfiVetClient) {
    if !client.is_null() {
        let _ = guard(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Load a persisted token into the session. Returns whether one was found.
///
/// The token is unverified; follow up with a `CurrentUser` auth request.
#[unsafe(no_mangle)]
pub extern "C" fn vet_session_restore(client: *const FfiVetClient) -> bool {
    if client.is_null() {
        return false;
    }
    guard(|| unsafe { &*client }.inner.session().restore()).unwrap_or(false)
}

/// Install a bearer token obtained out of band. A null token clears the session.
#[unsafe(no_mangle)]
pub extern "C" fn vet_session_set_token(client: *const FfiVetClient, token: *const c_char) {
    if client.is_null() {
        return;
    }
    let _ = guard(|| {
        let session = unsafe { &*client }.inner.session();
        match read_str(token) {
            Some(token) if !token.is_empty() => session.set(token, None),
            _ => session.clear(),
        }
    });
}

/// Sign out: drop the token from memory and from the token store.
#[unsafe(no_mangle)]
pub extern "C" fn vet_session_clear(client: *const FfiVetClient) {
    if client.is_null() {
        return;
    }
    let _ = guard(|| unsafe { &*client }.inner.session().clear());
}

#[unsafe(no_mangle)]
pub extern "C" fn vet_session_is_authenticated(client: *const FfiVetClient) -> bool {
    if client.is_null() {
        return false;
    }
    guard(|| unsafe { &*client }.inner.session().is_authenticated()).unwrap_or(false)
}

/// Current bearer token, or null when signed out.
/// Free the returned string with `vet_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_session_token(client: *const FfiVetClient) -> *mut c_char {
    if client.is_null() {
        return std::ptr::null_mut();
    }
    guard(|| match unsafe { &*client }.inner.session().token() {
        Some(token) => c_string(token),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Build the HTTP request for `op` on the collection named `resource`.
///
/// `id` is required for every operation except `List` and `Create`.
/// `body_json` is required for `Create`, `Update`, `SetStatus` and `Move`
/// and must match the collection's input shape.
///
/// Returns null if an argument is null or unusable, or if the body does not
/// decode. The caller must free the returned pointer with `vet_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_build_request(
    client: *const FfiVetClient,
    resource: *const c_char,
    op: FfiOperation,
    id: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    guard(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let Some(kind) = read_str(resource).and_then(|r| r.parse::<ResourceKind>().ok()) else {
            return std::ptr::null_mut();
        };
        let Ok(id) = read_id(id) else {
            return std::ptr::null_mut();
        };
        match dispatch::build_request(&client.inner, kind, op, id, read_str(body_json)) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(Rejected::Invalid(reason)) => {
                tracing::debug!(resource = %kind, ?op, %reason, "request rejected");
                std::ptr::null_mut()
            }
            Err(Rejected::Api(err)) => {
                tracing::debug!(resource = %kind, ?op, error = %err, "request rejected");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse the response to a request built by `vet_build_request`.
///
/// On success `data_json` holds the entity (or the array for `List`);
/// `Delete` succeeds with null `data_json`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_parse_response(
    client: *const FfiVetClient,
    resource: *const c_char,
    op: FfiOperation,
    response: *const FfiHttpResponse,
) -> *mut FfiVetResult {
    guard(|| {
        if client.is_null() {
            return FfiVetResult::null_arg("client");
        }
        if response.is_null() {
            return FfiVetResult::null_arg("response");
        }
        let Some(raw) = read_str(resource) else {
            return FfiVetResult::null_arg("resource");
        };
        let kind = match raw.parse::<ResourceKind>() {
            Ok(kind) => kind,
            Err(e) => return FfiVetResult::invalid_arg(e.to_string()),
        };
        let client = unsafe { &*client };
        let resp = ffi_response_to_core(unsafe { &*response });
        match dispatch::parse_response(&client.inner, kind, op, resp) {
            Ok(data) => FfiVetResult::ok(data),
            Err(e) => FfiVetResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiVetResult::panic("panic in vet_parse_response"))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

fn decode<T: serde::de::DeserializeOwned>(body: Option<&str>) -> Option<T> {
    serde_json::from_str(body?).ok()
}

/// Build a request under `/auth`.
///
/// `body_json` carries the credentials or password payload; `CurrentUser`
/// takes none. `reset_token` is only read for `ResetPassword`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_build_auth(
    client: *const FfiVetClient,
    op: FfiAuthOperation,
    reset_token: *const c_char,
    body_json: *const c_char,
) -> *mut FfiHttpRequest {
    guard(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let auth = AuthClient::new(unsafe { &*client }.inner.clone());
        let body = read_str(body_json);
        let built = match op {
            FfiAuthOperation::Login => decode::<LoginRequest>(body).map(|b| auth.build_login(&b)),
            FfiAuthOperation::CurrentUser => Some(Ok(auth.build_current_user())),
            FfiAuthOperation::ChangePassword => {
                decode::<ChangePassword>(body).map(|b| auth.build_change_password(&b))
            }
            FfiAuthOperation::ForgotPassword => {
                decode::<ForgotPassword>(body).map(|b| auth.build_forgot_password(&b))
            }
            FfiAuthOperation::ResetPassword => match read_str(reset_token) {
                Some(token) => decode::<ResetPassword>(body).map(|b| auth.build_reset_password(token, &b)),
                None => None,
            },
        };
        match built {
            Some(Ok(req)) => FfiHttpRequest::from_core(req),
            _ => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Parse an `/auth` response, updating the client's session.
///
/// `Login` stores the token and returns the user; `CurrentUser` refreshes
/// the stored user. The password operations return `{"message": ...}` when
/// the server sent one.
#[unsafe(no_mangle)]
pub extern "C" fn vet_parse_auth(
    client: *const FfiVetClient,
    op: FfiAuthOperation,
    response: *const FfiHttpResponse,
) -> *mut FfiVetResult {
    guard(|| {
        if client.is_null() {
            return FfiVetResult::null_arg("client");
        }
        if response.is_null() {
            return FfiVetResult::null_arg("response");
        }
        let auth = AuthClient::new(unsafe { &*client }.inner.clone());
        let resp = ffi_response_to_core(unsafe { &*response });
        let parsed = match op {
            FfiAuthOperation::Login => auth.parse_login(resp).and_then(|u| to_json(&u)),
            FfiAuthOperation::CurrentUser => auth.parse_current_user(resp).and_then(|u| to_json(&u)),
            FfiAuthOperation::ChangePassword => auth
                .parse_change_password(resp)
                .map(|msg| msg.map(|message| serde_json::json!({ "message": message }))),
            FfiAuthOperation::ForgotPassword => auth.parse_forgot_password(resp).and_then(|m| to_json(&m)),
            FfiAuthOperation::ResetPassword => auth.parse_reset_password(resp).and_then(|m| to_json(&m)),
        };
        match parsed {
            Ok(data) => FfiVetResult::ok(data),
            Err(e) => FfiVetResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiVetResult::panic("panic in vet_parse_auth"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Option<serde_json::Value>, ApiError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|e| ApiError::Serialization(e.to_string()))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate one field of the named form schema.
///
/// `form_json` is the whole form as a flat string map and may be null; it
/// is consulted by cross-field rules such as password confirmation.
/// Returns the error message, or null when the value is valid. Free the
/// message with `vet_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn vet_validate_field(
    schema: *const c_char,
    field: *const c_char,
    value: *const c_char,
    form_json: *const c_char,
) -> *mut c_char {
    guard(|| {
        let (Some(schema), Some(field)) = (read_str(schema).and_then(schemas::by_name), read_str(field)) else {
            return std::ptr::null_mut();
        };
        let form: FormValues = decode(read_str(form_json)).unwrap_or_default();
        match vet_core::validate_field(schema, field, read_str(value).unwrap_or(""), &form) {
            Some(msg) => c_string(msg),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Validate a whole form. A clean form is `Ok`; otherwise the result is a
/// `Validation` error listing every failing field.
#[unsafe(no_mangle)]
pub extern "C" fn vet_validate_form(schema: *const c_char, form_json: *const c_char) -> *mut FfiVetResult {
    guard(|| {
        let Some(name) = read_str(schema) else {
            return FfiVetResult::null_arg("schema");
        };
        let Some(schema) = schemas::by_name(name) else {
            return FfiVetResult::invalid_arg(format!("unknown form: {name}"));
        };
        let Some(raw) = read_str(form_json) else {
            return FfiVetResult::null_arg("form_json");
        };
        let form: FormValues = match serde_json::from_str(raw) {
            Ok(form) => form,
            Err(e) => return FfiVetResult::invalid_arg(format!("invalid form: {e}")),
        };
        let errors = vet_core::validate_all(schema, &form);
        if errors.is_empty() {
            FfiVetResult::ok(None)
        } else {
            FfiVetResult::from_error(ApiError::Validation(errors))
        }
    })
    .unwrap_or_else(|_| FfiVetResult::panic("panic in vet_validate_form"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Free an `FfiHttpRequest` returned by `vet_build_request` or
/// `vet_build_auth`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn vet_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = guard(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.path);
        free_c_string(req.body);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers: Box<[FfiHeader]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize))
            };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
    });
}

/// Free an `FfiVetResult`, including its field errors. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn vet_free_result(result: *mut FfiVetResult) {
    if result.is_null() {
        return;
    }
    let _ = guard(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        free_c_string(result.data_json);
        if !result.field_errors.is_null() && result.field_errors_len > 0 {
            let fields: Box<[FfiFieldError]> = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    result.field_errors,
                    result.field_errors_len as usize,
                ))
            };
            for f in fields.iter() {
                free_c_string(f.path);
                free_c_string(f.msg);
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn vet_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = guard(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
