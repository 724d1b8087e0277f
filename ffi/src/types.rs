//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Payloads cross as JSON text so
//! one result envelope serves every entity. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use vet_core::error::ApiError;
use vet_core::http::HttpMethod;
use vet_core::ApiClient;

/// Opaque handle to an `ApiClient` and its session. C callers receive a
/// pointer to this and pass it back into every FFI function.
pub struct FfiVetClient {
    pub(crate) inner: ApiClient,
}

/// Convert to an owned C string. Interior NUL bytes cannot cross the
/// boundary, so they are dropped.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    let s: String = s.into();
    let bytes: Vec<u8> = s.into_bytes().into_iter().filter(|b| *b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Patch = 3,
    Delete = 4,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Patch => FfiHttpMethod::Patch,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `vet_build_*` functions. The C caller executes the request
/// and passes the response back through `vet_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: vet_core::HttpRequest) -> *mut Self {
        let path = c_string(req.path);
        let body = req.body.map(c_string).unwrap_or(std::ptr::null_mut());

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to a `vet_parse_*` function. The FFI layer reads
/// but does not free these fields. A null `body` is an empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Collection operations accepted by `vet_build_request` / `vet_parse_response`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiOperation {
    List = 0,
    Get = 1,
    Create = 2,
    Update = 3,
    Delete = 4,
    /// `services` and `medicines` only; body is `{"status": ...}` or `{"estado": ...}`.
    SetStatus = 5,
    /// `specimens` only; body is `{"categoryId", "sedeId"}`.
    Move = 6,
}

/// Operations under `/auth`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiAuthOperation {
    Login = 0,
    CurrentUser = 1,
    ChangePassword = 2,
    ForgotPassword = 3,
    ResetPassword = 4,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiVetResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Validation = 1,
    Unauthorized = 2,
    NotFound = 3,
    Api = 4,
    Transport = 5,
    Deserialization = 6,
    Serialization = 7,
    Panic = 8,
    NullArg = 9,
    InvalidArg = 10,
}

/// One server or client-side field error.
#[repr(C)]
pub struct FfiFieldError {
    pub path: *mut c_char,
    pub msg: *mut c_char,
}

/// Result envelope for all parse and validate operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `data_json`
/// holds the payload as JSON (null for empty responses).
/// On failure `error_code` describes the category and `error_message` is a
/// banner-ready C string. `Validation` failures also list `field_errors`.
/// `login_required` is set when the failure tore the session down.
#[repr(C)]
pub struct FfiVetResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub data_json: *mut c_char,
    pub field_errors: *mut FfiFieldError,
    pub field_errors_len: u32,
    pub login_required: bool,
}

impl FfiVetResult {
    fn new(error_code: FfiErrorCode) -> Self {
        FfiVetResult {
            error_code,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            data_json: std::ptr::null_mut(),
            field_errors: std::ptr::null_mut(),
            field_errors_len: 0,
            login_required: false,
        }
    }

    /// Build a success result carrying an optional JSON payload.
    pub(crate) fn ok(data: Option<serde_json::Value>) -> *mut Self {
        let mut result = Self::new(FfiErrorCode::Ok);
        if let Some(data) = data {
            result.data_json = c_string(data.to_string());
        }
        Box::into_raw(Box::new(result))
    }

    /// Build an error result from an `ApiError`.
    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let (error_code, http_status) = match &err {
            ApiError::Validation(_) => (FfiErrorCode::Validation, 422),
            ApiError::Unauthorized { status, .. } => (FfiErrorCode::Unauthorized, *status),
            ApiError::NotFound(_) => (FfiErrorCode::NotFound, 404),
            ApiError::Api { status, .. } => (FfiErrorCode::Api, *status),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
        };

        let mut result = Self::new(error_code);
        result.error_message = c_string(err.banner());
        result.http_status = http_status;
        result.login_required = err.is_auth_failure();
        if let Some(errors) = err.field_errors() {
            let fields: Box<[FfiFieldError]> = errors
                .iter()
                .map(|(path, msg)| FfiFieldError {
                    path: c_string(path),
                    msg: c_string(msg),
                })
                .collect();
            result.field_errors_len = fields.len() as u32;
            result.field_errors = Box::into_raw(fields) as *mut FfiFieldError;
        }
        Box::into_raw(Box::new(result))
    }

    /// Build an error result for a null argument.
    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    /// Build an error result for an argument that could not be used.
    pub(crate) fn invalid_arg(msg: impl Into<String>) -> *mut Self {
        Self::failure(FfiErrorCode::InvalidArg, msg.into())
    }

    /// Build an error result for a caught panic.
    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg.to_string())
    }

    fn failure(code: FfiErrorCode, msg: String) -> *mut Self {
        let mut result = Self::new(code);
        result.error_message = c_string(msg);
        Box::into_raw(Box::new(result))
    }
}
