use std::ffi::CStr;
use std::os::raw::c_char;
use std::ptr;

use serde::Serialize;
use tagsearch_core::{EntryChoice, TagSearch, TagSearchError};

/// Stable return codes for C/Kotlin/Swift callers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagsearchFfiCode {
    Ok = 0,
    InvalidArgument = 1,
    RuntimeError = 2,
    NotFound = 3,
}

/// Owned byte buffer returned across the FFI boundary.
///
/// Ownership:
/// - Producer: Rust allocates (`Box<[u8]>`) and returns pointer/len.
/// - Consumer: Calls `tagsearch_owned_bytes_free` exactly once.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TagsearchOwnedBytes {
    pub ptr: *mut u8,
    pub len: usize,
}

impl TagsearchOwnedBytes {
    const fn empty() -> Self {
        Self {
            ptr: ptr::null_mut(),
            len: 0,
        }
    }

    fn from_vec(value: Vec<u8>) -> Self {
        if value.is_empty() {
            return Self::empty();
        }
        let boxed = value.into_boxed_slice();
        let len = boxed.len();
        let ptr = Box::into_raw(boxed) as *mut u8;
        Self { ptr, len }
    }
}

/// Uniform response envelope for every exported call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TagsearchFfiResult {
    pub code: TagsearchFfiCode,
    pub payload: TagsearchOwnedBytes,
}

impl TagsearchFfiResult {
    const fn ok_empty() -> Self {
        Self {
            code: TagsearchFfiCode::Ok,
            payload: TagsearchOwnedBytes::empty(),
        }
    }

    fn ok_json_bytes(payload: Vec<u8>) -> Self {
        Self {
            code: TagsearchFfiCode::Ok,
            payload: TagsearchOwnedBytes::from_vec(payload),
        }
    }

    fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        let payload = FfiArgumentErrorPayload {
            code: "INVALID_ARGUMENT",
            operation,
            message: message.into(),
        };
        Self::json_or_internal(TagsearchFfiCode::InvalidArgument, operation, &payload)
    }

    fn runtime_error(operation: &'static str, tag: Option<&str>, err: TagSearchError) -> Self {
        let code = match err {
            TagSearchError::InvalidInput(_) => TagsearchFfiCode::InvalidArgument,
            TagSearchError::NotFound(_) => TagsearchFfiCode::NotFound,
            _ => TagsearchFfiCode::RuntimeError,
        };
        tracing::debug!(operation, code = err.code(), error = %err, "ffi call failed");
        let payload = err.to_payload(operation.to_string(), tag.map(str::to_string));
        Self::json_or_internal(code, operation, &payload)
    }

    fn internal_error(operation: &'static str, message: impl Into<String>) -> Self {
        let payload = FfiArgumentErrorPayload {
            code: "FFI_INTERNAL",
            operation,
            message: message.into(),
        };
        Self::json_or_internal(TagsearchFfiCode::RuntimeError, operation, &payload)
    }

    fn json_or_internal(
        code: TagsearchFfiCode,
        operation: &'static str,
        payload: &impl Serialize,
    ) -> Self {
        match serde_json::to_vec(payload) {
            Ok(json) => Self {
                code,
                payload: TagsearchOwnedBytes::from_vec(json),
            },
            Err(err) => {
                let fallback = format!(
                    r#"{{"code":"FFI_INTERNAL","operation":"{operation}","message":"failed to serialize payload: {err}"}}"#
                )
                .into_bytes();
                Self {
                    code: TagsearchFfiCode::RuntimeError,
                    payload: TagsearchOwnedBytes::from_vec(fallback),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct FfiArgumentErrorPayload<'a> {
    code: &'static str,
    operation: &'a str,
    message: String,
}

/// Opaque runtime handle for mobile callers.
pub struct TagsearchRuntime {
    app: TagSearch,
}

#[unsafe(no_mangle)]
/// Open the saved searches stored under `root_dir` and hydrate the registry.
///
/// # Safety
/// - `root_dir` must point to a valid NUL-terminated UTF-8 string.
/// - `out_runtime` must be non-null and writable.
/// - Caller must eventually pass returned runtime to `tagsearch_runtime_free`.
pub unsafe extern "C" fn tagsearch_runtime_new(
    root_dir: *const c_char,
    out_runtime: *mut *mut TagsearchRuntime,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.new";

    if out_runtime.is_null() {
        return TagsearchFfiResult::invalid_argument(OPERATION, "out_runtime pointer is null");
    }

    let root_dir = match parse_required_c_string(root_dir, OPERATION, "root_dir") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match TagSearch::open(&root_dir) {
        Ok(app) => {
            let runtime = Box::new(TagsearchRuntime { app });
            // SAFETY: `out_runtime` was validated as non-null and points to writable caller memory.
            unsafe {
                *out_runtime = Box::into_raw(runtime);
            }
            TagsearchFfiResult::ok_empty()
        }
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, None, err),
    }
}

#[unsafe(no_mangle)]
/// List saved tags (or tag/query entries) in display order as JSON.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `runtime` must not be used concurrently without external synchronization.
pub unsafe extern "C" fn tagsearch_runtime_list_json(
    runtime: *mut TagsearchRuntime,
    with_queries: bool,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.list_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    if with_queries {
        json_success(OPERATION, &runtime.app.entries())
    } else {
        json_success(OPERATION, &runtime.app.tags())
    }
}

#[unsafe(no_mangle)]
/// Look up the query stored for `tag`.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` must be a valid NUL-terminated UTF-8 string.
pub unsafe extern "C" fn tagsearch_runtime_get_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.get_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match runtime.app.query(&tag) {
        Some(query) => json_success(
            OPERATION,
            &serde_json::json!({
                "tag": tag,
                "query": query,
            }),
        ),
        None => TagsearchFfiResult::runtime_error(
            OPERATION,
            Some(&tag),
            TagSearchError::NotFound(format!("saved search '{tag}'")),
        ),
    }
}

#[unsafe(no_mangle)]
/// Save a new search or replace the query of an existing tag.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` and `query` must be valid NUL-terminated UTF-8 strings.
pub unsafe extern "C" fn tagsearch_runtime_save_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
    query: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.save_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };
    let query = match parse_c_string(query, OPERATION, "query") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match runtime.app.save(&tag, &query) {
        Ok(saved) => json_success(OPERATION, &saved),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, Some(&tag), err),
    }
}

#[unsafe(no_mangle)]
/// Delete a saved search. Unknown tags succeed with `removed: false`.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` must be a valid NUL-terminated UTF-8 string.
pub unsafe extern "C" fn tagsearch_runtime_delete_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.delete_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match runtime.app.remove(&tag) {
        Ok(removed) => json_success(OPERATION, &removed),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, Some(&tag), err),
    }
}

#[unsafe(no_mangle)]
/// Build the browser URL for a saved search. The host opens it.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` must be a valid NUL-terminated UTF-8 string.
pub unsafe extern "C" fn tagsearch_runtime_search_url_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.search_url_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match runtime.app.search_url(&tag) {
        Ok(url) => json_success(OPERATION, &serde_json::json!({ "tag": tag, "url": url })),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, Some(&tag), err),
    }
}

#[unsafe(no_mangle)]
/// Build the share subject/body for a saved search.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` must be a valid NUL-terminated UTF-8 string.
pub unsafe extern "C" fn tagsearch_runtime_share_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.share_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };

    match runtime.app.share_message(&tag) {
        Ok(message) => json_success(OPERATION, &message),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, Some(&tag), err),
    }
}

#[unsafe(no_mangle)]
/// Resolve the user's share/edit/delete pick for `tag`.
///
/// A null `choice` means the chooser was dismissed. A `delete` outcome does
/// not remove anything; call `tagsearch_runtime_delete_json` after the host
/// confirms.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
/// - `tag` must be a valid NUL-terminated UTF-8 string.
/// - `choice` must be null or a valid NUL-terminated UTF-8 string.
pub unsafe extern "C" fn tagsearch_runtime_entry_choice_json(
    runtime: *mut TagsearchRuntime,
    tag: *const c_char,
    choice: *const c_char,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.entry_choice_json";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };
    let tag = match parse_c_string(tag, OPERATION, "tag") {
        Ok(value) => value,
        Err(result) => return result,
    };
    let choice = match parse_optional_c_string(choice, OPERATION, "choice") {
        Ok(value) => value,
        Err(result) => return result,
    };
    let choice = match choice.as_deref().map(str::parse::<EntryChoice>).transpose() {
        Ok(choice) => choice,
        Err(err) => return TagsearchFfiResult::invalid_argument(OPERATION, err.to_string()),
    };

    match runtime.app.resolve_entry_choice(&tag, choice) {
        Ok(outcome) => json_success(OPERATION, &outcome),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, Some(&tag), err),
    }
}

#[unsafe(no_mangle)]
/// Make every accepted save/delete durable before returning.
///
/// # Safety
/// - `runtime` must be a live pointer previously returned by `tagsearch_runtime_new`.
pub unsafe extern "C" fn tagsearch_runtime_flush(
    runtime: *mut TagsearchRuntime,
) -> TagsearchFfiResult {
    const OPERATION: &str = "runtime.flush";

    let runtime = match runtime_from_ptr(runtime, OPERATION) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    match runtime.app.flush() {
        Ok(()) => TagsearchFfiResult::ok_empty(),
        Err(err) => TagsearchFfiResult::runtime_error(OPERATION, None, err),
    }
}

#[unsafe(no_mangle)]
/// Release a runtime handle. Pending deferred writes are flushed best-effort.
///
/// # Safety
/// - `runtime` must be null or a pointer returned by `tagsearch_runtime_new`.
/// - The pointer must not be used after this call.
pub unsafe extern "C" fn tagsearch_runtime_free(runtime: *mut TagsearchRuntime) {
    if runtime.is_null() {
        return;
    }
    // SAFETY: pointer originates from `Box::into_raw` in `tagsearch_runtime_new`.
    unsafe {
        drop(Box::from_raw(runtime));
    }
}

#[unsafe(no_mangle)]
/// Free JSON/byte payload memory returned by FFI calls.
///
/// # Safety
/// - `bytes` must be a value returned by this crate.
/// - The value must be freed exactly once.
pub unsafe extern "C" fn tagsearch_owned_bytes_free(bytes: TagsearchOwnedBytes) {
    if bytes.ptr.is_null() || bytes.len == 0 {
        return;
    }
    // SAFETY: pointer/len come from `TagsearchOwnedBytes::from_vec`, which uses `Box<[u8]>`.
    unsafe {
        let slice_ptr = ptr::slice_from_raw_parts_mut(bytes.ptr, bytes.len);
        drop(Box::from_raw(slice_ptr));
    }
}

fn parse_required_c_string(
    raw: *const c_char,
    operation: &'static str,
    field: &'static str,
) -> std::result::Result<String, TagsearchFfiResult> {
    let value = parse_c_string(raw, operation, field)?;
    let value = value.trim();
    if value.is_empty() {
        return Err(TagsearchFfiResult::invalid_argument(
            operation,
            format!("{field} must be non-empty"),
        ));
    }
    Ok(value.to_string())
}

/// Tags and queries are passed through untrimmed; emptiness is the
/// registry's call so hosts get its `INVALID_INPUT` payload.
fn parse_c_string(
    raw: *const c_char,
    operation: &'static str,
    field: &'static str,
) -> std::result::Result<String, TagsearchFfiResult> {
    if raw.is_null() {
        return Err(TagsearchFfiResult::invalid_argument(
            operation,
            format!("{field} pointer is null"),
        ));
    }

    // SAFETY: `raw` is checked for null and expected to be a NUL-terminated C string.
    let c_str = unsafe { CStr::from_ptr(raw) };
    c_str.to_str().map(str::to_string).map_err(|err| {
        TagsearchFfiResult::invalid_argument(operation, format!("{field} must be valid UTF-8: {err}"))
    })
}

fn parse_optional_c_string(
    raw: *const c_char,
    operation: &'static str,
    field: &'static str,
) -> std::result::Result<Option<String>, TagsearchFfiResult> {
    if raw.is_null() {
        return Ok(None);
    }

    // SAFETY: `raw` is non-null and expected to be a NUL-terminated C string.
    let c_str = unsafe { CStr::from_ptr(raw) };
    let value = c_str.to_str().map(str::trim).map_err(|err| {
        TagsearchFfiResult::invalid_argument(operation, format!("{field} must be valid UTF-8: {err}"))
    })?;
    if value.is_empty() {
        return Ok(None);
    }
    Ok(Some(value.to_string()))
}

fn runtime_from_ptr<'a>(
    runtime: *mut TagsearchRuntime,
    operation: &'static str,
) -> std::result::Result<&'a mut TagsearchRuntime, TagsearchFfiResult> {
    if runtime.is_null() {
        return Err(TagsearchFfiResult::invalid_argument(
            operation,
            "runtime pointer is null",
        ));
    }
    // SAFETY: pointer null-check is performed above; caller owns lifecycle.
    Ok(unsafe { &mut *runtime })
}

fn json_success(operation: &'static str, payload: &impl Serialize) -> TagsearchFfiResult {
    match serde_json::to_vec(payload) {
        Ok(payload) => TagsearchFfiResult::ok_json_bytes(payload),
        Err(err) => TagsearchFfiResult::internal_error(
            operation,
            format!("json encode failed for {operation}: {err}"),
        ),
    }
}
