//! HTTP service submitting a batch of images to the Processing Endpoint.

use gloo_net::http::Request;
use serde_json::Value;
use web_sys::{AbortSignal, File, FormData};

use crate::config::UPLOAD_FIELD;
use crate::session::GENERIC_FAILURE_MESSAGE;
use crate::types::{AppError, AppResult, UploadResult};

/// Upload every file in one multipart POST, in the given order.
///
/// Aborting `signal` fails the call with [`AppError::Cancelled`].
pub async fn submit_files(
    files: &[File],
    backend_url: &str,
    signal: Option<&AbortSignal>,
) -> AppResult<UploadResult> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Upload(format!("Failed to create FormData: {:?}", e)))?;

    for file in files {
        form_data
            .append_with_blob_and_filename(UPLOAD_FIELD, file, &file.name())
            .map_err(|e| AppError::Upload(format!("Failed to append {}: {:?}", file.name(), e)))?;
    }

    let url = format!("{}/upload", backend_url);
    log::debug!("POST {} with {} file(s)", url, files.len());
    let request = Request::post(&url)
        .abort_signal(signal)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request.send().await.map_err(|e| {
        if signal.is_some_and(|s| s.aborted()) {
            AppError::Cancelled
        } else {
            AppError::Network(format!("HTTP request failed: {}", e))
        }
    })?;

    // Failures come back as JSON too, so the body is read whatever the status.
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read response: {}", e)))?;
    log::debug!("Upload answered {} ({} bytes)", status, body.len());

    parse_upload_response(&body)
}

/// Interpret a Processing Endpoint body.
///
/// `success: true` decodes into an [`UploadResult`]; anything else is an
/// [`AppError::Upload`] carrying the server `error` text or a fallback.
pub fn parse_upload_response(body: &str) -> AppResult<UploadResult> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::Validation(format!("Failed to parse response: {}", e)))?;

    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        let reason = value
            .get("error")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        return Err(AppError::Upload(reason.to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Unexpected response shape: {}", e)))
}

/// Notice text when the request outlived [`crate::config::REQUEST_TIMEOUT_MS`].
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Text shown for a failed submission.
///
/// An abort fired by the timeout timer reads as a timeout, any other abort
/// as a user cancel.
pub fn failure_message(error: &AppError, timed_out: bool) -> String {
    match error {
        AppError::Cancelled if timed_out => TIMEOUT_MESSAGE.to_string(),
        other => other.message(),
    }
}
