//! JSON bodies of the upload endpoint.
//!
//! Success and failure share the `success` flag so the browser can parse the
//! body whatever the HTTP status:
//!
//! ```json
//! {"success": true, "type": "single", "original_file": "…", "output_file": "…", "file_count": 1}
//! {"success": true, "type": "bulk", "output_file": "…", "file_count": 3, "total_size": 1234}
//! {"success": false, "error": "No file selected"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::pipeline::BatchOutcome;

/// Response sent after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Always `true`
    pub success: bool,

    #[serde(flatten)]
    pub result: UploadResult,
}

/// Single/bulk part of [`UploadResponse`], tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UploadResult {
    Single {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        original_file: Option<String>,
        output_file: String,
        file_count: usize,
    },
    Bulk {
        output_file: String,
        file_count: usize,
        total_size: u64,
    },
}

impl From<BatchOutcome> for UploadResponse {
    fn from(outcome: BatchOutcome) -> Self {
        let result = match outcome {
            BatchOutcome::Single { original_file, output_file } => UploadResult::Single {
                original_file: Some(original_file),
                output_file,
                file_count: 1,
            },
            BatchOutcome::Bulk { output_file, file_count, total_size, .. } => UploadResult::Bulk {
                output_file,
                file_count,
                total_size,
            },
        };
        UploadResponse { success: true, result }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "success": false,
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_response_shape() {
        let response = UploadResponse::from(BatchOutcome::Single {
            original_file: "abc_cat.jpg".into(),
            output_file: "processed_abc.png".into(),
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "type": "single",
                "original_file": "abc_cat.jpg",
                "output_file": "processed_abc.png",
                "file_count": 1
            })
        );
    }

    #[test]
    fn test_bulk_response_reports_valid_count() {
        let response = UploadResponse::from(BatchOutcome::Bulk {
            output_file: "batch_0123abcd.zip".into(),
            file_count: 3,
            processed: 2,
            total_size: 4096,
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["type"], "bulk");
        assert_eq!(value["file_count"], 3);
        assert_eq!(value["total_size"], 4096);
        assert!(value.get("processed").is_none());
    }

    #[test]
    fn test_error_response() {
        let value = error_response("No file selected");
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "No file selected");
    }
}
