//! OpenAI Files API schemas

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ListResponse, TrueTag};
use crate::schemas::validate_one;

literal!(FileTag = "file");

/// Largest accepted upload, in bytes.
pub const MAX_FILE_SIZE: u64 = 512_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilePurpose {
    #[serde(rename = "fine-tune")]
    FineTune,
    #[serde(rename = "fine-tune-results")]
    FineTuneResults,
    #[serde(rename = "assistants")]
    Assistants,
    #[serde(rename = "assistants_output")]
    AssistantsOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Processed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FileObject {
    pub id: String,
    /// Size in bytes.
    pub bytes: u64,
    pub created_at: i64,
    pub filename: String,
    #[serde(default)]
    pub object: FileTag,
    pub purpose: FilePurpose,
    /// Deprecated by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    /// Deprecated by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_details: Option<String>,
}

/// Metadata of the uploaded file part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UploadFile {
    pub name: String,
    #[validate(range(min = 1, max = 512000000))]
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadPurpose {
    #[serde(rename = "fine-tune")]
    FineTune,
    #[serde(rename = "assistants")]
    Assistants,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UploadFileRequest {
    #[validate(custom(function = "validate_one"))]
    pub file: UploadFile,
    pub purpose: UploadPurpose,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DeleteFileResponse {
    pub id: String,
    #[serde(default)]
    pub object: FileTag,
    #[serde(default)]
    pub deleted: TrueTag,
}

pub type ListFilesResponse = ListResponse<FileObject>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_object() {
        let file: FileObject = serde_json::from_value(json!({
            "id": "file-abc123",
            "object": "file",
            "bytes": 120000,
            "created_at": 1677610602,
            "filename": "salesOverview.pdf",
            "purpose": "assistants"
        }))
        .unwrap();
        assert_eq!(file.purpose, FilePurpose::Assistants);
        assert!(file.status.is_none());
    }

    #[test]
    fn test_upload_size_limits() {
        let mut request = UploadFileRequest {
            file: UploadFile {
                name: "train.jsonl".to_string(),
                size: MAX_FILE_SIZE,
                mime_type: "application/jsonl".to_string(),
            },
            purpose: UploadPurpose::FineTune,
        };
        assert!(request.validate().is_ok());

        request.file.size = MAX_FILE_SIZE + 1;
        assert!(request.validate().is_err());
        request.file.size = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upload_purpose_subset() {
        let request = json!({
            "file": {"name": "a", "size": 1, "type": "text/plain"},
            "purpose": "assistants_output"
        });
        assert!(serde_json::from_value::<UploadFileRequest>(request).is_err());
    }
}
