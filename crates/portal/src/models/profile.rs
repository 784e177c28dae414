//! Payloads for the profile photo upload and the live-support form

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions the server accepts for profile photos
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A file picked for upload as the `photo` multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    /// Build an upload from in-memory bytes, guessing the content type
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read photo: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Photo path has no file name")?;
        Ok(Self::new(file_name, bytes))
    }

    /// Lowercased extension, if any
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Whether the server will accept this file type
    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_PHOTO_EXTENSIONS.contains(&ext.as_str()))
    }
}

/// Body of the live-support form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportRequest {
    pub name: String,
    pub email: String,
    pub query: String,
}

impl SupportRequest {
    /// All three fields are required by the server
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty() && !self.query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_guessed_from_name() {
        let upload = PhotoUpload::new("me.PNG", vec![1, 2, 3]);
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.extension().as_deref(), Some("png"));
        assert!(upload.has_allowed_extension());
    }

    #[test]
    fn test_disallowed_extension() {
        let upload = PhotoUpload::new("notes.txt", Vec::new());
        assert!(!upload.has_allowed_extension());
        assert!(!PhotoUpload::new("noext", Vec::new()).has_allowed_extension());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("avatar.jpg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let upload = PhotoUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "avatar.jpg");
        assert_eq!(upload.content_type, "image/jpeg");
        assert_eq!(upload.bytes, b"jpegdata");
    }

    #[test]
    fn test_support_request_complete() {
        let mut req = SupportRequest {
            name: "Asha".into(),
            email: "asha@example.com".into(),
            query: "Hostel fee".into(),
        };
        assert!(req.is_complete());
        req.query = "   ".into();
        assert!(!req.is_complete());
    }
}
