//! Profile photo upload

use anyhow::Result;
use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use crate::api::PortalApi;
use crate::error::{RequestError, RequestResult};
use crate::models::PhotoUpload;
use crate::ui::{Notification, PageSurface};

const DIMMED: f32 = 0.5;
const OPAQUE: f32 = 1.0;

/// The profile photo and its hidden file input
pub struct PhotoUploader {
    api: Arc<dyn PortalApi>,
    surface: Arc<dyn PageSurface>,
    src: String,
    opacity: f32,
}

impl PhotoUploader {
    pub fn new(api: Arc<dyn PortalApi>, surface: Arc<dyn PageSurface>, src: impl Into<String>) -> Self {
        Self {
            api,
            surface,
            src: src.into(),
            opacity: OPAQUE,
        }
    }

    /// Current image source
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Upload a file from disk
    pub fn select_path(&mut self, path: &Path) -> Result<bool> {
        let upload = PhotoUpload::from_path(path)?;
        Ok(self.select_file(&upload))
    }

    /// A file was chosen: dim the photo, upload, then apply the outcome
    pub fn select_file(&mut self, upload: &PhotoUpload) -> bool {
        self.begin_upload();
        let result = self.api.upload_profile_photo(upload);
        self.finish_upload(result)
    }

    /// Show the loading state
    pub fn begin_upload(&mut self) {
        self.opacity = DIMMED;
    }

    /// Restore the photo and swap in the new source on success
    pub fn finish_upload(&mut self, result: RequestResult<String>) -> bool {
        self.opacity = OPAQUE;
        match result {
            Ok(url) => {
                info!("Profile photo updated: {}", url);
                self.src = url;
                true
            }
            Err(e) => {
                error!("Profile photo upload failed: {}", e);
                self.surface.notify(Notification::danger(failure_message(&e)));
                false
            }
        }
    }
}

fn failure_message(err: &RequestError) -> String {
    match err {
        RequestError::Application(message) => {
            let reason = if message.is_empty() { "Unknown error" } else { message.as_str() };
            format!("Failed to update profile photo: {}", reason)
        }
        _ => "An error occurred while updating the profile photo.".to_string(),
    }
}
