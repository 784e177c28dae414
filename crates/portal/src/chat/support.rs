//! Live-support modal and its contact form

use log::{error, info};
use std::sync::Arc;

use crate::api::PortalApi;
use crate::models::SupportRequest;
use crate::ui::{Notification, PageSurface};

pub const SUPPORT_SENT: &str =
    "Your message has been sent successfully! We will contact you soon.";
const SUPPORT_FAILED: &str = "Failed to send message. Please try again.";

/// The "live support" modal
pub struct SupportForm {
    api: Arc<dyn PortalApi>,
    surface: Arc<dyn PageSurface>,
    open: bool,
    pub fields: SupportRequest,
}

impl SupportForm {
    pub fn new(api: Arc<dyn PortalApi>, surface: Arc<dyn PageSurface>) -> Self {
        Self {
            api,
            surface,
            open: false,
            fields: SupportRequest::default(),
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Submit the form; on success the modal closes and the fields reset.
    /// On failure the fields are kept for another try.
    pub fn submit(&mut self) -> bool {
        match self.api.send_support_email(&self.fields) {
            Ok(_) => {
                info!("Support request sent for {}", self.fields.email);
                self.surface.notify(Notification::success(SUPPORT_SENT));
                self.open = false;
                self.fields = SupportRequest::default();
                true
            }
            Err(e) => {
                error!("Support request failed: {}", e);
                self.surface
                    .notify(Notification::danger(e.notice(SUPPORT_FAILED)));
                false
            }
        }
    }
}
