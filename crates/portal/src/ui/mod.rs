//! Page-level collaborators: notifications and the page surface

mod notify;
mod surface;

pub use notify::{DISMISS_AFTER, Notification, NotificationCenter, NotificationKind};
pub use surface::{PageSurface, RecordingSurface, SurfaceEvent};
