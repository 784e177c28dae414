//! Smaller page widgets shared by the home and profile pages

mod carousel;
mod navbar;
mod notices;
mod password;
mod photo;
mod profile_form;
mod stats;

pub use carousel::{CAROUSEL_INTERVAL, Carousel};
pub use navbar::{NavLink, NavLinks, Navbar, SCROLL_THRESHOLD};
pub use notices::NoticeBoard;
pub use password::PasswordToggle;
pub use photo::PhotoUploader;
pub use profile_form::{FormField, ProfileForm};
pub use stats::{COUNT_DURATION, StatCounter, VISIBILITY_THRESHOLD, counter_value, format_thousands};
