//! Top navigation bar

/// Scroll offset (px) past which the navbar turns solid
pub const SCROLL_THRESHOLD: f64 = 50.0;

/// Navbar appearance driven by page scroll
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Navbar {
    scrolled: bool,
}

impl Navbar {
    /// Re-evaluate on every scroll event
    pub fn on_scroll(&mut self, offset: f64) {
        self.scrolled = offset > SCROLL_THRESHOLD;
    }

    /// Whether the `scrolled` class is applied
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Navigation links with at most one highlighted
#[derive(Debug, Clone, Default)]
pub struct NavLinks {
    links: Vec<NavLink>,
}

impl NavLinks {
    /// Build the links and highlight the one pointing at `current_path`
    pub fn new<'a>(links: impl IntoIterator<Item = (&'a str, &'a str)>, current_path: &str) -> Self {
        let links = links
            .into_iter()
            .map(|(href, label)| NavLink {
                href: href.to_string(),
                label: label.to_string(),
                active: href == current_path,
            })
            .collect();
        Self { links }
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }

    /// Clicking a link makes it the only active one
    pub fn click(&mut self, href: &str) {
        for link in &mut self.links {
            link.active = link.href == href;
        }
    }
}
