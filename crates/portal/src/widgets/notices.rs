//! Home-page notice board with a "show more" button

/// Notices split into the initially visible ones and the rest
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: Vec<String>,
    initially_visible: usize,
    expanded: bool,
}

impl NoticeBoard {
    pub fn new(notices: Vec<String>, initially_visible: usize) -> Self {
        Self {
            notices,
            initially_visible,
            expanded: false,
        }
    }

    pub fn visible(&self) -> &[String] {
        if self.expanded {
            &self.notices
        } else {
            &self.notices[..self.initially_visible.min(self.notices.len())]
        }
    }

    /// The button only shows while something is still hidden
    pub fn show_more_visible(&self) -> bool {
        !self.expanded && self.notices.len() > self.initially_visible
    }

    pub fn show_more(&mut self) {
        self.expanded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_more_reveals_everything() {
        let notices: Vec<String> = (1..=5).map(|i| format!("Notice {}", i)).collect();
        let mut board = NoticeBoard::new(notices, 3);
        assert_eq!(board.visible().len(), 3);
        assert!(board.show_more_visible());

        board.show_more();
        assert_eq!(board.visible().len(), 5);
        assert!(!board.show_more_visible());
    }

    #[test]
    fn test_few_notices_no_button() {
        let board = NoticeBoard::new(vec!["Exams".into()], 3);
        assert_eq!(board.visible().len(), 1);
        assert!(!board.show_more_visible());
    }
}
