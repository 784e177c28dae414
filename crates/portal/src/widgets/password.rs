//! Show/hide toggle for password inputs

/// Masking state of one password input and its eye icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordToggle {
    masked: bool,
}

impl Default for PasswordToggle {
    fn default() -> Self {
        Self { masked: true }
    }
}

impl PasswordToggle {
    pub fn toggle(&mut self) {
        self.masked = !self.masked;
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// `type` attribute of the input
    pub fn input_type(&self) -> &'static str {
        if self.masked { "password" } else { "text" }
    }

    pub fn icon(&self) -> &'static str {
        if self.masked { "bi-eye" } else { "bi-eye-slash" }
    }
}
