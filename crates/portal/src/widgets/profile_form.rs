//! Profile page form with edit/cancel

use std::collections::HashMap;

/// An input or select on the profile form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    pub disabled: bool,
    pub readonly: bool,
}

impl FormField {
    /// A disabled, editable field (the form's resting state)
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            disabled: true,
            readonly: false,
        }
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

/// The profile form and its edit mode
///
/// Entering edit mode snapshots and enables every disabled, non-readonly
/// field. Cancelling restores the snapshot and disables them again.
/// Readonly fields are never touched.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    fields: Vec<FormField>,
    editing: bool,
    snapshot: HashMap<String, String>,
}

impl ProfileForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            editing: false,
            snapshot: HashMap::new(),
        }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether the save/cancel actions are shown
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Type into an enabled field; ignored for disabled or readonly ones
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self
            .fields
            .iter_mut()
            .find(|f| f.name == name && !f.disabled && !f.readonly)
        {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn toggle_edit(&mut self) {
        if self.editing {
            for field in &mut self.fields {
                if let Some(original) = self.snapshot.get(&field.name) {
                    field.value = original.clone();
                    field.disabled = true;
                }
            }
            self.snapshot.clear();
            self.editing = false;
        } else {
            for field in &mut self.fields {
                if field.readonly || !field.disabled {
                    continue;
                }
                self.snapshot.insert(field.name.clone(), field.value.clone());
                field.disabled = false;
            }
            self.editing = true;
        }
    }
}
