use crate::{
    commands::SaveMasterCommand,
    errors::{ConsoleError, FieldErrors},
    models::{NamedMaster, RecordId},
};
use std::marker::PhantomData;

/// Single-field form shared by the mill and shade screens.
#[derive(Debug, Clone)]
pub struct NameForm<M: NamedMaster> {
    editing: Option<RecordId>,
    name: String,
    next_id: Option<RecordId>,
    errors: FieldErrors,
    _kind: PhantomData<M>,
}

impl<M: NamedMaster> Default for NameForm<M> {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            next_id: None,
            errors: FieldErrors::new(),
            _kind: PhantomData,
        }
    }
}

impl<M: NamedMaster> NameForm<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Identifier shown next to the form: the record's own id while editing,
    /// otherwise the suggested next id.
    pub fn display_id(&self) -> Option<RecordId> {
        self.editing.or(self.next_id)
    }

    pub fn set_next_id(&mut self, hint: RecordId) {
        self.next_id = Some(hint);
    }

    /// Typing clears a previously reported error for the field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if !self.name.trim().is_empty() {
            self.errors.remove("name");
        }
    }

    /// Loads `record` for editing.
    pub fn edit(&mut self, record: &M) {
        self.editing = Some(record.id());
        self.name = record.name().to_string();
        self.errors.clear();
    }

    /// Leaves edit mode and empties the form.
    pub fn reset(&mut self) {
        self.editing = None;
        self.name.clear();
        self.errors.clear();
    }

    /// Validates the input; on failure the error is kept on the form as well.
    pub fn to_command(&mut self) -> Result<SaveMasterCommand<M>, ConsoleError> {
        let command = match self.editing {
            Some(id) => SaveMasterCommand::update(id, self.name.trim()),
            None => SaveMasterCommand::create(self.name.trim()),
        };
        if let Err(err) = command.validate() {
            if let Some(fields) = err.field_errors() {
                self.errors = fields.clone();
            }
            return Err(err);
        }
        self.errors.clear();
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mill;

    #[test]
    fn blank_name_blocks_save_until_corrected() {
        let mut form = NameForm::<Mill>::new();
        assert!(form.to_command().is_err());
        assert_eq!(form.errors().get("name"), Some("Mill Name is required"));

        form.set_name("Mill B");
        assert!(form.errors().is_empty());
        let command = form.to_command().unwrap();
        assert_eq!(command.id, None);
        assert_eq!(command.name, "Mill B");
    }

    #[test]
    fn editing_targets_the_record_id() {
        let mut form = NameForm::<Mill>::new();
        form.set_next_id(9);
        assert_eq!(form.display_id(), Some(9));

        form.edit(&Mill::new(3, "Mill C".into()));
        assert_eq!(form.display_id(), Some(3));
        let command = form.to_command().unwrap();
        assert_eq!(command.id, Some(3));

        form.reset();
        assert!(!form.is_editing());
        assert_eq!(form.name(), "");
    }
}
