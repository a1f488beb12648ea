use crate::{
    client::ApiClient,
    commands::Command,
    errors::{ConsoleError, FieldErrors},
    models::{NamedMaster, RecordId},
};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Creates (`POST /{collection}`) or renames (`PUT /{collection}/{id}`) a
/// mill or shade.
#[derive(Debug, Clone)]
pub struct SaveMasterCommand<M: NamedMaster> {
    /// Set when editing an existing record.
    pub id: Option<RecordId>,
    pub name: String,
    _kind: PhantomData<M>,
}

impl<M: NamedMaster> SaveMasterCommand<M> {
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            _kind: PhantomData,
        }
    }

    pub fn update(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            _kind: PhantomData,
        }
    }

    /// Single rule: the trimmed name must not be empty.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", format!("{} Name is required", M::LABEL));
        }
        errors.into_result()
    }
}

#[async_trait]
impl<M: NamedMaster> Command for SaveMasterCommand<M> {
    /// The saved record, or `None` when a create answered with an empty body.
    type Result = Option<M>;

    #[instrument(skip(self, client), fields(kind = M::LABEL, id = ?self.id))]
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError> {
        self.validate()?;
        let name = self.name.trim().to_string();

        let saved = match self.id {
            Some(id) => {
                let body = M::new(id, name.clone());
                let path = format!("{}/{}", M::COLLECTION, id);
                let saved: Option<M> = client.put(&path, &body).await.map_err(|e| {
                    error!(error = %e, "update failed");
                    e
                })?;
                Some(saved.unwrap_or(body))
            }
            None => client
                .post(M::COLLECTION, &M::create_payload(&name))
                .await
                .map_err(|e| {
                    error!(error = %e, "create failed");
                    e
                })?,
        };

        info!(name = %name, "{} saved", M::LABEL);
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mill, Shade};
    use assert_matches::assert_matches;

    #[test]
    fn blank_names_are_rejected_with_a_labelled_message() {
        let err = SaveMasterCommand::<Mill>::create("   ").validate().unwrap_err();
        assert_matches!(&err, ConsoleError::Validation(fields) => {
            assert_eq!(fields.get("name"), Some("Mill Name is required"));
        });

        let err = SaveMasterCommand::<Shade>::update(2, "").validate().unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|f| f.get("name")),
            Some("Shade Name is required")
        );
    }

    #[test]
    fn padded_names_are_accepted() {
        assert!(SaveMasterCommand::<Mill>::create("  Mill A ").validate().is_ok());
    }
}
