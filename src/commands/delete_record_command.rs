use crate::{
    client::ApiClient,
    commands::Command,
    errors::ConsoleError,
    models::RecordId,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Removes one record from a collection (`DELETE /{collection}/{id}`).
///
/// Confirmation is the caller's job; by the time this runs the operator has
/// already agreed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecordCommand {
    pub collection: &'static str,
    pub id: RecordId,
}

impl DeleteRecordCommand {
    pub fn new(collection: &'static str, id: RecordId) -> Self {
        Self { collection, id }
    }
}

#[async_trait]
impl Command for DeleteRecordCommand {
    type Result = RecordId;

    #[instrument(skip(self, client), fields(collection = self.collection, id = self.id))]
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError> {
        let path = format!("{}/{}", self.collection, self.id);
        client.delete(&path).await.map_err(|e| {
            error!(error = %e, "delete failed");
            e
        })?;
        info!("record deleted");
        Ok(self.id)
    }
}
