use crate::{
    client::ApiClient,
    commands::{Command, DeleteRecordCommand, SaveMasterCommand},
    errors::ConsoleError,
    models::{next_id_hint, record_id_from_value, NamedMaster, RecordId},
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{instrument, warn};

/// CRUD for single-name reference records (mills, shades).
#[derive(Debug)]
pub struct NamedMasterService<M: NamedMaster> {
    client: Arc<ApiClient>,
    _kind: PhantomData<M>,
}

impl<M: NamedMaster> Clone for NamedMasterService<M> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

impl<M: NamedMaster> NamedMasterService<M> {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    #[instrument(skip(self), fields(kind = M::LABEL))]
    pub async fn list(&self) -> Result<Vec<M>, ConsoleError> {
        self.client.get(M::COLLECTION).await
    }

    /// Suggested identifier for the next record; display only.
    ///
    /// Uses the backend's `next-id` route where one exists and otherwise (or
    /// when that call fails) one past the largest identifier in `known`.
    #[instrument(skip(self, known), fields(kind = M::LABEL))]
    pub async fn next_id(&self, known: &[M]) -> RecordId {
        let local = next_id_hint(known, M::id);
        if !M::HAS_NEXT_ID {
            return local;
        }
        let path = format!("{}/next-id", M::COLLECTION);
        match self.client.get::<serde_json::Value>(&path).await {
            Ok(value) => record_id_from_value(&value)
                .or_else(|| value.get("nextId").and_then(record_id_from_value))
                .unwrap_or(local),
            Err(e) => {
                warn!(error = %e, "next id unavailable, using local hint");
                local
            }
        }
    }

    pub async fn save(&self, command: SaveMasterCommand<M>) -> Result<Option<M>, ConsoleError> {
        command.execute(self.client.clone()).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ConsoleError> {
        DeleteRecordCommand::new(M::COLLECTION, id)
            .execute(self.client.clone())
            .await?;
        Ok(())
    }
}

/// Records whose name contains `query`, ignoring case. An empty query keeps everything.
pub fn filter_by_name<M: NamedMaster>(records: &[M], query: &str) -> Vec<M> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| query.is_empty() || r.name().to_lowercase().contains(&query))
        .cloned()
        .collect()
}
