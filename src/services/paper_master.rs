use crate::{
    client::{endpoints, ApiClient},
    commands::{Command, DeleteRecordCommand, SavePaperMasterCommand},
    errors::ConsoleError,
    models::{PaperMaster, PaperSearch, RecordId},
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Paper specifications (`/paper-master`).
#[derive(Clone)]
pub struct PaperMasterService {
    client: Arc<ApiClient>,
}

impl PaperMasterService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PaperMaster>, ConsoleError> {
        self.client.get(endpoints::PAPER_MASTER).await
    }

    /// Backend search; unset filters are left out of the query string.
    #[instrument(skip(self))]
    pub async fn search(&self, search: &PaperSearch) -> Result<Vec<PaperMaster>, ConsoleError> {
        let papers: Vec<PaperMaster> = self
            .client
            .get_with_query(endpoints::PAPER_MASTER_SEARCH, search)
            .await?;
        debug!(count = papers.len(), "paper search returned");
        Ok(papers)
    }

    pub async fn save(
        &self,
        command: SavePaperMasterCommand,
    ) -> Result<Option<PaperMaster>, ConsoleError> {
        command.execute(self.client.clone()).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), ConsoleError> {
        DeleteRecordCommand::new(endpoints::PAPER_MASTER, id)
            .execute(self.client.clone())
            .await?;
        Ok(())
    }
}
