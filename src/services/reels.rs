use crate::{
    client::{endpoints, ApiClient},
    commands::{Command, StockOutCommand},
    errors::ConsoleError,
    models::{IssueHistoryEntry, Reel},
};
use std::sync::Arc;
use tracing::instrument;

/// Active reels and their issue history (`/reels`).
#[derive(Clone)]
pub struct ReelService {
    client: Arc<ApiClient>,
}

impl ReelService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Reel>, ConsoleError> {
        self.client.get(endpoints::REELS).await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Reel>, ConsoleError> {
        self.client
            .get_with_query(endpoints::REELS_SEARCH, &[("query", query.trim())])
            .await
    }

    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<IssueHistoryEntry>, ConsoleError> {
        self.client.get(endpoints::REELS_HISTORY).await
    }

    pub async fn stock_out(&self, command: StockOutCommand) -> Result<(), ConsoleError> {
        command.execute(self.client.clone()).await
    }
}
