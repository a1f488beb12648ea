use crate::{
    client::{endpoints, ApiClient},
    errors::ConsoleError,
    models::Reel,
};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Read-only view of reels in stock (`/inventory/search`).
#[derive(Clone)]
pub struct InventoryService {
    client: Arc<ApiClient>,
}

impl InventoryService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Reel>, ConsoleError> {
        let items: Vec<Reel> = self
            .client
            .get_with_query(endpoints::INVENTORY_SEARCH, &[("query", query.trim())])
            .await?;
        debug!(count = items.len(), "inventory search returned");
        Ok(items)
    }
}
