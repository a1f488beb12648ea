use crate::{
    client::{endpoints, ApiClient},
    errors::ConsoleError,
    models::MasterDataOptions,
};
use std::sync::Arc;
use tracing::instrument;

/// Dropdown sources for the purchase form.
#[derive(Clone)]
pub struct MasterDataService {
    client: Arc<ApiClient>,
}

impl MasterDataService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Fetches paper names, mill names and shades concurrently.
    #[instrument(skip(self))]
    pub async fn options(&self) -> Result<MasterDataOptions, ConsoleError> {
        let (paper_names, mill_names, shades) = tokio::try_join!(
            self.client.get::<Vec<String>>(endpoints::MASTER_PAPER_NAMES),
            self.client.get::<Vec<String>>(endpoints::MASTER_MILL_NAMES),
            self.client.get::<Vec<String>>(endpoints::MASTER_SHADES),
        )?;
        Ok(MasterDataOptions {
            paper_names,
            mill_names,
            shades,
        })
    }
}
