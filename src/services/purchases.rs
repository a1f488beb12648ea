use crate::{
    client::{endpoints, ApiClient},
    commands::{Command, RecordPurchaseCommand},
    errors::ConsoleError,
    models::PurchaseRecord,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// The reel-number route answers either with a bare string or an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReelNumberResponse {
    Plain(String),
    Wrapped {
        #[serde(rename = "reelNumber")]
        reel_number: String,
    },
}

impl ReelNumberResponse {
    fn into_inner(self) -> String {
        match self {
            ReelNumberResponse::Plain(n) | ReelNumberResponse::Wrapped { reel_number: n } => n,
        }
    }
}

/// Reel purchases (`/paper-purchases`).
#[derive(Clone)]
pub struct PurchaseService {
    client: Arc<ApiClient>,
}

impl PurchaseService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Reel numbers are allocated by the backend.
    #[instrument(skip(self))]
    pub async fn generate_reel_number(&self) -> Result<String, ConsoleError> {
        let response: ReelNumberResponse = self.client.get(endpoints::GENERATE_REEL_NUMBER).await?;
        let number = response.into_inner().trim().to_string();
        if number.is_empty() {
            return Err(ConsoleError::Api {
                status: 200,
                message: Some("Backend returned an empty reel number".to_string()),
            });
        }
        Ok(number)
    }

    #[instrument(skip(self))]
    pub async fn history(&self) -> Result<Vec<PurchaseRecord>, ConsoleError> {
        self.client.get(endpoints::PAPER_PURCHASES).await
    }

    pub async fn record(&self, command: RecordPurchaseCommand) -> Result<PurchaseRecord, ConsoleError> {
        command.execute(self.client.clone()).await
    }
}
