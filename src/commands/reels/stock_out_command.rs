use crate::{
    client::{endpoints, ApiClient},
    commands::Command,
    errors::ConsoleError,
    models::{reel::validate_out_quantity, StockOutRequest},
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Issues part of a reel to production (`POST /reels/stock-out`).
#[derive(Debug, Clone, PartialEq)]
pub struct StockOutCommand {
    pub reel_number: String,
    pub quantity_used: Decimal,
    /// Quantity on the reel when the operator picked it.
    pub available: Decimal,
}

#[async_trait]
impl Command for StockOutCommand {
    type Result = ();

    #[instrument(skip(self, client), fields(reel = %self.reel_number, quantity = %self.quantity_used))]
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError> {
        validate_out_quantity(self.quantity_used, self.available)?;

        let request = StockOutRequest {
            reel_number: self.reel_number.clone(),
            quantity_used: self.quantity_used,
        };
        let _: serde_json::Value = client
            .post(endpoints::REELS_STOCK_OUT, &request)
            .await
            .map_err(|e| {
                error!(error = %e, "stock-out rejected");
                e
            })?;

        info!("reel issued");
        Ok(())
    }
}
