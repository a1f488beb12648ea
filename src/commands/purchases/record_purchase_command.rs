use crate::{
    client::{endpoints, ApiClient},
    commands::Command,
    errors::{ConsoleError, FieldErrors},
    models::{purchase::compute_price, MasterDataOptions, PurchaseDraft, PurchaseRecord},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

const PRICE_MESSAGE: &str = "Price is too large";

/// Records a reel purchase (`POST /paper-purchases`).
///
/// The price is recomputed from quantity and rate before sending, so a stale
/// value on the draft never reaches the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPurchaseCommand {
    pub draft: PurchaseDraft,
    /// Loaded dropdown options; selections must be among them when present.
    pub options: MasterDataOptions,
}

impl RecordPurchaseCommand {
    pub fn new(draft: PurchaseDraft, options: MasterDataOptions) -> Self {
        Self { draft, options }
    }

    pub fn check(&self) -> Result<(), ConsoleError> {
        self.draft.validate()?;

        let mut errors = FieldErrors::new();
        if compute_price(self.draft.quantity, self.draft.rate_per_kg).is_none() {
            errors.insert("ratePerKg", PRICE_MESSAGE);
        }
        if self.options.is_loaded() {
            let options = &self.options;
            if !MasterDataOptions::allows(&options.paper_names, &self.draft.paper_name) {
                errors.insert("paperName", "Select a paper name from the list");
            }
            if !MasterDataOptions::allows(&options.mill_names, &self.draft.mill_name) {
                errors.insert("millName", "Select a mill from the list");
            }
            if !MasterDataOptions::allows(&options.shades, &self.draft.shade) {
                errors.insert("shade", "Select a shade from the list");
            }
        }
        errors.into_result()
    }
}

#[async_trait]
impl Command for RecordPurchaseCommand {
    type Result = PurchaseRecord;

    #[instrument(skip(self, client), fields(reel_number = %self.draft.reel_number))]
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError> {
        self.check()?;

        let mut draft = self.draft.clone();
        draft.price = compute_price(draft.quantity, draft.rate_per_kg).ok_or_else(|| {
            ConsoleError::Validation(FieldErrors::single("ratePerKg", PRICE_MESSAGE))
        })?;

        let saved: Option<PurchaseRecord> = client
            .post(endpoints::PAPER_PURCHASES, &draft)
            .await
            .map_err(|e| {
                error!(error = %e, "purchase could not be recorded");
                e
            })?;

        info!(price = %draft.price, "purchase recorded");
        Ok(saved.unwrap_or_else(|| draft.into_record(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn command(paper: &str) -> RecordPurchaseCommand {
        RecordPurchaseCommand::new(
            PurchaseDraft {
                date: NaiveDate::from_ymd_opt(2024, 11, 17).unwrap(),
                reel_number: "A-1".into(),
                paper_name: paper.into(),
                quantity: dec!(100),
                mill_name: "Mill A".into(),
                shade: "White".into(),
                rate_per_kg: dec!(45.5),
                price: dec!(0),
                remark: None,
            },
            MasterDataOptions {
                paper_names: vec!["30/120/16".into()],
                mill_names: vec!["Mill A".into()],
                shades: vec![],
            },
        )
    }

    #[test]
    fn selections_must_come_from_loaded_options() {
        assert!(command("30/120/16").check().is_ok());
        let err = command("99/99/99").check().unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|f| f.get("paperName")),
            Some("Select a paper name from the list")
        );
    }

    #[test]
    fn free_text_is_accepted_before_options_load() {
        let mut command = command("99/99/99");
        command.options = MasterDataOptions::default();
        command.draft.mill_name = "Mill X".into();
        assert!(command.check().is_ok());
    }

    #[test]
    fn rate_too_large_to_price_is_refused() {
        let mut command = command("30/120/16");
        command.draft.rate_per_kg = Decimal::MAX;
        let err = command.check().unwrap_err();
        assert_eq!(err.field_errors().and_then(|f| f.get("ratePerKg")), Some(PRICE_MESSAGE));
    }
}
