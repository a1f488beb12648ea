use super::parse_decimal;
use crate::{
    commands::RecordPurchaseCommand,
    errors::{ConsoleError, FieldErrors},
    models::{purchase::compute_price, MasterDataOptions, PurchaseDraft},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

const REQUIRED_MESSAGE: &str = "Please fill all required fields";
const QUANTITY_MESSAGE: &str = "Quantity must be between 1 and 2000";
const RATE_MESSAGE: &str = "Rate must be at least 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveMode {
    /// Reset the whole form.
    Save,
    /// Keep date, paper, mill, shade and rate for the next reel of the batch.
    SaveAndNext,
}

/// New-purchase form.
///
/// Price is derived: it is recomputed whenever quantity or rate change and
/// is empty unless both parse as numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseForm {
    pub date: NaiveDate,
    pub reel_number: String,
    pub paper_name: String,
    pub mill_name: String,
    pub shade: String,
    pub remark: String,
    quantity: String,
    rate_per_kg: String,
    price: Option<Decimal>,
}

impl PurchaseForm {
    pub fn new(date: NaiveDate, reel_number: impl Into<String>) -> Self {
        Self {
            date,
            reel_number: reel_number.into(),
            paper_name: String::new(),
            mill_name: String::new(),
            shade: String::new(),
            remark: String::new(),
            quantity: String::new(),
            rate_per_kg: String::new(),
            price: None,
        }
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn rate_per_kg(&self) -> &str {
        &self.rate_per_kg
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn set_quantity(&mut self, raw: impl Into<String>) {
        self.quantity = raw.into();
        self.recompute_price();
    }

    pub fn set_rate_per_kg(&mut self, raw: impl Into<String>) {
        self.rate_per_kg = raw.into();
        self.recompute_price();
    }

    fn recompute_price(&mut self) {
        self.price = match (parse_decimal(&self.quantity), parse_decimal(&self.rate_per_kg)) {
            (Some(q), Some(r)) => compute_price(q, r),
            _ => None,
        };
    }

    /// Builds the purchase command, checking required fields and bounds first.
    pub fn to_command(&self, options: &MasterDataOptions) -> Result<RecordPurchaseCommand, ConsoleError> {
        let required = [
            &self.paper_name,
            &self.quantity,
            &self.mill_name,
            &self.shade,
            &self.rate_per_kg,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(ConsoleError::Validation(FieldErrors::single("form", REQUIRED_MESSAGE)));
        }

        let quantity = parse_decimal(&self.quantity).ok_or_else(|| {
            ConsoleError::Validation(FieldErrors::single("quantity", QUANTITY_MESSAGE))
        })?;
        let rate_per_kg = parse_decimal(&self.rate_per_kg).ok_or_else(|| {
            ConsoleError::Validation(FieldErrors::single("ratePerKg", RATE_MESSAGE))
        })?;

        let remark = self.remark.trim();
        let draft = PurchaseDraft {
            date: self.date,
            reel_number: self.reel_number.trim().to_string(),
            paper_name: self.paper_name.trim().to_string(),
            quantity,
            mill_name: self.mill_name.trim().to_string(),
            shade: self.shade.trim().to_string(),
            rate_per_kg,
            // An unpriceable draft is refused by `check` below.
            price: compute_price(quantity, rate_per_kg).unwrap_or_default(),
            remark: (!remark.is_empty()).then(|| remark.to_string()),
        };
        let command = RecordPurchaseCommand::new(draft, options.clone());
        command.check()?;
        Ok(command)
    }

    /// Prepares the form for the next entry after a successful save.
    pub fn after_save(&mut self, mode: SaveMode, today: NaiveDate, reel_number: impl Into<String>) {
        match mode {
            SaveMode::Save => *self = Self::new(today, reel_number),
            SaveMode::SaveAndNext => {
                self.reel_number = reel_number.into();
                self.quantity.clear();
                self.price = None;
                self.remark.clear();
            }
        }
    }
}
