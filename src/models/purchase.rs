use super::{de_record_id, RecordId};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MIN_QUANTITY: Decimal = dec!(1);
pub const MAX_QUANTITY: Decimal = dec!(2000);
pub const MIN_RATE: Decimal = dec!(1);

/// A saved reel purchase; immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    #[serde(default, deserialize_with = "de_record_id")]
    pub id: RecordId,
    pub date: NaiveDate,
    pub reel_number: String,
    pub paper_name: String,
    pub quantity: Decimal,
    pub mill_name: String,
    pub shade: String,
    pub rate_per_kg: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Purchase entry as submitted to `POST /paper-purchases`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDraft {
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "Please fill all required fields"))]
    pub reel_number: String,
    #[validate(length(min = 1, message = "Please fill all required fields"))]
    pub paper_name: String,
    #[validate(custom = "validate_quantity")]
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "Please fill all required fields"))]
    pub mill_name: String,
    #[validate(length(min = 1, message = "Please fill all required fields"))]
    pub shade: String,
    #[validate(custom = "validate_rate")]
    pub rate_per_kg: Decimal,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl PurchaseDraft {
    /// The record the backend is expected to echo back, used when the
    /// response body is empty.
    pub fn into_record(self, id: RecordId) -> PurchaseRecord {
        PurchaseRecord {
            id,
            date: self.date,
            reel_number: self.reel_number,
            paper_name: self.paper_name,
            quantity: self.quantity,
            mill_name: self.mill_name,
            shade: self.shade,
            rate_per_kg: self.rate_per_kg,
            price: self.price,
            remark: self.remark,
        }
    }
}

/// quantity × rate, rounded half away from zero to two decimal places.
///
/// `None` when the product does not fit in a `Decimal`.
pub fn compute_price(quantity: Decimal, rate_per_kg: Decimal) -> Option<Decimal> {
    let mut price = quantity
        .checked_mul(rate_per_kg)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    Some(price)
}

fn validate_quantity(quantity: &Decimal) -> Result<(), ValidationError> {
    if *quantity < MIN_QUANTITY || *quantity > MAX_QUANTITY {
        let mut err = ValidationError::new("quantity");
        err.message = Some("Quantity must be between 1 and 2000".into());
        return Err(err);
    }
    Ok(())
}

fn validate_rate(rate: &Decimal) -> Result<(), ValidationError> {
    if *rate < MIN_RATE {
        let mut err = ValidationError::new("rate_per_kg");
        err.message = Some("Rate must be at least 1".into());
        return Err(err);
    }
    Ok(())
}
