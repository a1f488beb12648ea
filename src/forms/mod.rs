//! Form state: raw field input, inline errors and derived values.
//!
//! Forms never talk to the backend. They turn operator input into a
//! validated command, which the owning screen then executes.

pub mod name_form;
pub mod paper_form;
pub mod purchase_form;
pub mod stock_out_form;

pub use name_form::NameForm;
pub use paper_form::PaperForm;
pub use purchase_form::{PurchaseForm, SaveMode};
pub use stock_out_form::StockOutForm;

use rust_decimal::Decimal;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Parses an optional numeric field.
///
/// Blank input is `Ok(None)`; anything that is not a number inside `range`
/// yields `message`.
pub(crate) fn parse_in_range(
    raw: &str,
    range: &RangeInclusive<u32>,
    message: &str,
) -> Result<Option<u32>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<u32>() {
        Ok(value) if range.contains(&value) => Ok(Some(value)),
        _ => Err(message.to_string()),
    }
}

/// Blank or unparsable decimal input is `None`.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw).ok()
}
