use crate::errors::{ConsoleError, FieldErrors};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A physical paper reel currently in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    pub reel_number: String,
    pub paper_name: String,
    pub quantity: Decimal,
    pub mill_name: String,
    pub shade: String,
    #[serde(alias = "rate")]
    pub rate_per_kg: Decimal,
    /// Days since the reel was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(default, rename = "isPartiallyUsed", alias = "partiallyUsed")]
    pub partially_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl Reel {
    /// Case-insensitive substring match over every displayed column.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let days = self.days.map(|d| d.to_string()).unwrap_or_default();
        let quantity = self.quantity.to_string();
        let rate = self.rate_per_kg.to_string();
        [
            self.reel_number.as_str(),
            self.paper_name.as_str(),
            quantity.as_str(),
            self.mill_name.as_str(),
            self.shade.as_str(),
            rate.as_str(),
            days.as_str(),
            self.remark.as_deref().unwrap_or_default(),
        ]
        .iter()
        .any(|value| value.to_lowercase().contains(&query))
    }
}

/// One stock-out event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueHistoryEntry {
    pub date: NaiveDate,
    pub reel_number: String,
    pub paper_name: String,
    pub quantity_used: Decimal,
    pub quantity_left: Decimal,
    pub mill_name: String,
    pub shade: String,
    pub rate_per_kg: Decimal,
}

/// Body of `POST /reels/stock-out`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockOutRequest {
    pub reel_number: String,
    pub quantity_used: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockOutResult {
    /// Active reels after the issue; a reel reaching zero is gone.
    pub reels: Vec<Reel>,
    pub entry: IssueHistoryEntry,
}

/// Issues `quantity` from `reel_number` and returns the new active list
/// together with the history entry describing the change.
///
/// `quantity` must lie in `[0, reel.quantity]`. The touched reel is flagged
/// as partially used.
pub fn apply_stock_out(
    reels: &[Reel],
    reel_number: &str,
    quantity: Decimal,
    date: NaiveDate,
) -> Result<StockOutResult, ConsoleError> {
    let reel = reels
        .iter()
        .find(|r| r.reel_number == reel_number)
        .ok_or_else(|| ConsoleError::NotFound(Some(format!("Reel {} not found", reel_number))))?;

    validate_out_quantity(quantity, reel.quantity)?;

    let left = reel.quantity - quantity;
    let entry = IssueHistoryEntry {
        date,
        reel_number: reel.reel_number.clone(),
        paper_name: reel.paper_name.clone(),
        quantity_used: quantity,
        quantity_left: left,
        mill_name: reel.mill_name.clone(),
        shade: reel.shade.clone(),
        rate_per_kg: reel.rate_per_kg,
    };

    let reels = reels
        .iter()
        .filter_map(|r| {
            if r.reel_number != reel_number {
                return Some(r.clone());
            }
            if left.is_zero() {
                return None;
            }
            Some(Reel {
                quantity: left,
                partially_used: true,
                ..r.clone()
            })
        })
        .collect();

    Ok(StockOutResult { reels, entry })
}

pub fn validate_out_quantity(quantity: Decimal, available: Decimal) -> Result<(), ConsoleError> {
    if quantity < Decimal::ZERO {
        return Err(ConsoleError::Validation(FieldErrors::single(
            "outQuantity",
            "Out quantity cannot be negative",
        )));
    }
    if quantity > available {
        return Err(ConsoleError::Validation(FieldErrors::single(
            "outQuantity",
            format!("Out quantity cannot exceed {}", available),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn reel(number: &str, quantity: Decimal) -> Reel {
        Reel {
            reel_number: number.into(),
            paper_name: "30/120/16".into(),
            quantity,
            mill_name: "Mill A".into(),
            shade: "White".into(),
            rate_per_kg: dec!(45.50),
            days: Some(5),
            partially_used: false,
            remark: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 17).unwrap()
    }

    #[test]
    fn issuing_part_of_a_reel_leaves_the_balance() {
        let reels = vec![reel("A-001", dec!(1000))];
        let result = apply_stock_out(&reels, "A-001", dec!(200), today()).unwrap();
        assert_eq!(result.reels.len(), 1);
        assert_eq!(result.reels[0].quantity, dec!(800));
        assert!(result.reels[0].partially_used);
        assert_eq!(result.entry.quantity_used, dec!(200));
        assert_eq!(result.entry.quantity_left, dec!(800));
        assert_eq!(result.entry.rate_per_kg, dec!(45.50));
    }

    #[test]
    fn emptied_reel_leaves_the_active_list() {
        let reels = vec![reel("A-001", dec!(1000)), reel("A-002", dec!(50))];
        let result = apply_stock_out(&reels, "A-002", dec!(50), today()).unwrap();
        assert_eq!(result.reels.len(), 1);
        assert_eq!(result.reels[0].reel_number, "A-001");
        assert_eq!(result.entry.quantity_left, Decimal::ZERO);
    }

    #[test]
    fn rejects_overdraw_and_unknown_reels() {
        let reels = vec![reel("A-001", dec!(10))];
        assert_matches!(
            apply_stock_out(&reels, "A-001", dec!(11), today()),
            Err(ConsoleError::Validation(_))
        );
        assert_matches!(
            apply_stock_out(&reels, "A-001", dec!(-1), today()),
            Err(ConsoleError::Validation(_))
        );
        assert_matches!(
            apply_stock_out(&reels, "Z-9", dec!(1), today()),
            Err(ConsoleError::NotFound(_))
        );
    }

    #[test]
    fn accepts_legacy_field_names() {
        let reel: Reel = serde_json::from_str(
            r#"{"reelNumber":"A-001","paperName":"30/120/16","quantity":1000,"millName":"Mill A",
                "shade":"White","rate":45.5,"days":5,"isPartiallyUsed":false}"#,
        )
        .unwrap();
        assert_eq!(reel.rate_per_kg, dec!(45.5));
        assert!(reel.matches_query("mill a"));
        assert!(reel.matches_query("A-00"));
        assert!(!reel.matches_query("brown"));
    }

    proptest! {
        #[test]
        fn balance_is_quantity_minus_issue(total in 1u32..5000, pick in 0u32..5000) {
            let total = Decimal::from(total);
            let out = Decimal::from(pick).min(total);
            let reels = vec![reel("A-001", total)];
            let result = apply_stock_out(&reels, "A-001", out, today()).unwrap();
            prop_assert_eq!(result.entry.quantity_left, total - out);
            let remaining = result.reels.iter().find(|r| r.reel_number == "A-001");
            if out == total {
                prop_assert!(remaining.is_none());
            } else {
                prop_assert_eq!(remaining.map(|r| r.quantity), Some(total - out));
            }
        }
    }
}
