use super::parse_decimal;
use crate::{
    commands::StockOutCommand,
    errors::{ConsoleError, FieldErrors},
    models::{reel::validate_out_quantity, Reel},
};
use rust_decimal::Decimal;

/// Out-quantity dialog for a selected reel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockOutForm {
    selected: Option<Reel>,
    out_quantity: String,
}

impl StockOutForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&Reel> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, reel: Reel) {
        self.selected = Some(reel);
        self.out_quantity.clear();
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.out_quantity.clear();
    }

    pub fn set_out_quantity(&mut self, raw: impl Into<String>) {
        self.out_quantity = raw.into();
    }

    pub fn out_quantity(&self) -> &str {
        &self.out_quantity
    }

    /// Quantity that would remain on the reel; the full quantity while the
    /// input is blank or not a number, `None` without a selection or when
    /// the difference overflows.
    pub fn balance(&self) -> Option<Decimal> {
        let reel = self.selected.as_ref()?;
        match parse_decimal(&self.out_quantity) {
            Some(out) => reel.quantity.checked_sub(out),
            None => Some(reel.quantity),
        }
    }

    /// Whether the "Out" action is enabled.
    pub fn can_submit(&self) -> bool {
        match (&self.selected, parse_decimal(&self.out_quantity)) {
            (Some(reel), Some(out)) => out >= Decimal::ZERO && out <= reel.quantity,
            _ => false,
        }
    }

    pub fn to_command(&self) -> Result<StockOutCommand, ConsoleError> {
        let reel = self
            .selected
            .as_ref()
            .ok_or_else(|| ConsoleError::InvalidInput("Select a reel first".to_string()))?;
        let quantity = parse_decimal(&self.out_quantity).ok_or_else(|| {
            ConsoleError::Validation(FieldErrors::single("outQuantity", "Enter the out quantity"))
        })?;
        validate_out_quantity(quantity, reel.quantity)?;
        Ok(StockOutCommand {
            reel_number: reel.reel_number.clone(),
            quantity_used: quantity,
            available: reel.quantity,
        })
    }
}
