//! Screen state for each route of the console.
//!
//! A screen owns its list and form exclusively. Operations take `&mut self`,
//! report their outcome through a dismissible [`Notification`] and return the
//! error as well, so callers can decide whether to keep going.

pub mod inventory;
pub mod masters;
pub mod paper_master;
pub mod purchase;
pub mod stock_out;

pub use inventory::InventoryScreen;
pub use masters::{MasterScreen, MillScreen, ShadeScreen};
pub use paper_master::PaperMasterScreen;
pub use purchase::PurchaseScreen;
pub use stock_out::{StockOutScreen, StockOutTab};

use crate::{errors::ConsoleError, notifications::Notification};

/// Asks the operator to confirm a destructive action.
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything; used for non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Banner slot and in-flight flag shared by every screen.
#[derive(Debug, Clone, Default)]
pub struct ScreenStatus {
    notification: Option<Notification>,
    busy: bool,
}

impl ScreenStatus {
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Posts an error banner without touching the in-flight flag.
    pub(crate) fn report(&mut self, err: &ConsoleError, fallback: &str) {
        self.notification = Some(Notification::from_error(err, fallback));
    }

    /// Marks a request as in flight; a second submission is rejected.
    pub(crate) fn begin(&mut self) -> Result<(), ConsoleError> {
        if self.busy {
            let err = ConsoleError::Busy;
            self.notification = Some(Notification::from_error(&err, ""));
            return Err(err);
        }
        self.busy = true;
        Ok(())
    }

    /// Clears the in-flight flag and posts the outcome.
    pub(crate) fn finish<T>(
        &mut self,
        result: Result<T, ConsoleError>,
        success: Option<String>,
        fallback: &str,
    ) -> Result<T, ConsoleError> {
        self.busy = false;
        match &result {
            Ok(_) => {
                if let Some(message) = success {
                    self.notification = Some(Notification::success(message));
                }
            }
            Err(err) => self.notification = Some(Notification::from_error(err, fallback)),
        }
        result
    }

    /// Posts an error banner for a failure that happened before any request.
    pub(crate) fn reject(&mut self, err: ConsoleError, fallback: &str) -> ConsoleError {
        self.report(&err, fallback);
        err
    }
}
