use super::ScreenStatus;
use crate::{
    errors::ConsoleError,
    forms::{PurchaseForm, SaveMode},
    models::{MasterDataOptions, PurchaseRecord},
    services::{MasterDataService, PurchaseService},
};
use chrono::{Local, NaiveDate};
use tracing::{instrument, warn};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// "Paper In": new purchase form plus purchase history.
pub struct PurchaseScreen {
    purchases: PurchaseService,
    master_data: MasterDataService,
    form: PurchaseForm,
    options: MasterDataOptions,
    history: Vec<PurchaseRecord>,
    status: ScreenStatus,
}

impl PurchaseScreen {
    pub fn new(purchases: PurchaseService, master_data: MasterDataService) -> Self {
        Self {
            purchases,
            master_data,
            form: PurchaseForm::new(today(), String::new()),
            options: MasterDataOptions::default(),
            history: Vec::new(),
            status: ScreenStatus::default(),
        }
    }

    pub fn form(&self) -> &PurchaseForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PurchaseForm {
        &mut self.form
    }

    pub fn options(&self) -> &MasterDataOptions {
        &self.options
    }

    /// Most recent first.
    pub fn history(&self) -> &[PurchaseRecord] {
        &self.history
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn dismiss_notification(&mut self) {
        self.status.dismiss();
    }

    /// Allocates a reel number and loads dropdown options and history.
    ///
    /// Options and history are best effort: a failure there is reported but
    /// the form stays usable.
    #[instrument(skip(self))]
    pub async fn open(&mut self) -> Result<(), ConsoleError> {
        self.status.begin()?;
        let result = self.purchases.generate_reel_number().await;
        let reel_number = self
            .status
            .finish(result, None, "Failed to generate reel number")?;
        self.form = PurchaseForm::new(today(), reel_number);

        match self.master_data.options().await {
            Ok(options) => self.options = options,
            Err(err) => {
                warn!(error = %err, "master data unavailable");
                self.status.report(&err, "Failed to load master data");
            }
        }
        self.reload_history().await;
        Ok(())
    }

    pub async fn reload_history(&mut self) {
        match self.purchases.history().await {
            Ok(history) => self.history = history,
            Err(err) => {
                warn!(error = %err, "purchase history unavailable");
                self.status.report(&err, "Failed to load purchase history");
            }
        }
    }

    /// Records the purchase and prepares the form according to `mode`.
    #[instrument(skip(self))]
    pub async fn save(&mut self, mode: SaveMode) -> Result<PurchaseRecord, ConsoleError> {
        let fallback = "Failed to save paper purchase";
        let command = match self.form.to_command(&self.options) {
            Ok(command) => command,
            Err(err) => return Err(self.status.reject(err, fallback)),
        };

        self.status.begin()?;
        let result = self.purchases.record(command).await;
        let record = self.status.finish(
            result,
            Some("Paper purchase record saved successfully".to_string()),
            fallback,
        )?;
        self.history.insert(0, record.clone());

        match self.purchases.generate_reel_number().await {
            Ok(next) => self.form.after_save(mode, today(), next),
            Err(err) => {
                // Saved, but the form cannot move on without a fresh number.
                warn!(error = %err, "could not allocate the next reel number");
                self.form.after_save(mode, today(), String::new());
                self.status.report(&err, "Failed to generate reel number");
            }
        }
        Ok(record)
    }
}
