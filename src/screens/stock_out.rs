use super::ScreenStatus;
use crate::{
    errors::ConsoleError,
    forms::StockOutForm,
    models::{reel::apply_stock_out, IssueHistoryEntry, Reel},
    services::ReelService,
};
use chrono::Local;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockOutTab {
    #[default]
    ReelOut,
    History,
}

/// "Paper Out": active reels, the out-quantity dialog and issue history.
pub struct StockOutScreen {
    service: ReelService,
    reels: Vec<Reel>,
    history: Vec<IssueHistoryEntry>,
    query: String,
    search_results: Option<Vec<Reel>>,
    form: StockOutForm,
    tab: StockOutTab,
    status: ScreenStatus,
}

impl StockOutScreen {
    pub fn new(service: ReelService) -> Self {
        Self {
            service,
            reels: Vec::new(),
            history: Vec::new(),
            query: String::new(),
            search_results: None,
            form: StockOutForm::new(),
            tab: StockOutTab::default(),
            status: ScreenStatus::default(),
        }
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    /// Reels shown in the table: the backend search result when one is
    /// active, narrowed by the local query.
    pub fn visible(&self) -> Vec<&Reel> {
        self.search_results
            .as_deref()
            .unwrap_or(&self.reels)
            .iter()
            .filter(|r| r.matches_query(&self.query))
            .collect()
    }

    /// Most recent first.
    pub fn history(&self) -> &[IssueHistoryEntry] {
        &self.history
    }

    pub fn tab(&self) -> StockOutTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: StockOutTab) {
        self.tab = tab;
    }

    pub fn form(&self) -> &StockOutForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut StockOutForm {
        &mut self.form
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn dismiss_notification(&mut self) {
        self.status.dismiss();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[instrument(skip(self))]
    pub async fn open(&mut self) -> Result<(), ConsoleError> {
        self.status.begin()?;
        let result = self.load().await;
        let (reels, history) = self.status.finish(result, None, "Failed to fetch reels")?;
        self.reels = reels;
        self.history = history;
        Ok(())
    }

    async fn load(&self) -> Result<(Vec<Reel>, Vec<IssueHistoryEntry>), ConsoleError> {
        tokio::try_join!(self.service.list(), self.service.history())
    }

    /// Backend search; a blank query drops back to the active list.
    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> Result<(), ConsoleError> {
        if query.trim().is_empty() {
            self.search_results = None;
            return Ok(());
        }
        self.status.begin()?;
        let result = self.service.search(query).await;
        self.search_results = Some(self.status.finish(result, None, "Failed to search reels")?);
        Ok(())
    }

    /// Opens the out-quantity dialog for `reel_number`.
    pub fn select(&mut self, reel_number: &str) -> Result<(), ConsoleError> {
        match self.reels.iter().find(|r| r.reel_number == reel_number) {
            Some(reel) => {
                self.form.select(reel.clone());
                Ok(())
            }
            None => Err(self.status.reject(
                ConsoleError::NotFound(Some(format!("Reel {} not found", reel_number))),
                "Reel not found",
            )),
        }
    }

    /// Issues the entered quantity from the selected reel.
    ///
    /// The change is shown immediately and rolled back if the backend
    /// rejects it; on success both lists are re-read from the backend.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<IssueHistoryEntry, ConsoleError> {
        let fallback = "Failed to issue reel";
        let command = match self.form.to_command() {
            Ok(command) => command,
            Err(err) => return Err(self.status.reject(err, fallback)),
        };
        let applied = match apply_stock_out(
            &self.reels,
            &command.reel_number,
            command.quantity_used,
            Local::now().date_naive(),
        ) {
            Ok(applied) => applied,
            Err(err) => return Err(self.status.reject(err, fallback)),
        };

        self.status.begin()?;
        let previous_reels = std::mem::replace(&mut self.reels, applied.reels);
        self.history.insert(0, applied.entry.clone());

        let result = self.service.stock_out(command).await;
        if result.is_err() {
            self.reels = previous_reels;
            self.history.remove(0);
        }
        self.status.finish(
            result,
            Some(format!("Reel {} issued", applied.entry.reel_number)),
            fallback,
        )?;
        info!(left = %applied.entry.quantity_left, "stock-out applied");

        self.form.clear();
        self.search_results = None;
        match self.load().await {
            Ok((reels, history)) => {
                self.reels = reels;
                self.history = history;
            }
            Err(err) => {
                warn!(error = %err, "refresh after stock-out failed");
                self.status.report(&err, "Failed to refresh reels");
            }
        }
        Ok(applied.entry)
    }
}
