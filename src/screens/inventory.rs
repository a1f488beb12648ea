use super::ScreenStatus;
use crate::{
    debounce::Debouncer, errors::ConsoleError, models::Reel, services::InventoryService,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

struct SearchOutcome {
    generation: u64,
    result: Result<Vec<Reel>, ConsoleError>,
}

/// Read-only inventory search with debounced queries.
///
/// Each keystroke supersedes the pending query. Results arrive on a channel
/// owned by the screen and are tagged with the query generation, so a late
/// answer to an older query is discarded.
pub struct InventoryScreen {
    service: InventoryService,
    debouncer: Debouncer,
    query: String,
    items: Vec<Reel>,
    generation: u64,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
    status: ScreenStatus,
}

impl InventoryScreen {
    pub fn new(service: InventoryService, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            debouncer: Debouncer::new(debounce),
            query: String::new(),
            items: Vec::new(),
            generation: 0,
            tx,
            rx,
            status: ScreenStatus::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[Reel] {
        &self.items
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn dismiss_notification(&mut self) {
        self.status.dismiss();
    }

    pub fn is_searching(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Loads the unfiltered inventory.
    pub async fn open(&mut self) -> Result<(), ConsoleError> {
        self.search_now("").await
    }

    /// Runs `query` immediately, cancelling any pending debounced search.
    #[instrument(skip(self))]
    pub async fn search_now(&mut self, query: &str) -> Result<(), ConsoleError> {
        self.debouncer.cancel();
        self.generation += 1;
        self.query = query.to_string();
        let result = self.service.search(query).await;
        self.items = self
            .status
            .finish(result, None, "Failed to search inventory")?;
        Ok(())
    }

    /// Records a keystroke; the backend is queried once typing pauses.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.generation += 1;

        let generation = self.generation;
        let query = self.query.clone();
        let service = self.service.clone();
        let tx = self.tx.clone();
        self.debouncer.schedule(async move {
            let result = service.search(&query).await;
            // The receiver lives as long as the screen.
            let _ = tx.send(SearchOutcome { generation, result });
        });
    }

    /// Applies any results that have already arrived. Returns true when the
    /// list changed.
    pub fn poll_results(&mut self) -> bool {
        let mut updated = false;
        while let Ok(outcome) = self.rx.try_recv() {
            updated |= matches!(self.apply(outcome), Some(Ok(())));
        }
        updated
    }

    /// Waits for the pending query to finish and applies its result.
    /// `None` when nothing was pending.
    pub async fn next_result(&mut self) -> Option<Result<(), ConsoleError>> {
        self.debouncer.wait().await;
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(result) = self.apply(outcome) {
                latest = Some(result);
            }
        }
        latest
    }

    /// `None` for a result that belongs to a superseded query.
    fn apply(&mut self, outcome: SearchOutcome) -> Option<Result<(), ConsoleError>> {
        if outcome.generation != self.generation {
            debug!(stale = outcome.generation, "discarding superseded result");
            return None;
        }
        Some(match outcome.result {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(err) => {
                self.status.report(&err, "Failed to search inventory");
                Err(err)
            }
        })
    }
}
