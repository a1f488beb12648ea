use super::{Confirm, ScreenStatus};
use crate::{
    errors::ConsoleError,
    forms::PaperForm,
    models::{PaperMaster, PaperSearch, RecordId},
    services::PaperMasterService,
};
use tracing::instrument;

/// Paper master list, filters and entry form.
pub struct PaperMasterScreen {
    service: PaperMasterService,
    papers: Vec<PaperMaster>,
    search: PaperSearch,
    /// Backend result for the active filters, if any.
    results: Option<Vec<PaperMaster>>,
    form: PaperForm,
    status: ScreenStatus,
}

impl PaperMasterScreen {
    pub fn new(service: PaperMasterService) -> Self {
        Self {
            service,
            papers: Vec::new(),
            search: PaperSearch::default(),
            results: None,
            form: PaperForm::new(),
            status: ScreenStatus::default(),
        }
    }

    pub fn papers(&self) -> &[PaperMaster] {
        &self.papers
    }

    /// The backend result while a filter is active, otherwise the full list.
    pub fn visible(&self) -> &[PaperMaster] {
        self.results.as_deref().unwrap_or(&self.papers)
    }

    pub fn search(&self) -> &PaperSearch {
        &self.search
    }

    pub fn form(&self) -> &PaperForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut PaperForm {
        &mut self.form
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn dismiss_notification(&mut self) {
        self.status.dismiss();
    }

    #[instrument(skip(self))]
    pub async fn open(&mut self) -> Result<(), ConsoleError> {
        self.status.begin()?;
        let result = self.service.list().await;
        self.papers = self.status.finish(result, None, "Error fetching Paper Masters")?;
        Ok(())
    }

    /// Applies `search`; clearing every filter restores the full list.
    #[instrument(skip(self))]
    pub async fn apply_search(&mut self, search: PaperSearch) -> Result<(), ConsoleError> {
        self.search = search;
        if self.search.is_empty() {
            self.results = None;
            return Ok(());
        }
        self.status.begin()?;
        let result = self.service.search(&self.search).await;
        self.results = Some(self.status.finish(result, None, "Error searching Paper Masters")?);
        Ok(())
    }

    pub fn reset_search(&mut self) {
        self.search = PaperSearch::default();
        self.results = None;
    }

    pub fn edit(&mut self, id: RecordId) -> Result<(), ConsoleError> {
        match self.papers.iter().find(|p| p.id == id) {
            Some(paper) => {
                self.form.edit(paper);
                Ok(())
            }
            None => Err(self.status.reject(
                ConsoleError::NotFound(Some(format!("Paper master {} not found", id))),
                "Paper master not found",
            )),
        }
    }

    pub fn cancel(&mut self) {
        self.form.reset();
    }

    #[instrument(skip(self))]
    pub async fn save(&mut self) -> Result<Option<PaperMaster>, ConsoleError> {
        let editing = self.form.editing().is_some();
        let (fallback, success) = if editing {
            ("Error updating Paper Master", "Paper Master updated successfully!")
        } else {
            ("Error saving Paper Master", "Paper Master saved successfully!")
        };
        let command = match self.form.to_command() {
            Ok(command) => command,
            Err(err) => return Err(self.status.reject(err, fallback)),
        };

        self.status.begin()?;
        let result = self.service.save(command).await;
        let saved = self
            .status
            .finish(result, Some(success.to_string()), fallback)?;

        match &saved {
            Some(paper) => self.merge(paper.clone()),
            None => {
                if let Ok(papers) = self.service.list().await {
                    self.papers = papers;
                }
            }
        }
        self.form.reset();
        Ok(saved)
    }

    fn merge(&mut self, paper: PaperMaster) {
        if let Some(results) = self.results.as_mut() {
            if let Some(existing) = results.iter_mut().find(|p| p.id == paper.id) {
                *existing = paper.clone();
            }
        }
        match self.papers.iter_mut().find(|p| p.id == paper.id) {
            Some(existing) => *existing = paper,
            None => self.papers.push(paper),
        }
    }

    #[instrument(skip(self, confirm))]
    pub async fn delete(&mut self, id: RecordId, confirm: &dyn Confirm) -> Result<(), ConsoleError> {
        if !confirm.confirm("Are you sure you want to delete this paper master?") {
            return Err(ConsoleError::Cancelled);
        }
        self.status.begin()?;
        let result = self.service.delete(id).await;
        self.status.finish(
            result,
            Some("Paper Master deleted successfully!".to_string()),
            "Error deleting Paper Master",
        )?;
        self.papers.retain(|p| p.id != id);
        if let Some(results) = self.results.as_mut() {
            results.retain(|p| p.id != id);
        }
        if self.form.editing().map(|p| p.id) == Some(id) {
            self.form.reset();
        }
        Ok(())
    }
}
