use super::{Confirm, ScreenStatus};
use crate::{
    errors::ConsoleError,
    forms::NameForm,
    models::{Mill, NamedMaster, RecordId, Shade},
    services::{masters::filter_by_name, NamedMasterService},
};
use tracing::{info, instrument};

pub type MillScreen = MasterScreen<Mill>;
pub type ShadeScreen = MasterScreen<Shade>;

/// List plus entry form for mills or shades.
#[derive(Debug)]
pub struct MasterScreen<M: NamedMaster> {
    service: NamedMasterService<M>,
    records: Vec<M>,
    form: NameForm<M>,
    search: String,
    status: ScreenStatus,
}

impl<M: NamedMaster> MasterScreen<M> {
    pub fn new(service: NamedMasterService<M>) -> Self {
        Self {
            service,
            records: Vec::new(),
            form: NameForm::new(),
            search: String::new(),
            status: ScreenStatus::default(),
        }
    }

    pub fn records(&self) -> &[M] {
        &self.records
    }

    /// Records matching the current search text.
    pub fn visible(&self) -> Vec<M> {
        filter_by_name(&self.records, &self.search)
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn form(&self) -> &NameForm<M> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NameForm<M> {
        &mut self.form
    }

    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn dismiss_notification(&mut self) {
        self.status.dismiss();
    }

    fn lower_label() -> String {
        M::LABEL.to_lowercase()
    }

    /// Loads the list and the next-id hint.
    #[instrument(skip(self), fields(kind = M::LABEL))]
    pub async fn open(&mut self) -> Result<(), ConsoleError> {
        self.status.begin()?;
        let result = self.service.list().await;
        let fallback = format!("Failed to fetch {}s", Self::lower_label());
        self.records = self.status.finish(result, None, &fallback)?;
        self.refresh_hint().await;
        Ok(())
    }

    async fn refresh_hint(&mut self) {
        let hint = self.service.next_id(&self.records).await;
        self.form.set_next_id(hint);
    }

    /// Loads the record with `id` into the form.
    pub fn edit(&mut self, id: RecordId) -> Result<(), ConsoleError> {
        match self.records.iter().find(|r| r.id() == id) {
            Some(record) => {
                self.form.edit(record);
                Ok(())
            }
            None => Err(self.status.reject(
                ConsoleError::NotFound(Some(format!("{} {} not found", M::LABEL, id))),
                "Record not found",
            )),
        }
    }

    /// Leaves edit mode and fetches a fresh hint.
    pub async fn cancel(&mut self) {
        self.form.reset();
        self.refresh_hint().await;
    }

    /// Validates and saves the form, merging the result into the list.
    #[instrument(skip(self), fields(kind = M::LABEL))]
    pub async fn save(&mut self) -> Result<Option<M>, ConsoleError> {
        let fallback = format!("Failed to save {}. Please try again.", Self::lower_label());
        let command = match self.form.to_command() {
            Ok(command) => command,
            Err(err) => return Err(self.status.reject(err, &fallback)),
        };
        let editing = command.id.is_some();

        self.status.begin()?;
        let result = self.service.save(command).await;
        let success = if editing {
            format!("{} updated successfully!", M::LABEL)
        } else {
            format!("{} Master saved successfully!", M::LABEL)
        };
        let saved = self.status.finish(result, Some(success), &fallback)?;

        match &saved {
            Some(record) => self.merge(record.clone()),
            // Nothing came back; the list is re-read instead.
            None => {
                if let Ok(records) = self.service.list().await {
                    self.records = records;
                }
            }
        }
        self.form.reset();
        if !editing {
            self.refresh_hint().await;
        }
        Ok(saved)
    }

    fn merge(&mut self, record: M) {
        match self.records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Deletes after the operator confirms.
    #[instrument(skip(self, confirm), fields(kind = M::LABEL))]
    pub async fn delete(&mut self, id: RecordId, confirm: &dyn Confirm) -> Result<(), ConsoleError> {
        let prompt = format!("Are you sure you want to delete this {}?", Self::lower_label());
        if !confirm.confirm(&prompt) {
            return Err(ConsoleError::Cancelled);
        }
        self.status.begin()?;
        let result = self.service.delete(id).await;
        self.status.finish(
            result,
            Some(format!("{} deleted successfully!", M::LABEL)),
            &format!("Failed to delete {}. Please try again.", Self::lower_label()),
        )?;
        self.records.retain(|r| r.id() != id);
        if self.form.editing() == Some(id) {
            self.form.reset();
        }
        info!(id, "removed from list");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;
    use crate::screens::MockConfirm;
    use assert_matches::assert_matches;
    use std::sync::Arc;
    use std::time::Duration;

    fn screen() -> MillScreen {
        // Unroutable address; the tests below never reach the network.
        let client = ApiClient::new("http://127.0.0.1:9/api", Duration::from_millis(200)).unwrap();
        let mut screen = MillScreen::new(NamedMasterService::new(Arc::new(client)));
        screen.records = vec![Mill::new(1, "Mill A".into()), Mill::new(2, "Mill B".into())];
        screen
    }

    #[tokio::test]
    async fn declined_delete_keeps_the_record() {
        let mut screen = screen();
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt == "Are you sure you want to delete this mill?")
            .times(1)
            .return_const(false);

        assert_matches!(screen.delete(1, &confirm).await, Err(ConsoleError::Cancelled));
        assert_eq!(screen.records().len(), 2);
    }

    #[tokio::test]
    async fn blank_name_never_reaches_the_backend() {
        let mut screen = screen();
        screen.form_mut().set_name("  ");
        assert_matches!(screen.save().await, Err(ConsoleError::Validation(_)));
        assert!(!screen.status().is_busy());
        assert_eq!(
            screen.status().notification().map(|n| n.message.as_str()),
            Some("Mill Name is required")
        );
    }

    #[test]
    fn search_and_edit_work_on_the_local_list() {
        let mut screen = screen();
        screen.set_search("b");
        assert_eq!(screen.visible().len(), 1);
        screen.edit(2).unwrap();
        assert_eq!(screen.form().name(), "Mill B");
        assert_matches!(screen.edit(42), Err(ConsoleError::NotFound(_)));
    }

    #[test]
    fn merge_replaces_or_appends() {
        let mut screen = screen();
        screen.merge(Mill::new(2, "Mill Bee".into()));
        screen.merge(Mill::new(3, "Mill C".into()));
        let names: Vec<_> = screen.records().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Mill A", "Mill Bee", "Mill C"]);
    }
}
