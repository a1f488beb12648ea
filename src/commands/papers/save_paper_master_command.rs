use crate::{
    client::{endpoints, ApiClient},
    commands::Command,
    errors::ConsoleError,
    models::{PaperMaster, PaperMasterDraft, RecordId},
};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePaperMasterCommand {
    /// Existing record being edited; `None` creates a new paper.
    pub existing: Option<(RecordId, RecordId)>,
    pub draft: PaperMasterDraft,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaperMasterUpdate<'a> {
    id: RecordId,
    part_number: RecordId,
    #[serde(flatten)]
    draft: &'a PaperMasterDraft,
}

impl SavePaperMasterCommand {
    pub fn create(draft: PaperMasterDraft) -> Self {
        Self {
            existing: None,
            draft,
        }
    }

    /// Edits `paper`; its part number is carried over unchanged.
    pub fn update(paper: &PaperMaster, draft: PaperMasterDraft) -> Self {
        Self {
            existing: Some((paper.id, paper.part_number)),
            draft,
        }
    }
}

#[async_trait]
impl Command for SavePaperMasterCommand {
    /// The saved record, or `None` when a create answered with an empty body.
    type Result = Option<PaperMaster>;

    #[instrument(skip(self, client), fields(part_name = %self.draft.part_name))]
    async fn execute(&self, client: Arc<ApiClient>) -> Result<Self::Result, ConsoleError> {
        self.draft.validate()?;

        let saved = match self.existing {
            Some((id, part_number)) => {
                let body = PaperMasterUpdate {
                    id,
                    part_number,
                    draft: &self.draft,
                };
                let path = format!("{}/{}", endpoints::PAPER_MASTER, id);
                let saved: Option<PaperMaster> = client.put(&path, &body).await.map_err(|e| {
                    error!(error = %e, "paper master update failed");
                    e
                })?;
                Some(saved.unwrap_or_else(|| PaperMaster {
                    id,
                    paper_type: self.draft.paper_type,
                    reel_size: self.draft.reel_size,
                    gsm: self.draft.gsm,
                    bf: self.draft.bf,
                    part_number,
                    part_name: Some(self.draft.part_name.clone()),
                }))
            }
            None => client
                .post(endpoints::PAPER_MASTER, &self.draft)
                .await
                .map_err(|e| {
                    error!(error = %e, "paper master create failed");
                    e
                })?,
        };

        info!("paper master saved");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaperType;

    #[test]
    fn update_body_keeps_part_number_and_flattens_fields() {
        let draft = PaperMasterDraft::new(PaperType::Sheet, 32, 140, 18);
        let body = PaperMasterUpdate {
            id: 5,
            part_number: 11,
            draft: &draft,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["partNumber"], 11);
        assert_eq!(json["type"], "S");
        assert_eq!(json["partName"], "32/140/18");
    }
}
