use super::{de_record_id, NamedMaster, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Paper mill supplying reels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mill {
    #[serde(rename = "millId", deserialize_with = "de_record_id")]
    pub id: RecordId,
    #[serde(rename = "millName")]
    pub name: String,
}

impl NamedMaster for Mill {
    const LABEL: &'static str = "Mill";
    const COLLECTION: &'static str = "mills";
    const HAS_NEXT_ID: bool = true;

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn new(id: RecordId, name: String) -> Self {
        Self { id, name }
    }

    fn create_payload(name: &str) -> serde_json::Value {
        json!({ "millName": name })
    }
}
