use super::{de_record_id, NamedMaster, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Paper colour/shade, e.g. "White" or "Brown".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shade {
    #[serde(rename = "shadeId", deserialize_with = "de_record_id")]
    pub id: RecordId,
    #[serde(rename = "shadeName")]
    pub name: String,
}

impl NamedMaster for Shade {
    const LABEL: &'static str = "Shade";
    const COLLECTION: &'static str = "shades";
    // The shade endpoints have no next-id route; the hint is derived locally.
    const HAS_NEXT_ID: bool = false;

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
        json!({ "shadeName": name })
    }
}
