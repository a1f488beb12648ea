//! Wire types exchanged with the backend.

pub mod master_data;
pub mod mill;
pub mod paper;
pub mod purchase;
pub mod reel;
pub mod shade;

pub use master_data::MasterDataOptions;
pub use mill::Mill;
pub use paper::{PaperMaster, PaperMasterDraft, PaperSearch, PaperType};
pub use purchase::{PurchaseDraft, PurchaseRecord};
pub use reel::{IssueHistoryEntry, Reel, StockOutRequest, StockOutResult};
pub use shade::Shade;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

/// Backend-assigned identifier.
pub type RecordId = i64;

/// A reference record identified by a single name (mills, shades).
pub trait NamedMaster:
    Clone + std::fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Human label, e.g. "Mill".
    const LABEL: &'static str;
    /// Collection path under the API base URL.
    const COLLECTION: &'static str;
    /// Whether the backend can suggest the next identifier.
    const HAS_NEXT_ID: bool;

    fn id(&self) -> RecordId;
    fn name(&self) -> &str;
    fn new(id: RecordId, name: String) -> Self;
    /// Body for a create request; carries no identifier.
    fn create_payload(name: &str) -> serde_json::Value;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Accepts identifiers sent either as JSON numbers or numeric strings.
pub(crate) fn de_record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Parses a bare identifier response such as `42` or `"42"`.
pub fn record_id_from_value(value: &serde_json::Value) -> Option<RecordId> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Next free identifier suggested from the records already on screen.
pub fn next_id_hint<T>(records: &[T], id: impl Fn(&T) -> RecordId) -> RecordId {
    records.iter().map(id).max().unwrap_or(0).saturating_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_parse_from_numbers_and_strings() {
        assert_eq!(record_id_from_value(&json!(12)), Some(12));
        assert_eq!(record_id_from_value(&json!(" 7 ")), Some(7));
        assert_eq!(record_id_from_value(&json!("x")), None);
        assert_eq!(record_id_from_value(&json!(null)), None);
    }

    #[test]
    fn hint_is_one_past_the_largest_id() {
        assert_eq!(next_id_hint::<i64>(&[], |v| *v), 1);
        assert_eq!(next_id_hint(&[3_i64, 9, 4], |v| *v), 10);
        assert_eq!(next_id_hint(&[RecordId::MAX], |v| *v), RecordId::MAX);
    }
}
