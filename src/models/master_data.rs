use serde::{Deserialize, Serialize};

/// Dropdown options offered by the purchase form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataOptions {
    pub paper_names: Vec<String>,
    pub mill_names: Vec<String>,
    pub shades: Vec<String>,
}

impl MasterDataOptions {
    /// True once at least one list came back non-empty.
    pub fn is_loaded(&self) -> bool {
        !(self.paper_names.is_empty() && self.mill_names.is_empty() && self.shades.is_empty())
    }

    /// Whether `value` is an accepted choice; an unloaded list accepts anything.
    pub fn allows(options: &[String], value: &str) -> bool {
        options.is_empty() || options.iter().any(|o| o == value)
    }
}
