use super::{de_record_id, RecordId};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use validator::Validate;

pub const REEL_SIZE_RANGE: RangeInclusive<u32> = 1..=100;
pub const GSM_RANGE: RangeInclusive<u32> = 1..=1000;
pub const BF_RANGE: RangeInclusive<u32> = 1..=1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperType {
    /// Kraft paper reels
    #[default]
    #[serde(rename = "K")]
    Kraft,
    /// Paper sheets
    #[serde(rename = "S")]
    Sheet,
}

/// Paper specification: reel size, grammage and bursting factor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperMaster {
    #[serde(default, deserialize_with = "de_record_id")]
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub paper_type: PaperType,
    pub reel_size: u32,
    pub gsm: u32,
    pub bf: u32,
    #[serde(default, deserialize_with = "de_record_id")]
    pub part_number: RecordId,
    #[serde(default)]
    pub part_name: Option<String>,
}

impl PaperMaster {
    /// Display name, falling back to the derived one when the backend omitted it.
    pub fn display_name(&self) -> String {
        self.part_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| part_name(self.reel_size, self.gsm, self.bf))
    }
}

/// `reelSize/gsm/bf`, e.g. `30/120/16`.
pub fn part_name(reel_size: u32, gsm: u32, bf: u32) -> String {
    format!("{}/{}/{}", reel_size, gsm, bf)
}

/// Create/update payload for a paper master. Part numbers are assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaperMasterDraft {
    #[serde(rename = "type")]
    pub paper_type: PaperType,
    #[validate(range(min = 1, max = 100, message = "Reel size must be between 1 and 100"))]
    pub reel_size: u32,
    #[validate(range(min = 1, max = 1000, message = "GSM must be between 1 and 1000"))]
    pub gsm: u32,
    #[validate(range(min = 1, max = 1000, message = "BF must be between 1 and 1000"))]
    pub bf: u32,
    pub part_name: String,
}

impl PaperMasterDraft {
    pub fn new(paper_type: PaperType, reel_size: u32, gsm: u32, bf: u32) -> Self {
        Self {
            paper_type,
            reel_size,
            gsm,
            bf,
            part_name: part_name(reel_size, gsm, bf),
        }
    }
}

impl From<&PaperMaster> for PaperMasterDraft {
    fn from(paper: &PaperMaster) -> Self {
        Self::new(paper.paper_type, paper.reel_size, paper.gsm, paper.bf)
    }
}

/// Optional filters for `/paper-master/search`; unset filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reel_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gsm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bf: Option<u32>,
}

impl PaperSearch {
    pub fn is_empty(&self) -> bool {
        self.search_term.as_deref().map_or(true, |t| t.trim().is_empty())
            && self.reel_size.is_none()
            && self.gsm.is_none()
            && self.bf.is_none()
    }

    /// Client-side equivalent of the backend search, used on the cached list.
    pub fn matches(&self, paper: &PaperMaster) -> bool {
        let term_ok = match self.search_term.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => paper
                .display_name()
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        term_ok
            && self.reel_size.map_or(true, |v| paper.reel_size == v)
            && self.gsm.map_or(true, |v| paper.gsm == v)
            && self.bf.map_or(true, |v| paper.bf == v)
    }
}
