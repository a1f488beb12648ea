use super::parse_in_range;
use crate::{
    commands::SavePaperMasterCommand,
    errors::{ConsoleError, FieldErrors},
    models::{
        paper::{BF_RANGE, GSM_RANGE, REEL_SIZE_RANGE},
        PaperMaster, PaperMasterDraft, PaperType,
    },
};

const REEL_SIZE_MESSAGE: &str = "Reel size must be between 1 and 100";
const GSM_MESSAGE: &str = "GSM must be between 1 and 1000";
const BF_MESSAGE: &str = "BF must be between 1 and 1000";
const REQUIRED_MESSAGE: &str = "Reel size, GSM and BF are required";

/// Paper master entry form.
///
/// Every change re-validates the field it touched and recomputes the part
/// name from the trimmed input, which is set while all three numeric fields
/// are non-empty. Field errors still block the save.
#[derive(Debug, Clone, Default)]
pub struct PaperForm {
    editing: Option<PaperMaster>,
    paper_type: PaperType,
    reel_size: NumericField,
    gsm: NumericField,
    bf: NumericField,
    part_name: Option<String>,
    errors: FieldErrors,
}

/// Trimmed input alongside its parsed value, if valid.
#[derive(Debug, Clone, Default)]
struct NumericField {
    raw: String,
    value: Option<u32>,
}

impl NumericField {
    fn valid(value: u32) -> Self {
        Self { raw: value.to_string(), value: Some(value) }
    }
}

impl PaperForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn part_name(&self) -> Option<&str> {
        self.part_name.as_deref()
    }

    pub fn paper_type(&self) -> PaperType {
        self.paper_type
    }

    pub fn editing(&self) -> Option<&PaperMaster> {
        self.editing.as_ref()
    }

    pub fn set_paper_type(&mut self, paper_type: PaperType) {
        self.paper_type = paper_type;
    }

    pub fn set_reel_size(&mut self, raw: &str) {
        self.reel_size = Self::apply(&mut self.errors, "reelSize", raw, &REEL_SIZE_RANGE, REEL_SIZE_MESSAGE);
        self.recompute();
    }

    pub fn set_gsm(&mut self, raw: &str) {
        self.gsm = Self::apply(&mut self.errors, "gsm", raw, &GSM_RANGE, GSM_MESSAGE);
        self.recompute();
    }

    pub fn set_bf(&mut self, raw: &str) {
        self.bf = Self::apply(&mut self.errors, "bf", raw, &BF_RANGE, BF_MESSAGE);
        self.recompute();
    }

    fn apply(
        errors: &mut FieldErrors,
        field: &str,
        raw: &str,
        range: &std::ops::RangeInclusive<u32>,
        message: &str,
    ) -> NumericField {
        errors.remove("form");
        let value = match parse_in_range(raw, range, message) {
            Ok(value) => {
                errors.remove(field);
                value
            }
            Err(message) => {
                errors.insert(field, message);
                None
            }
        };
        NumericField { raw: raw.trim().to_string(), value }
    }

    fn recompute(&mut self) {
        let raws = [&self.reel_size.raw, &self.gsm.raw, &self.bf.raw];
        self.part_name = if raws.iter().all(|r| !r.is_empty()) {
            Some(format!("{}/{}/{}", raws[0], raws[1], raws[2]))
        } else {
            None
        };
    }

    pub fn edit(&mut self, paper: &PaperMaster) {
        *self = Self {
            editing: Some(paper.clone()),
            paper_type: paper.paper_type,
            reel_size: NumericField::valid(paper.reel_size),
            gsm: NumericField::valid(paper.gsm),
            bf: NumericField::valid(paper.bf),
            part_name: None,
            errors: FieldErrors::new(),
        };
        self.recompute();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Blocked while any field error is set or a field is missing.
    pub fn to_command(&mut self) -> Result<SavePaperMasterCommand, ConsoleError> {
        if !self.errors.is_empty() {
            return Err(ConsoleError::Validation(self.errors.clone()));
        }
        let (reel_size, gsm, bf) = match (self.reel_size.value, self.gsm.value, self.bf.value) {
            (Some(r), Some(g), Some(b)) => (r, g, b),
            _ => {
                self.errors.insert("form", REQUIRED_MESSAGE);
                return Err(ConsoleError::Validation(FieldErrors::single("form", REQUIRED_MESSAGE)));
            }
        };
        let draft = PaperMasterDraft::new(self.paper_type, reel_size, gsm, bf);
        Ok(match &self.editing {
            Some(paper) => SavePaperMasterCommand::update(paper, draft),
            None => SavePaperMasterCommand::create(draft),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn part_name_follows_the_fields() {
        let mut form = PaperForm::new();
        form.set_reel_size("30");
        form.set_gsm("120");
        assert_eq!(form.part_name(), None);
        form.set_bf("16");
        assert_eq!(form.part_name(), Some("30/120/16"));
        form.set_gsm("");
        assert_eq!(form.part_name(), None);
    }

    #[test]
    fn invalid_input_is_reported_per_field() {
        let mut form = PaperForm::new();
        form.set_reel_size("101");
        form.set_gsm("abc");
        form.set_bf("16");
        assert_eq!(form.errors().get("reelSize"), Some(REEL_SIZE_MESSAGE));
        assert_eq!(form.errors().get("gsm"), Some(GSM_MESSAGE));
        assert!(!form.errors().contains("bf"));
        assert_matches!(form.to_command(), Err(ConsoleError::Validation(_)));

        form.set_reel_size("30");
        form.set_gsm("120");
        assert!(form.errors().is_empty());
        let command = form.to_command().unwrap();
        assert_eq!(command.draft.part_name, "30/120/16");
        assert_eq!(command.existing, None);
    }

    #[test]
    fn out_of_range_value_still_names_the_part() {
        let mut form = PaperForm::new();
        form.set_gsm("120");
        form.set_bf("16");
        form.set_reel_size(" 500 ");
        assert_eq!(form.part_name(), Some("500/120/16"));
        assert_eq!(form.errors().get("reelSize"), Some(REEL_SIZE_MESSAGE));
        assert_matches!(form.to_command(), Err(ConsoleError::Validation(_)));
    }

    #[test]
    fn missing_fields_block_save() {
        let mut form = PaperForm::new();
        form.set_reel_size("30");
        let err = form.to_command().unwrap_err();
        assert_eq!(err.field_errors().and_then(|f| f.get("form")), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn editing_keeps_identity() {
        let paper = PaperMaster {
            id: 4,
            paper_type: PaperType::Sheet,
            reel_size: 28,
            gsm: 100,
            bf: 14,
            part_number: 21,
            part_name: Some("28/100/14".into()),
        };
        let mut form = PaperForm::new();
        form.edit(&paper);
        assert_eq!(form.part_name(), Some("28/100/14"));
        form.set_bf("18");
        let command = form.to_command().unwrap();
        assert_eq!(command.existing, Some((4, 21)));
        assert_eq!(command.draft.part_name, "28/100/18");
        assert_eq!(command.draft.paper_type, PaperType::Sheet);
    }
}
