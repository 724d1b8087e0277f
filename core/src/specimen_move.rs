//! "Move specimen" dialog: reassign a specimen's category and/or sede.
//!
//! The move is only accepted when at least one of the two selections differs
//! from the specimen's current value. An empty selection means "unset".

use thiserror::Error;
use uuid::Uuid;

use crate::error::FieldErrors;
use crate::form::FormState;
use crate::schemas;
use crate::types::{MoveSpecimen, Specimen};
use crate::validation::FormValues;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("select a different category or sede")]
    Unchanged,
    #[error("invalid selection")]
    Invalid(FieldErrors),
}

/// Compare the selected ids with the originals and build the payload.
pub fn validate_move(
    original_category: &str,
    original_sede: &str,
    category: &str,
    sede: &str,
) -> Result<MoveSpecimen, MoveRejected> {
    let (category, sede) = (category.trim(), sede.trim());
    if category == original_category.trim() && sede == original_sede.trim() {
        return Err(MoveRejected::Unchanged);
    }

    let mut errors = FieldErrors::new();
    let category_id = parse_optional_id(category, "categoryId", &mut errors);
    let sede_id = parse_optional_id(sede, "sedeId", &mut errors);
    if !errors.is_empty() {
        return Err(MoveRejected::Invalid(errors));
    }
    Ok(MoveSpecimen { category_id, sede_id })
}

fn parse_optional_id(value: &str, field: &str, errors: &mut FieldErrors) -> Option<Uuid> {
    if value.is_empty() {
        return None;
    }
    match Uuid::parse_str(value) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.insert(field, "Select a valid option");
            None
        }
    }
}

/// Dialog state for moving one specimen.
#[derive(Debug, Clone)]
pub struct MoveSpecimenForm {
    specimen_id: Uuid,
    original_category: String,
    original_sede: String,
    form: FormState,
}

impl MoveSpecimenForm {
    pub fn new(specimen: &Specimen) -> Self {
        let original_category = specimen.category_id.map(|id| id.to_string()).unwrap_or_default();
        let original_sede = specimen.sede_id.map(|id| id.to_string()).unwrap_or_default();
        let values = FormValues::new()
            .with("categoryId", original_category.as_str())
            .with("sedeId", original_sede.as_str());
        Self {
            specimen_id: specimen.id,
            original_category,
            original_sede,
            form: FormState::with_values(&schemas::MOVE_SPECIMEN, values),
        }
    }

    pub fn specimen_id(&self) -> Uuid {
        self.specimen_id
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn select_category(&mut self, id: &str) {
        self.form.change("categoryId", id);
    }

    pub fn select_sede(&mut self, id: &str) {
        self.form.change("sedeId", id);
    }

    pub fn has_changes(&self) -> bool {
        self.form.value("categoryId").trim() != self.original_category
            || self.form.value("sedeId").trim() != self.original_sede
    }

    pub fn can_submit(&self) -> bool {
        self.has_changes() && self.form.can_submit()
    }

    /// Validate and enter `Submitting`, yielding the move payload.
    pub fn begin_submit(&mut self) -> Result<MoveSpecimen, MoveRejected> {
        let target = validate_move(
            &self.original_category,
            &self.original_sede,
            self.form.value("categoryId"),
            self.form.value("sedeId"),
        )?;
        match self.form.begin_submit() {
            Some(_) => Ok(target),
            None => Err(MoveRejected::Invalid(self.form.errors())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn specimen(category: Option<Uuid>, sede: Option<Uuid>) -> Specimen {
        Specimen {
            id: Uuid::from_u128(1),
            name: "Toby".to_string(),
            breed: "Labrador".to_string(),
            color: "Black".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
            estado: Default::default(),
            category_id: category,
            sede_id: sede,
            client_id: None,
            category_name: None,
            sede_name: None,
            client_name: None,
        }
    }

    #[test]
    fn identical_targets_are_rejected() {
        let cat = Uuid::from_u128(10).to_string();
        let sede = Uuid::from_u128(20).to_string();
        assert_eq!(validate_move(&cat, &sede, &cat, &sede), Err(MoveRejected::Unchanged));
        assert_eq!(validate_move("", "", " ", ""), Err(MoveRejected::Unchanged));
    }

    #[test]
    fn one_changed_target_is_accepted() {
        let cat = Uuid::from_u128(10).to_string();
        let sede = Uuid::from_u128(20).to_string();
        let other = Uuid::from_u128(30).to_string();
        let target = validate_move(&cat, &sede, &cat, &other).unwrap();
        assert_eq!(target.category_id, Some(Uuid::from_u128(10)));
        assert_eq!(target.sede_id, Some(Uuid::from_u128(30)));
    }

    #[test]
    fn clearing_a_relation_counts_as_a_change() {
        let cat = Uuid::from_u128(10).to_string();
        let target = validate_move(&cat, "", "", "").unwrap();
        assert_eq!(target, MoveSpecimen { category_id: None, sede_id: None });
    }

    #[test]
    fn malformed_id_is_invalid() {
        let err = validate_move("", "", "not-an-id", "").unwrap_err();
        assert!(matches!(err, MoveRejected::Invalid(ref e) if e.contains("categoryId")));
    }

    #[test]
    fn dialog_blocks_until_something_changes() {
        let mut dialog = MoveSpecimenForm::new(&specimen(Some(Uuid::from_u128(10)), Some(Uuid::from_u128(20))));
        assert!(!dialog.can_submit());
        assert_eq!(dialog.begin_submit(), Err(MoveRejected::Unchanged));

        dialog.select_sede(&Uuid::from_u128(21).to_string());
        assert!(dialog.can_submit());
        let target = dialog.begin_submit().unwrap();
        assert_eq!(target.sede_id, Some(Uuid::from_u128(21)));
        assert!(dialog.form().is_submitting());
    }

    #[test]
    fn selecting_the_original_again_blocks() {
        let original = Uuid::from_u128(10);
        let mut dialog = MoveSpecimenForm::new(&specimen(Some(original), None));
        dialog.select_category(&Uuid::from_u128(11).to_string());
        assert!(dialog.has_changes());
        dialog.select_category(&original.to_string());
        assert!(!dialog.has_changes());
    }
}
