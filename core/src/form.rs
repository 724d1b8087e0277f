//! Form state machine shared by every create/edit dialog.
//!
//! `Pristine -> Editing -> Submitting -> (Succeeded | BackendError)`.
//! Client-side errors come from the schema validators; server field errors
//! from a rejected submission take precedence for the same field until the
//! user edits that field again.

use std::collections::BTreeSet;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{ApiError, FieldErrors};
use crate::validation::{validate_all, validate_field, FormSchema, FormValues, Rule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Pristine,
    Editing,
    Submitting,
    Succeeded,
    BackendError,
}

/// Typed payload built from validated form values.
pub trait FormInput: Sized {
    fn schema() -> &'static FormSchema;

    /// Rules for a new record, when they are stricter than for an edit.
    fn create_schema() -> &'static FormSchema {
        Self::schema()
    }

    fn from_form(values: &FormValues) -> Result<Self, FieldErrors>;
}

/// Seeds an edit form from an existing entity.
pub trait ToForm {
    fn to_form(&self) -> FormValues;
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: &'static FormSchema,
    values: FormValues,
    client_errors: FieldErrors,
    backend_errors: FieldErrors,
    touched: BTreeSet<String>,
    phase: FormPhase,
    banner: Option<String>,
}

impl FormState {
    pub fn new(schema: &'static FormSchema) -> Self {
        Self::with_values(schema, FormValues::new())
    }

    pub fn with_values(schema: &'static FormSchema, values: FormValues) -> Self {
        Self {
            schema,
            values,
            client_errors: FieldErrors::new(),
            backend_errors: FieldErrors::new(),
            touched: BTreeSet::new(),
            phase: FormPhase::Pristine,
            banner: None,
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    /// Record a new value and validate it immediately.
    pub fn change(&mut self, field: &str, value: impl Into<String>) {
        self.values.set(field, value);
        if self.phase != FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
        self.backend_errors.remove(field);
        self.touched.insert(field.to_string());
        self.revalidate(field);

        // Confirmation fields depend on the field they mirror.
        let mirrored = Rule::Matches(self.schema_name_of(field));
        let dependents: Vec<&'static str> = self
            .schema
            .fields
            .iter()
            .filter(|spec| spec.rules.contains(&mirrored))
            .map(|spec| spec.name)
            .filter(|name| self.touched.contains(*name))
            .collect();
        for name in dependents {
            self.revalidate(name);
        }
    }

    pub fn blur(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.revalidate(field);
    }

    /// The message to display under `field`, server errors first.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.backend_errors
            .get(field)
            .or_else(|| self.client_errors.get(field))
    }

    /// Every visible error, server errors first.
    pub fn errors(&self) -> FieldErrors {
        let mut merged = FieldErrors::new();
        for (path, msg) in self.backend_errors.iter().chain(self.client_errors.iter()) {
            merged.insert(path, msg);
        }
        merged
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting
            && self.backend_errors.is_empty()
            && validate_all(self.schema, &self.values).is_empty()
    }

    /// Run every validator. On success enter `Submitting` and hand back the
    /// values; otherwise surface the errors and stay editable.
    pub fn begin_submit(&mut self) -> Option<FormValues> {
        if self.phase == FormPhase::Submitting {
            return None;
        }
        self.client_errors = validate_all(self.schema, &self.values);
        self.touched.extend(self.schema.field_names().map(str::to_string));
        if !self.client_errors.is_empty() || !self.backend_errors.is_empty() {
            self.phase = FormPhase::Editing;
            return None;
        }
        self.banner = None;
        self.phase = FormPhase::Submitting;
        Some(self.values.clone())
    }

    /// Full submit cycle for a typed payload: validate, convert, send, and
    /// record the outcome. `Ok(None)` means client-side validation blocked
    /// the submission and nothing was sent.
    pub fn submit_with<I, O>(
        &mut self,
        send: impl FnOnce(I) -> Result<O, ApiError>,
    ) -> Result<Option<O>, ApiError>
    where
        I: FormInput,
    {
        let Some(values) = self.begin_submit() else {
            return Ok(None);
        };
        let input = match I::from_form(&values) {
            Ok(input) => input,
            Err(errors) => {
                let err = ApiError::Validation(errors);
                self.complete_failure(&err);
                return Err(err);
            }
        };
        match send(input) {
            Ok(output) => {
                self.complete_success();
                Ok(Some(output))
            }
            Err(err) => {
                self.complete_failure(&err);
                Err(err)
            }
        }
    }

    pub fn complete_success(&mut self) {
        self.phase = FormPhase::Succeeded;
        self.backend_errors.clear();
        self.banner = None;
    }

    /// Distribute a failed submission: field errors under their fields,
    /// everything else in the banner.
    pub fn complete_failure(&mut self, err: &ApiError) {
        self.phase = FormPhase::BackendError;
        match err.field_errors() {
            Some(errors) => {
                let mut unplaced = Vec::new();
                for (path, msg) in errors.iter() {
                    if self.schema.field(path).is_some() {
                        self.backend_errors.insert(path, msg);
                    } else {
                        unplaced.push(msg.to_string());
                    }
                }
                self.banner = (!unplaced.is_empty()).then(|| unplaced.join("; "));
            }
            None => self.banner = Some(err.banner()),
        }
    }

    /// Discard all edits and errors.
    pub fn reset(&mut self, values: FormValues) {
        *self = Self::with_values(self.schema, values);
    }

    fn revalidate(&mut self, field: &str) {
        let value = self.values.get(field).to_string();
        match validate_field(self.schema, field, &value, &self.values) {
            Some(msg) => {
                self.client_errors.remove(field);
                self.client_errors.insert(field, msg);
            }
            None => {
                self.client_errors.remove(field);
            }
        }
    }

    fn schema_name_of(&self, field: &str) -> &'static str {
        self.schema.field(field).map(|f| f.name).unwrap_or("")
    }
}

/// Typed access to validated form values for `FormInput` impls.
pub(crate) struct Fields<'a> {
    values: &'a FormValues,
}

impl<'a> Fields<'a> {
    /// Validate the whole form against `schema` before any typed access.
    pub(crate) fn validated(schema: &FormSchema, values: &'a FormValues) -> Result<Self, FieldErrors> {
        let errors = validate_all(schema, values);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self { values })
    }

    pub(crate) fn text(&self, field: &str) -> String {
        self.values.get(field).trim().to_string()
    }

    pub(crate) fn optional(&self, field: &str) -> Option<String> {
        let value = self.values.get(field).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub(crate) fn parse<T: FromStr>(&self, field: &str) -> Result<T, FieldErrors> {
        self.values.get(field).trim().parse().map_err(|_| invalid(field))
    }

    /// Parse an optional field; empty means `None`.
    pub(crate) fn parse_opt<T: FromStr>(&self, field: &str) -> Result<Option<T>, FieldErrors> {
        match self.optional(field) {
            Some(value) => value.parse().map(Some).map_err(|_| invalid(field)),
            None => Ok(None),
        }
    }

    pub(crate) fn parse_or<T: FromStr>(&self, field: &str, default: T) -> Result<T, FieldErrors> {
        Ok(self.parse_opt(field)?.unwrap_or(default))
    }

    /// Comma-separated ids.
    pub(crate) fn ids(&self, field: &str) -> Result<Vec<Uuid>, FieldErrors> {
        self.values
            .get(field)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Uuid::parse_str(s).map_err(|_| invalid(field)))
            .collect()
    }
}

fn invalid(field: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, format!("{field} is invalid"));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::error::AuthPolicy;
    use crate::schemas;

    fn filled_category() -> FormState {
        let mut form = FormState::new(&schemas::CATEGORY);
        form.change("name", "Dogs");
        form
    }

    #[test]
    fn starts_pristine_and_blocked() {
        let form = FormState::new(&schemas::CATEGORY);
        assert_eq!(form.phase(), FormPhase::Pristine);
        assert!(!form.can_submit());
        assert!(form.error("name").is_none());
    }

    #[test]
    fn change_validates_immediately() {
        let mut form = FormState::new(&schemas::CATEGORY);
        form.change("name", "Do");
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.error("name"), Some("Name must be at least 3 characters"));
        form.change("name", "Dog");
        assert!(form.error("name").is_none());
        assert!(form.can_submit());
    }

    #[test]
    fn blur_reports_required() {
        let mut form = FormState::new(&schemas::CATEGORY);
        form.blur("name");
        assert_eq!(form.error("name"), Some("Name is required"));
    }

    #[test]
    fn submit_with_errors_stays_editable() {
        let mut form = FormState::new(&schemas::CLIENT);
        assert!(form.begin_submit().is_none());
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.errors().len(), 4);
    }

    #[test]
    fn submitting_blocks_a_second_submit() {
        let mut form = filled_category();
        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none());
    }

    #[test]
    fn backend_field_errors_take_precedence() {
        let mut form = filled_category();
        form.begin_submit().unwrap();
        let err = ApiError::from_response(
            &HttpResponse::new(422, r#"{"errors":[{"path":"name","msg":"required"}]}"#),
            AuthPolicy::Session,
        );
        form.complete_failure(&err);

        assert_eq!(form.phase(), FormPhase::BackendError);
        assert_eq!(form.error("name"), Some("required"));
        assert!(form.banner().is_none());
        assert!(!form.can_submit());

        form.change("name", "Cats");
        assert!(form.error("name").is_none());
        assert!(form.can_submit());
    }

    #[test]
    fn unknown_backend_fields_go_to_banner() {
        let mut form = filled_category();
        form.begin_submit().unwrap();
        let err = ApiError::from_response(
            &HttpResponse::new(422, r#"{"errors":[{"path":"tenant","msg":"tenant is locked"}]}"#),
            AuthPolicy::Session,
        );
        form.complete_failure(&err);
        assert_eq!(form.banner(), Some("tenant is locked"));
        assert!(form.can_submit());
    }

    #[test]
    fn generic_errors_go_to_banner() {
        let mut form = filled_category();
        form.begin_submit().unwrap();
        form.complete_failure(&ApiError::Api {
            status: 500,
            message: "database unavailable".to_string(),
        });
        assert_eq!(form.banner(), Some("database unavailable"));
        form.dismiss_banner();
        assert!(form.banner().is_none());
    }

    #[test]
    fn success_clears_state() {
        let mut form = filled_category();
        form.begin_submit().unwrap();
        form.complete_success();
        assert_eq!(form.phase(), FormPhase::Succeeded);
    }

    #[test]
    fn submit_with_sends_typed_payload() {
        let mut form = filled_category();
        let sent = form
            .submit_with(|input: crate::types::CategoryInput| Ok::<_, ApiError>(input.name))
            .unwrap();
        assert_eq!(sent.as_deref(), Some("Dogs"));
        assert_eq!(form.phase(), FormPhase::Succeeded);
    }

    #[test]
    fn submit_with_skips_invalid_forms() {
        let mut form = FormState::new(&schemas::CATEGORY);
        let mut called = false;
        let sent = form
            .submit_with(|_: crate::types::CategoryInput| {
                called = true;
                Ok::<_, ApiError>(())
            })
            .unwrap();
        assert!(sent.is_none());
        assert!(!called);
    }

    #[test]
    fn editing_password_revalidates_confirmation() {
        let mut form = FormState::new(&schemas::RESET_PASSWORD);
        form.change("password", "longenough");
        form.change("confirmPassword", "longenough");
        assert!(form.error("confirmPassword").is_none());
        form.change("password", "different1");
        assert_eq!(
            form.error("confirmPassword"),
            Some("Password confirmation does not match")
        );
    }
}
