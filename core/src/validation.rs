//! Pure per-field validators driven by static rule tables.
//!
//! Every form is described by a `FormSchema`: a list of fields, each with a
//! fixed rule list. `validate_field` is what the UI runs on change and blur;
//! `validate_all` is the exhaustive pass on submit. Rules other than
//! `Required` only apply to non-empty values, and whitespace-only input
//! counts as empty.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldErrors;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    static ref DOCUMENT_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{5,15}$").unwrap();
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref TIME_REGEX: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();
    static ref URL_REGEX: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
}

/// One constraint on a field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    /// Inclusive numeric range.
    Range { min: f64, max: f64 },
    Email,
    Phone,
    Document,
    /// `YYYY-MM-DD` naming a real calendar day.
    Date,
    /// A date that is today or earlier. Implies `Date`.
    PastDate,
    /// `HH:MM`, 24-hour clock.
    Time,
    Url,
    /// Reference to another entity by id.
    Id,
    OneOf(&'static [&'static str]),
    /// Must equal the value of another field (password confirmation).
    Matches(&'static str),
    /// Required whenever the named field is filled in.
    RequiredWith(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        self.rules.contains(&Rule::Required)
    }
}

/// Field rule table for one form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

/// Raw string values of a form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `field`, or `""` when unset.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Validate one field. Returns the first failing rule's message.
///
/// Fields the schema does not know are always valid.
pub fn validate_field(schema: &FormSchema, field: &str, value: &str, form: &FormValues) -> Option<String> {
    let spec = schema.field(field)?;
    let value = value.trim();
    if value.is_empty() {
        let required = spec.is_required()
            || spec.rules.iter().any(|rule| match rule {
                Rule::RequiredWith(other) => !form.get(other).trim().is_empty(),
                _ => false,
            });
        return required.then(|| format!("{} is required", spec.label));
    }
    spec.rules
        .iter()
        .find_map(|rule| check_rule(rule, spec.label, value, form))
}

/// Validate every field of the schema against `form`.
pub fn validate_all(schema: &FormSchema, form: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for spec in schema.fields {
        if let Some(msg) = validate_field(schema, spec.name, form.get(spec.name), form) {
            errors.insert(spec.name, msg);
        }
    }
    errors
}

fn check_rule(rule: &Rule, label: &str, value: &str, form: &FormValues) -> Option<String> {
    match *rule {
        Rule::Required | Rule::RequiredWith(_) => None,
        Rule::MinLen(n) => {
            (value.chars().count() < n).then(|| format!("{label} must be at least {n} characters"))
        }
        Rule::MaxLen(n) => {
            (value.chars().count() > n).then(|| format!("{label} must be at most {n} characters"))
        }
        Rule::Range { min, max } => match value.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= min && n <= max => None,
            Ok(n) if n.is_finite() => Some(format!("{label} must be between {min} and {max}")),
            _ => Some(format!("{label} must be a number")),
        },
        Rule::Email => (!EMAIL_REGEX.is_match(value)).then(|| format!("{label} must be a valid email")),
        Rule::Phone => {
            (!PHONE_REGEX.is_match(value)).then(|| format!("{label} must contain 7 to 15 digits"))
        }
        Rule::Document => (!DOCUMENT_REGEX.is_match(value))
            .then(|| format!("{label} must be 5 to 15 letters or digits")),
        Rule::Date => parse_date(value)
            .is_none()
            .then(|| format!("{label} must be a valid date (YYYY-MM-DD)")),
        Rule::PastDate => match parse_date(value) {
            None => Some(format!("{label} must be a valid date (YYYY-MM-DD)")),
            Some(date) if date > Local::now().date_naive() => {
                Some(format!("{label} cannot be in the future"))
            }
            Some(_) => None,
        },
        Rule::Time => (!TIME_REGEX.is_match(value)).then(|| format!("{label} must be a time (HH:MM)")),
        Rule::Url => (!URL_REGEX.is_match(value)).then(|| format!("{label} must be a valid URL")),
        Rule::Id => Uuid::parse_str(value)
            .is_err()
            .then(|| format!("Select a valid {}", label.to_lowercase())),
        Rule::OneOf(allowed) => (!allowed.iter().any(|a| a.eq_ignore_ascii_case(value)))
            .then(|| format!("{label} must be one of: {}", allowed.join(", "))),
        Rule::Matches(other) => (value != form.get(other).trim()).then(|| format!("{label} does not match")),
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
