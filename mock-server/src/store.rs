//! Collections, their field rules and the in-memory record store.
//!
//! Records are kept as JSON objects exactly as the client sends them, plus
//! `id` and any server-side defaults. Names of related records are joined in
//! on read so the client sees the denormalized shape the real backend
//! returns.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::FieldError;

pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Specimens,
    Categories,
    Sedes,
    Clients,
    Contracts,
    Services,
    Medicines,
    Feedings,
    Vaccinations,
    Users,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Text,
    Date,
    Time,
    Number,
    OneOf(&'static [&'static str]),
    Ref(Collection),
    RefList(Collection),
}

#[derive(Debug, Clone, Copy)]
struct Field {
    name: &'static str,
    kind: Kind,
    required: bool,
    default: Option<&'static str>,
}

const fn required(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: true,
        default: None,
    }
}

const fn optional(name: &'static str, kind: Kind) -> Field {
    Field {
        name,
        kind,
        required: false,
        default: None,
    }
}

const fn defaulted(name: &'static str, kind: Kind, default: &'static str) -> Field {
    Field {
        name,
        kind,
        required: false,
        default: Some(default),
    }
}

const ACTIVE: &[&str] = &["active", "inactive"];
const CONTRACT: &[&str] = &["active", "finalized", "cancelled"];
const CARE: &[&str] = &["scheduled", "administered", "cancelled"];
const ROLES: &[&str] = &["admin", "employee"];

impl Collection {
    pub const ALL: [Collection; 10] = [
        Collection::Specimens,
        Collection::Categories,
        Collection::Sedes,
        Collection::Clients,
        Collection::Contracts,
        Collection::Services,
        Collection::Medicines,
        Collection::Feedings,
        Collection::Vaccinations,
        Collection::Users,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Collection::Specimens => "specimens",
            Collection::Categories => "specimen-categories",
            Collection::Sedes => "sedes",
            Collection::Clients => "clients",
            Collection::Contracts => "contracts",
            Collection::Services => "services",
            Collection::Medicines => "medicines",
            Collection::Feedings => "alimentaciones",
            Collection::Vaccinations => "vacunaciones",
            Collection::Users => "users",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.path() == path)
    }

    /// Field used as the display name when this collection is referenced.
    fn display_field(self) -> &'static str {
        match self {
            Collection::Sedes => "NombreSede",
            Collection::Clients | Collection::Services => "nombre",
            Collection::Users => "username",
            _ => "name",
        }
    }

    /// `PATCH /:collection/:id/:action` body field for status changes.
    pub fn status_action(self, action: &str) -> Option<&'static str> {
        match (self, action) {
            (Collection::Services, "status") => Some("status"),
            (Collection::Medicines, "estado") => Some("estado"),
            _ => None,
        }
    }

    fn stamps_creation(self) -> bool {
        matches!(self, Collection::Medicines | Collection::Feedings | Collection::Vaccinations)
    }

    fn fields(self) -> &'static [Field] {
        use Kind::*;

        const SPECIMENS: &[Field] = &[
            required("name", Text),
            required("breed", Text),
            required("color", Text),
            required("birthDate", Date),
            defaulted("estado", OneOf(ACTIVE), "active"),
            required("categoryId", Ref(Collection::Categories)),
            required("sedeId", Ref(Collection::Sedes)),
            optional("clientId", Ref(Collection::Clients)),
        ];
        const CATEGORIES: &[Field] = &[required("name", Text), defaulted("estado", OneOf(ACTIVE), "active")];
        const SEDES: &[Field] = &[required("NombreSede", Text)];
        const CLIENTS: &[Field] = &[
            required("nombre", Text),
            required("documento", Text),
            required("email", Text),
            optional("celular", Text),
        ];
        const CONTRACTS: &[Field] = &[
            required("clientId", Ref(Collection::Clients)),
            required("specimenId", Ref(Collection::Specimens)),
            required("fechaInicio", Date),
            required("precioMensual", Number),
            defaulted("estado", OneOf(CONTRACT), "active"),
            optional("serviceIds", RefList(Collection::Services)),
        ];
        const SERVICES: &[Field] = &[
            required("nombre", Text),
            required("descripcion", Text),
            optional("imagen", Text),
            defaulted("status", OneOf(ACTIVE), "active"),
        ];
        const MEDICINES: &[Field] = &[
            required("name", Text),
            required("dose", Text),
            required("time", Time),
            defaulted("estado", OneOf(CARE), "scheduled"),
            required("specimenId", Ref(Collection::Specimens)),
        ];
        const FEEDINGS: &[Field] = &[
            required("name", Text),
            required("quantity", Text),
            required("time", Time),
            defaulted("estado", OneOf(CARE), "scheduled"),
            required("specimenId", Ref(Collection::Specimens)),
        ];
        const VACCINATIONS: &[Field] = &[
            required("name", Text),
            required("dose", Text),
            required("date", Date),
            defaulted("estado", OneOf(CARE), "scheduled"),
            required("specimenId", Ref(Collection::Specimens)),
        ];
        const USERS: &[Field] = &[
            required("username", Text),
            required("email", Text),
            required("nombreCompleto", Text),
            required("role", OneOf(ROLES)),
            optional("celular", Text),
            optional("documento", Text),
        ];

        match self {
            Collection::Specimens => SPECIMENS,
            Collection::Categories => CATEGORIES,
            Collection::Sedes => SEDES,
            Collection::Clients => CLIENTS,
            Collection::Contracts => CONTRACTS,
            Collection::Services => SERVICES,
            Collection::Medicines => MEDICINES,
            Collection::Feedings => FEEDINGS,
            Collection::Vaccinations => VACCINATIONS,
            Collection::Users => USERS,
        }
    }

    /// Read-side joins: (reference field, name field to add).
    fn joins(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Collection::Specimens => &[
                ("categoryId", "categoryName"),
                ("sedeId", "sedeName"),
                ("clientId", "clientName"),
            ],
            Collection::Contracts => &[("clientId", "clientName"), ("specimenId", "specimenName")],
            Collection::Medicines | Collection::Feedings | Collection::Vaccinations => &[("specimenId", "specimenName")],
            _ => &[],
        }
    }

    fn referenced(self, field: &str) -> Option<Collection> {
        self.fields().iter().find(|f| f.name == field).and_then(|f| match f.kind {
            Kind::Ref(target) | Kind::RefList(target) => Some(target),
            _ => None,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Collection::Specimens => "Specimen",
            Collection::Categories => "Category",
            Collection::Sedes => "Sede",
            Collection::Clients => "Client",
            Collection::Contracts => "Contract",
            Collection::Services => "Service",
            Collection::Medicines => "Medicine",
            Collection::Feedings => "Feeding",
            Collection::Vaccinations => "Vaccination",
            Collection::Users => "User",
        }
    }
}

/// Every collection, insertion-ordered.
#[derive(Debug, Default)]
pub struct Store {
    records: HashMap<Collection, Vec<Record>>,
}

impl Store {
    pub fn list(&self, collection: Collection) -> Vec<Record> {
        self.records
            .get(&collection)
            .map(|records| records.iter().map(|r| self.present(collection, r)).collect())
            .unwrap_or_default()
    }

    pub fn get(&self, collection: Collection, id: Uuid) -> Option<Record> {
        self.find(collection, id).map(|r| self.present(collection, r))
    }

    pub fn find(&self, collection: Collection, id: Uuid) -> Option<&Record> {
        let id = id.to_string();
        self.records
            .get(&collection)?
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
    }

    pub fn find_by(&self, collection: Collection, field: &str, value: &str) -> Option<&Record> {
        self.records
            .get(&collection)?
            .iter()
            .find(|r| r.get(field).and_then(Value::as_str) == Some(value))
    }

    /// Validate `body` and store it under a fresh id.
    pub fn insert(&mut self, collection: Collection, body: &Value) -> Result<Record, Vec<FieldError>> {
        let mut record = self.validate(collection, body)?;
        let id = Uuid::new_v4();
        record.insert("id".to_string(), Value::String(id.to_string()));
        if collection.stamps_creation() {
            record.insert("createdAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        self.records.entry(collection).or_default().push(record);
        Ok(self.get(collection, id).unwrap_or_default())
    }

    /// Validate `body` and replace the stored fields. `Ok(None)` if the id
    /// is unknown.
    pub fn replace(&mut self, collection: Collection, id: Uuid, body: &Value) -> Result<Option<Record>, Vec<FieldError>> {
        if self.find(collection, id).is_none() {
            return Ok(None);
        }
        let fields = self.validate(collection, body)?;
        self.modify(collection, id, |record| record.extend(fields));
        Ok(self.get(collection, id))
    }

    /// Apply `f` to the stored record. Returns whether it existed.
    pub fn modify(&mut self, collection: Collection, id: Uuid, f: impl FnOnce(&mut Record)) -> bool {
        let id = id.to_string();
        let found = self
            .records
            .get_mut(&collection)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
            });
        match found {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, collection: Collection, id: Uuid) -> bool {
        let id = id.to_string();
        let Some(records) = self.records.get_mut(&collection) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
        records.len() != before
    }

    /// Whether any record of any collection points at `id` in `target`.
    pub fn is_referenced(&self, target: Collection, id: Uuid) -> bool {
        let id = Value::String(id.to_string());
        self.records.iter().any(|(collection, records)| {
            records.iter().any(|record| {
                record.iter().any(|(field, value)| {
                    collection.referenced(field) == Some(target)
                        && (value == &id || value.as_array().is_some_and(|ids| ids.contains(&id)))
                })
            })
        })
    }

    /// Check a reference value against the target collection.
    pub fn check_ref(&self, target: Collection, value: &Value) -> Result<(), &'static str> {
        let id = value.as_str().and_then(|s| Uuid::parse_str(s).ok()).ok_or("invalid id")?;
        self.find(target, id).map(|_| ()).ok_or("not found")
    }

    /// Field errors `body` would get on insert, without storing anything.
    pub fn check_fields(&self, collection: Collection, body: &Value) -> Vec<FieldError> {
        self.validate(collection, body).err().unwrap_or_default()
    }

    /// Validate a single field value, as used by the status actions.
    pub fn check_value(&self, collection: Collection, field: &str, value: &Value) -> Result<(), &'static str> {
        let spec = collection
            .fields()
            .iter()
            .find(|f| f.name == field)
            .ok_or("unknown field")?;
        if is_blank(value) {
            return Err("required");
        }
        self.check(spec.kind, value)
    }

    fn validate(&self, collection: Collection, body: &Value) -> Result<Record, Vec<FieldError>> {
        let Some(input) = body.as_object() else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };
        let mut record = Record::new();
        let mut errors = Vec::new();
        for field in collection.fields() {
            let value = input.get(field.name).filter(|v| !is_blank(v));
            let Some(value) = value else {
                match (field.required, field.default) {
                    (true, _) => errors.push(FieldError::new(field.name, "required")),
                    (false, Some(default)) => {
                        record.insert(field.name.to_string(), Value::String(default.to_string()));
                    }
                    (false, None) => {
                        let empty = match field.kind {
                            Kind::RefList(_) => Value::Array(Vec::new()),
                            _ => Value::Null,
                        };
                        record.insert(field.name.to_string(), empty);
                    }
                }
                continue;
            };
            match self.check(field.kind, value) {
                Ok(()) => {
                    record.insert(field.name.to_string(), value.clone());
                }
                Err(msg) => errors.push(FieldError::new(field.name, msg)),
            }
        }
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    fn check(&self, kind: Kind, value: &Value) -> Result<(), &'static str> {
        match kind {
            Kind::Text => value.as_str().map(|_| ()).ok_or("must be a string"),
            Kind::Date => value
                .as_str()
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .map(|_| ())
                .ok_or("invalid date"),
            Kind::Time => value
                .as_str()
                .and_then(|s| NaiveTime::parse_from_str(s, "%H:%M").ok())
                .map(|_| ())
                .ok_or("invalid time"),
            Kind::Number => match value.as_f64() {
                Some(n) if n >= 0.0 => Ok(()),
                Some(_) => Err("must not be negative"),
                None => Err("must be a number"),
            },
            Kind::OneOf(allowed) => value
                .as_str()
                .filter(|s| allowed.contains(s))
                .map(|_| ())
                .ok_or("invalid value"),
            Kind::Ref(target) => self.check_ref(target, value),
            Kind::RefList(target) => {
                let ids = value.as_array().ok_or("must be a list")?;
                ids.iter().try_for_each(|id| self.check_ref(target, id))
            }
        }
    }

    fn present(&self, collection: Collection, record: &Record) -> Record {
        let mut shown = record.clone();
        for (field, name_field) in collection.joins() {
            let Some(target) = collection.referenced(field) else {
                continue;
            };
            let name = record
                .get(*field)
                .and_then(Value::as_str)
                .and_then(|id| Uuid::parse_str(id).ok())
                .and_then(|id| self.find(target, id))
                .and_then(|related| related.get(target.display_field()).cloned())
                .unwrap_or(Value::Null);
            shown.insert(name_field.to_string(), name);
        }
        shown
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
