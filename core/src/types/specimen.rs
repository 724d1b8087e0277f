use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActiveStatus;
use crate::listing::ListItem;

/// An animal boarded or treated by the business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub color: String,
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub estado: ActiveStatus,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub sede_id: Option<Uuid>,
    /// Owner. Specimens housed by the business itself have none.
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sede_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenInput {
    pub name: String,
    pub breed: String,
    pub color: String,
    pub birth_date: NaiveDate,
    pub estado: ActiveStatus,
    pub category_id: Uuid,
    pub sede_id: Uuid,
    pub client_id: Option<Uuid>,
}

/// Payload of `PATCH /specimens/:id/move`. `None` unsets the relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSpecimen {
    pub category_id: Option<Uuid>,
    pub sede_id: Option<Uuid>,
}

impl ListItem for Specimen {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.breed.clone(),
            self.color.clone(),
            self.category_name.clone().unwrap_or_default(),
            self.sede_name.clone().unwrap_or_default(),
            self.client_name.clone().unwrap_or_default(),
            self.estado.to_string(),
        ]
    }
}
