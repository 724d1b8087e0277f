//! Recurring care records attached to a specimen.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CareStatus;
use crate::listing::ListItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: Uuid,
    pub specimen_id: Uuid,
    pub name: String,
    pub dose: String,
    /// Administration time, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub estado: CareStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specimen_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineInput {
    pub specimen_id: Uuid,
    pub name: String,
    pub dose: String,
    pub time: String,
    pub estado: CareStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feeding {
    pub id: Uuid,
    pub specimen_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub time: String,
    #[serde(default)]
    pub estado: CareStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specimen_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingInput {
    pub specimen_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub time: String,
    pub estado: CareStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: Uuid,
    pub specimen_id: Uuid,
    pub name: String,
    pub dose: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub estado: CareStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specimen_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationInput {
    pub specimen_id: Uuid,
    pub name: String,
    pub dose: String,
    pub date: NaiveDate,
    pub estado: CareStatus,
}

impl ListItem for Medicine {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.dose.clone(),
            self.time.clone(),
            self.specimen_name.clone().unwrap_or_default(),
            self.estado.to_string(),
        ]
    }
}

impl ListItem for Feeding {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.quantity.clone(),
            self.time.clone(),
            self.specimen_name.clone().unwrap_or_default(),
            self.estado.to_string(),
        ]
    }
}

impl ListItem for Vaccination {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.dose.clone(),
            self.date.to_string(),
            self.specimen_name.clone().unwrap_or_default(),
            self.estado.to_string(),
        ]
    }
}
