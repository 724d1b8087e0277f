use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContractStatus;
use crate::listing::ListItem;

/// A recurring service agreement between a client and one specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub client_id: Uuid,
    pub specimen_id: Uuid,
    pub fecha_inicio: NaiveDate,
    pub precio_mensual: f64,
    #[serde(default)]
    pub estado: ContractStatus,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specimen_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInput {
    pub client_id: Uuid,
    pub specimen_id: Uuid,
    pub fecha_inicio: NaiveDate,
    pub precio_mensual: f64,
    pub estado: ContractStatus,
    pub service_ids: Vec<Uuid>,
}

impl ListItem for Contract {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.client_name.clone().unwrap_or_default(),
            self.specimen_name.clone().unwrap_or_default(),
            self.estado.to_string(),
            self.precio_mensual.to_string(),
            self.fecha_inicio.to_string(),
        ]
    }
}
