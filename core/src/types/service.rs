use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActiveStatus;
use crate::listing::ListItem;

/// A service that can be bundled into contracts (grooming, daycare...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: String,
    /// Image URL served by the backend.
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub status: ActiveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub nombre: String,
    pub descripcion: String,
    pub imagen: Option<String>,
    pub status: ActiveStatus,
}

impl ListItem for Service {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.descripcion.clone(),
            self.status.to_string(),
        ]
    }
}
