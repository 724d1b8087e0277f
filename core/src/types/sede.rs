use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listing::ListItem;

/// A physical location where specimens are housed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sede {
    pub id: Uuid,
    #[serde(rename = "NombreSede")]
    pub nombre_sede: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SedeInput {
    #[serde(rename = "NombreSede")]
    pub nombre_sede: String,
}

impl ListItem for Sede {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.nombre_sede.clone()]
    }
}
