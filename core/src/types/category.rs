use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ActiveStatus;
use crate::listing::ListItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub estado: ActiveStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub estado: ActiveStatus,
}

impl ListItem for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.name.clone(), self.estado.to_string()]
    }
}
