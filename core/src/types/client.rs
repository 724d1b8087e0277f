use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listing::ListItem;

/// A customer who owns specimens and signs contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub nombre: String,
    pub documento: String,
    pub email: String,
    #[serde(default)]
    pub celular: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub nombre: String,
    pub documento: String,
    pub email: String,
    pub celular: Option<String>,
}

impl ListItem for Client {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.nombre.clone(), self.documento.clone(), self.email.clone()];
        fields.extend(self.celular.clone());
        fields
    }
}
