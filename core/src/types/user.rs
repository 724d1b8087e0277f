use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Role;
use crate::listing::ListItem;

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub role: Role,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub documento: Option<String>,
}

/// Create/update payload. `password` is only sent when creating or
/// explicitly resetting an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub nombre_completo: String,
    pub role: Role,
    pub celular: Option<String>,
    pub documento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ListItem for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.email.clone(),
            self.nombre_completo.clone(),
            self.role.to_string(),
        ]
    }
}
