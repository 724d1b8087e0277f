//! Contract dialog with client auto-association.
//!
//! Choosing a specimen fills the client from the specimen's recorded owner
//! and locks the client selector. A specimen without an owner clears the
//! client and unlocks it. Switching to a specimen with another owner
//! replaces the client without asking.

use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::form::{FormInput, FormState, ToForm};
use crate::schemas;
use crate::types::{Contract, ContractInput, Specimen};
use crate::validation::FormValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the client is determined by the selected specimen")]
pub struct ClientLocked;

#[derive(Debug, Clone)]
pub struct ContractForm {
    form: FormState,
    /// Owner of the selected specimen, while it dictates the client.
    locked_owner: Option<Uuid>,
}

impl Default for ContractForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractForm {
    pub fn new() -> Self {
        let values = FormValues::new().with("estado", "active");
        Self {
            form: FormState::with_values(&schemas::CONTRACT, values),
            locked_owner: None,
        }
    }

    /// Edit an existing contract. The client stays selectable until a
    /// specimen is picked again.
    pub fn edit(contract: &Contract) -> Self {
        Self {
            form: FormState::with_values(&schemas::CONTRACT, contract.to_form()),
            locked_owner: None,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Raw field access. A client written here while the lock holds is
    /// put back to the specimen owner on submit.
    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn is_client_locked(&self) -> bool {
        self.locked_owner.is_some()
    }

    pub fn client_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.form.value("clientId")).ok()
    }

    pub fn select_specimen(&mut self, specimen: &Specimen) {
        self.form.change("specimenId", specimen.id.to_string());
        match specimen.client_id {
            Some(owner) => {
                if self.client_id() != Some(owner) {
                    tracing::debug!(specimen = %specimen.id, client = %owner, "client filled from specimen owner");
                }
                self.form.change("clientId", owner.to_string());
                self.locked_owner = Some(owner);
            }
            None => {
                self.form.change("clientId", "");
                self.locked_owner = None;
            }
        }
    }

    /// Manual client choice; refused while the specimen dictates the client.
    pub fn select_client(&mut self, client: Uuid) -> Result<(), ClientLocked> {
        if self.locked_owner.is_some() {
            return Err(ClientLocked);
        }
        self.form.change("clientId", client.to_string());
        Ok(())
    }

    pub fn set_services(&mut self, services: &[Uuid]) {
        let joined: Vec<String> = services.iter().map(Uuid::to_string).collect();
        self.form.change("serviceIds", joined.join(","));
    }

    /// Validate and enter `Submitting`, yielding the payload.
    pub fn begin_submit(&mut self) -> Option<ContractInput> {
        if let Some(owner) = self.locked_owner {
            if self.client_id() != Some(owner) {
                tracing::warn!(client = %owner, "locked client was overwritten; restoring specimen owner");
                self.form.change("clientId", owner.to_string());
            }
        }
        let values = self.form.begin_submit()?;
        match ContractInput::from_form(&values) {
            Ok(input) => Some(input),
            Err(errors) => {
                let err = ApiError::Validation(errors);
                self.form.complete_failure(&err);
                None
            }
        }
    }
}
