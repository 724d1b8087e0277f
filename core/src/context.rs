//! Long-lived shared state: the signed-in user and the contract list.
//!
//! Both providers own a `Transport` and run complete round-trips, so a host
//! can hold one of each for the lifetime of the application.

use uuid::Uuid;

use crate::auth::AuthClient;
use crate::client::ResourceClient;
use crate::contract_form::ContractForm;
use crate::error::ApiError;
use crate::form::FormState;
use crate::http::{HttpRequest, HttpResponse};
use crate::listing::ListView;
use crate::resource::Contracts;
use crate::transport::Transport;
use crate::types::{ChangePassword, Contract, ContractInput, ForgotPassword, LoginRequest, ResetPassword, User};

/// Who is signed in.
pub struct AuthContext<T> {
    auth: AuthClient,
    transport: T,
    loading: bool,
}

impl<T: Transport> AuthContext<T> {
    pub fn new(auth: AuthClient, transport: T) -> Self {
        Self {
            auth,
            transport,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<User> {
        self.auth.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.session().is_authenticated()
    }

    /// True while `restore` is verifying a stored token.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Re-establish a previous session from the token store and confirm it
    /// with `currentuser`. Any failure leaves the user signed out.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn restore(&mut self) -> Option<User> {
        if !self.auth.session().restore() {
            return None;
        }
        self.loading = true;
        let request = self.auth.build_current_user();
        let result = self
            .transport
            .execute(request)
            .and_then(|response| self.auth.parse_current_user(response));
        self.loading = false;
        match result {
            Ok(user) => {
                tracing::info!(user = %user.username, "session restored");
                Some(user)
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored token rejected");
                self.auth.session().clear();
                None
            }
        }
    }

    /// Submit the login form. `Ok(None)` when validation blocked it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn login(&mut self, form: &mut FormState) -> Result<Option<User>, ApiError> {
        let auth = &self.auth;
        let transport = &self.transport;
        form.submit_with(|credentials: LoginRequest| {
            let request = auth.build_login(&credentials)?;
            auth.parse_login(transport.execute(request)?)
        })
    }

    pub fn logout(&mut self) {
        self.auth.logout();
    }

    /// Returns `Ok(false)` when validation blocked the submission.
    pub fn change_password(&mut self, form: &mut FormState) -> Result<bool, ApiError> {
        let auth = &self.auth;
        let transport = &self.transport;
        let sent = form.submit_with(|input: ChangePassword| {
            let request = auth.build_change_password(&input)?;
            auth.parse_change_password(transport.execute(request)?)
        })?;
        Ok(sent.is_some())
    }

    /// The server's acknowledgement, or `None` when validation blocked it.
    pub fn forgot_password(&mut self, form: &mut FormState) -> Result<Option<String>, ApiError> {
        let auth = &self.auth;
        let transport = &self.transport;
        let ack = form.submit_with(|input: ForgotPassword| {
            let request = auth.build_forgot_password(&input)?;
            auth.parse_forgot_password(transport.execute(request)?)
        })?;
        Ok(ack.map(|m| m.message))
    }

    pub fn reset_password(&mut self, token: &str, form: &mut FormState) -> Result<Option<String>, ApiError> {
        let auth = &self.auth;
        let transport = &self.transport;
        let ack = form.submit_with(|input: ResetPassword| {
            let request = auth.build_reset_password(token, &input)?;
            auth.parse_reset_password(transport.execute(request)?)
        })?;
        Ok(ack.map(|m| m.message))
    }
}

/// Contract list shared between the contract page and anything that shows
/// contracts. Mutations apply the server's answer locally instead of
/// refetching.
pub struct ContractsContext<T> {
    client: ResourceClient<Contracts>,
    transport: T,
    list: ListView<Contract>,
    banner: Option<String>,
}

impl<T: Transport> ContractsContext<T> {
    pub fn new(client: ResourceClient<Contracts>, transport: T, page_size: usize) -> Self {
        Self {
            client,
            transport,
            list: ListView::with_page_size(page_size),
            banner: None,
        }
    }

    pub fn list(&self) -> &ListView<Contract> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<Contract> {
        &mut self.list
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn fetch(&mut self) -> Result<(), ApiError> {
        let request = self.client.build_list();
        match self.round_trip(request).and_then(|r| self.client.parse_list(r)) {
            Ok(contracts) => {
                self.list.replace_items(contracts);
                self.banner = None;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub fn create(&mut self, form: &mut ContractForm) -> Result<Option<Contract>, ApiError> {
        self.save(form, None)
    }

    pub fn update(&mut self, id: Uuid, form: &mut ContractForm) -> Result<Option<Contract>, ApiError> {
        self.save(form, Some(id))
    }

    /// Remove the contract immediately and put it back if the server
    /// refuses.
    #[tracing::instrument(level = "debug", skip_all, fields(%id))]
    pub fn delete(&mut self, id: Uuid) -> Result<(), ApiError> {
        let removed = self.list.remove(id);
        let request = self.client.build_delete(id);
        match self.round_trip(request).and_then(|r| self.client.parse_delete(r)) {
            Ok(()) => Ok(()),
            Err(err) => {
                if let Some((index, contract)) = removed {
                    tracing::debug!(index, "restoring contract after failed delete");
                    self.list.insert_at(index, contract);
                }
                Err(self.report(err))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(?editing))]
    fn save(&mut self, dialog: &mut ContractForm, editing: Option<Uuid>) -> Result<Option<Contract>, ApiError> {
        let Some(input) = dialog.begin_submit() else {
            return Ok(None);
        };
        match self.send(&input, editing) {
            Ok(contract) => {
                dialog.form_mut().complete_success();
                self.list.upsert(contract.clone());
                Ok(Some(contract))
            }
            Err(err) => {
                dialog.form_mut().complete_failure(&err);
                Err(err)
            }
        }
    }

    fn send(&self, input: &ContractInput, editing: Option<Uuid>) -> Result<Contract, ApiError> {
        let request = match editing {
            Some(id) => self.client.build_update(id, input)?,
            None => self.client.build_create(input)?,
        };
        let response = self.round_trip(request)?;
        match editing {
            Some(_) => self.client.parse_update(response),
            None => self.client.parse_create(response),
        }
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }

    fn report(&mut self, err: ApiError) -> ApiError {
        tracing::warn!(error = %err, "contract request failed");
        self.banner = Some(err.banner());
        err
    }
}
