//! Generic page controller shared by every entity screen.
//!
//! # Design
//! One `ResourceController<R, T>` replaces the per-entity page logic: it
//! fetches the full list on load, serves search and pagination from memory,
//! opens create/edit forms, and runs mutations through the `Transport`.
//! Creates, updates and deletes refetch the list; status toggles patch the
//! affected row in place. Failures land in the page banner and, for form
//! submissions, in the form itself.

use uuid::Uuid;

use crate::client::ResourceClient;
use crate::error::ApiError;
use crate::form::{FormInput, FormState, ToForm};
use crate::http::{HttpRequest, HttpResponse};
use crate::listing::{ListItem, ListView};
use crate::resource::{Resource, Specimens, StatusResource};
use crate::specimen_move::{MoveRejected, MoveSpecimenForm};
use crate::transport::Transport;
use crate::types::Specimen;

pub struct ResourceController<R: Resource, T> {
    client: ResourceClient<R>,
    transport: T,
    list: ListView<R::Entity>,
    banner: Option<String>,
}

impl<R: Resource, T: Transport> ResourceController<R, T> {
    pub fn new(client: ResourceClient<R>, transport: T, page_size: usize) -> Self {
        Self {
            client,
            transport,
            list: ListView::with_page_size(page_size),
            banner: None,
        }
    }

    pub fn client(&self) -> &ResourceClient<R> {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list(&self) -> &ListView<R::Entity> {
        &self.list
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// True once a 401/403 has torn the session down; the host should show
    /// the login screen.
    pub fn login_required(&self) -> bool {
        !self.client.api().session().is_authenticated()
    }

    /// Fetch the full list, replacing what is held. On failure the previous
    /// list is kept and the error goes to the banner.
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %R::KIND))]
    pub fn load(&mut self) -> Result<(), ApiError> {
        let request = self.client.build_list();
        match self.round_trip(request).and_then(|r| self.client.parse_list(r)) {
            Ok(items) => {
                tracing::debug!(count = items.len(), "list loaded");
                self.list.replace_items(items);
                self.banner = None;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub fn search(&mut self, query: &str) {
        self.list.set_query(query);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.list.go_to(page);
    }

    pub fn open_create(&self) -> FormState {
        FormState::new(<R::Input as FormInput>::create_schema())
    }

    pub fn open_edit(&self, id: Uuid) -> Option<FormState> {
        self.list
            .get(id)
            .map(|entity| FormState::with_values(<R::Input as FormInput>::schema(), entity.to_form()))
    }

    /// Create (`editing == None`) or update an entity from `form`.
    ///
    /// `Ok(None)` means the form did not pass validation and nothing was
    /// sent. On success the list is refetched.
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %R::KIND, ?editing))]
    pub fn submit(&mut self, form: &mut FormState, editing: Option<Uuid>) -> Result<Option<R::Entity>, ApiError> {
        let client = &self.client;
        let transport = &self.transport;
        let saved = form.submit_with(|input: R::Input| {
            let request = match editing {
                Some(id) => client.build_update(id, &input)?,
                None => client.build_create(&input)?,
            };
            let response = transport.execute(request)?;
            match editing {
                Some(_) => client.parse_update(response),
                None => client.parse_create(response),
            }
        });

        match saved {
            Ok(Some(entity)) => {
                tracing::info!(id = %entity.id(), "saved");
                self.refetch();
                Ok(Some(entity))
            }
            Ok(None) => Ok(None),
            Err(err) => {
                if err.is_auth_failure() {
                    self.banner = Some(err.banner());
                }
                Err(err)
            }
        }
    }

    /// Delete after `confirm` approves. Returns whether the delete was sent.
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %R::KIND, %id))]
    pub fn delete(&mut self, id: Uuid, confirm: impl FnOnce(&R::Entity) -> bool) -> Result<bool, ApiError> {
        let Some(entity) = self.list.get(id) else {
            return Err(self.report(ApiError::NotFound(format!("{} {id} is not loaded", R::KIND))));
        };
        if !confirm(entity) {
            return Ok(false);
        }
        let request = self.client.build_delete(id);
        match self.round_trip(request).and_then(|r| self.client.parse_delete(r)) {
            Ok(()) => {
                tracing::info!("deleted");
                self.refetch();
                Ok(true)
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.execute(request)
    }

    fn refetch(&mut self) {
        // A failed refetch keeps the stale list; the error is in the banner.
        let _ = self.load();
    }

    fn report(&mut self, err: ApiError) -> ApiError {
        tracing::warn!(error = %err, "request failed");
        self.banner = Some(err.banner());
        err
    }
}

impl<R: StatusResource, T: Transport> ResourceController<R, T> {
    /// Change an entity's status after `confirm` approves, patching the row
    /// in place instead of refetching.
    #[tracing::instrument(level = "debug", skip_all, fields(resource = %R::KIND, %id))]
    pub fn set_status(
        &mut self,
        id: Uuid,
        status: R::Status,
        confirm: impl FnOnce(&R::Entity) -> bool,
    ) -> Result<bool, ApiError> {
        let Some(entity) = self.list.get(id) else {
            return Err(self.report(ApiError::NotFound(format!("{} {id} is not loaded", R::KIND))));
        };
        if !confirm(entity) {
            return Ok(false);
        }
        let result = self
            .client
            .build_set_status(id, status)
            .and_then(|request| self.round_trip(request))
            .and_then(|response| self.client.parse_set_status(response));
        match result {
            Ok(updated) => {
                let confirmed = R::status_of(&updated);
                self.list.patch(id, |entity| R::apply_status(entity, confirmed));
                Ok(true)
            }
            Err(err) => Err(self.report(err)),
        }
    }
}

impl<T: Transport> ResourceController<Specimens, T> {
    pub fn open_move(&self, id: Uuid) -> Option<MoveSpecimenForm> {
        self.list.get(id).map(MoveSpecimenForm::new)
    }

    /// Send a move. `Ok(None)` when the dialog blocked it locally.
    #[tracing::instrument(level = "debug", skip_all, fields(specimen = %dialog.specimen_id()))]
    pub fn submit_move(&mut self, dialog: &mut MoveSpecimenForm) -> Result<Option<Specimen>, ApiError> {
        let target = match dialog.begin_submit() {
            Ok(target) => target,
            Err(MoveRejected::Unchanged) => {
                dialog.form_mut().set_banner(MoveRejected::Unchanged.to_string());
                return Ok(None);
            }
            Err(MoveRejected::Invalid(_)) => return Ok(None),
        };
        let result = self
            .client
            .build_move(dialog.specimen_id(), &target)
            .and_then(|request| self.round_trip(request))
            .and_then(|response| self.client.parse_move(response));
        match result {
            Ok(moved) => {
                dialog.form_mut().complete_success();
                self.refetch();
                Ok(Some(moved))
            }
            Err(err) => {
                dialog.form_mut().complete_failure(&err);
                Err(err)
            }
        }
    }
}
