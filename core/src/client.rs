//! HTTP request builder and response parser for the boarding API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip in between, so the client itself stays
//! deterministic. The only state it touches is the shared `Session`: the
//! bearer token is read when building, and a 401/403 clears it when parsing.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, AuthPolicy};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::{Resource, Specimens, StatusResource};
use crate::session::Session;
use crate::types::{MoveSpecimen, Specimen};

/// Untyped client: URL joining, auth headers, status checks and error
/// normalization shared by every endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Session) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Build a request for `path` (relative to the base URL).
    pub fn build(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(bearer) = self.session.bearer() {
            headers.push(("authorization".to_string(), bearer));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        let request = HttpRequest {
            method,
            path: format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            headers,
            body,
        };
        tracing::debug!(method = %request.method, path = %request.path, "built request");
        request
    }

    pub fn build_json<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build(method, path, Some(body)))
    }

    /// Map a non-2xx response to its `ApiError`, tearing the session down on
    /// 401/403 under `AuthPolicy::Session`.
    pub fn check(&self, response: &HttpResponse, policy: AuthPolicy) -> Result<(), ApiError> {
        if response.is_success() {
            return Ok(());
        }
        let err = ApiError::from_response(response, policy);
        if err.is_auth_failure() {
            tracing::warn!(status = response.status, "authentication rejected, clearing session");
            self.session.clear();
        } else {
            tracing::debug!(status = response.status, error = %err, "request failed");
        }
        Err(err)
    }

    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        self.parse_with(response, AuthPolicy::Session)
    }

    pub fn parse_with<T: DeserializeOwned>(&self, response: HttpResponse, policy: AuthPolicy) -> Result<T, ApiError> {
        self.check(&response, policy)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Success without a payload (204 or an ignored body).
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check(&response, AuthPolicy::Session)
    }

    /// Success body as loose JSON; `None` for an empty (204) body.
    pub fn parse_value(&self, response: HttpResponse, policy: AuthPolicy) -> Result<Option<serde_json::Value>, ApiError> {
        self.check(&response, policy)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Typed CRUD client for one collection.
pub struct ResourceClient<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient").field("api", &self.api).finish()
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn item_path(id: Uuid) -> String {
        format!("{}/{id}", R::KIND.path())
    }

    pub fn build_list(&self) -> HttpRequest {
        self.api.build(HttpMethod::Get, R::KIND.path(), None)
    }

    pub fn build_get(&self, id: Uuid) -> HttpRequest {
        self.api.build(HttpMethod::Get, &Self::item_path(id), None)
    }

    pub fn build_create(&self, input: &R::Input) -> Result<HttpRequest, ApiError> {
        self.api.build_json(HttpMethod::Post, R::KIND.path(), input)
    }

    pub fn build_update(&self, id: Uuid, input: &R::Input) -> Result<HttpRequest, ApiError> {
        self.api.build_json(HttpMethod::Put, &Self::item_path(id), input)
    }

    pub fn build_delete(&self, id: Uuid) -> HttpRequest {
        self.api.build(HttpMethod::Delete, &Self::item_path(id), None)
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<R::Entity>, ApiError> {
        self.api.parse(response)
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<R::Entity, ApiError> {
        self.api.parse(response)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<R::Entity, ApiError> {
        self.api.parse(response)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<R::Entity, ApiError> {
        self.api.parse(response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.api.parse_empty(response)
    }
}

impl<R: StatusResource> ResourceClient<R> {
    pub fn build_set_status(&self, id: Uuid, status: R::Status) -> Result<HttpRequest, ApiError> {
        let (segment, field) = R::KIND
            .status_action()
            .ok_or_else(|| ApiError::Serialization(format!("{} has no status action", R::KIND)))?;
        let body = serde_json::json!({ field: status });
        self.api
            .build_json(HttpMethod::Patch, &format!("{}/{segment}", Self::item_path(id)), &body)
    }

    pub fn parse_set_status(&self, response: HttpResponse) -> Result<R::Entity, ApiError> {
        self.api.parse(response)
    }
}

impl ResourceClient<Specimens> {
    /// `PATCH /specimens/:id/move`.
    pub fn build_move(&self, id: Uuid, target: &MoveSpecimen) -> Result<HttpRequest, ApiError> {
        self.api
            .build_json(HttpMethod::Patch, &format!("{}/move", Self::item_path(id)), target)
    }

    pub fn parse_move(&self, response: HttpResponse) -> Result<Specimen, ApiError> {
        self.api.parse(response)
    }
}
