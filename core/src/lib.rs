//! Headless client core for the veterinary boarding admin.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the
//! boarding REST API without touching the network (host-does-IO pattern).
//! On top of that sit the stateful pieces a UI needs: the shared session,
//! form state with field validation, list search and pagination, and a
//! generic page controller that drives them through a `Transport`.
//!
//! # Design
//! - `ApiClient` / `ResourceClient<R>` / `AuthClient` split every call into
//!   `build_*` and `parse_*`; the only state they touch is the `Session`.
//! - Every failure is normalized into one tagged `ApiError`.
//! - Entities are described once through the `Resource` trait; controllers,
//!   forms and lists are generic over it instead of copied per entity.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod contract_form;
pub mod controller;
pub mod error;
pub mod form;
mod form_input;
pub mod http;
pub mod listing;
pub mod logging;
pub mod resource;
pub mod schemas;
pub mod session;
pub mod specimen_move;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::AuthClient;
pub use client::{ApiClient, ResourceClient};
pub use config::{ClientConfig, ConfigError};
pub use context::{AuthContext, ContractsContext};
pub use contract_form::{ClientLocked, ContractForm};
pub use controller::ResourceController;
pub use error::{ApiError, AuthPolicy, FieldError, FieldErrors};
pub use form::{FormInput, FormPhase, FormState, ToForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use listing::{ListItem, ListView, PageKind};
pub use resource::{Resource, ResourceKind, StatusResource};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use specimen_move::{MoveRejected, MoveSpecimenForm};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use validation::{validate_all, validate_field, FormSchema, FormValues, Rule};
