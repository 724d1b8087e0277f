//! Domain DTOs exchanged with the boarding API.
//!
//! # Design
//! These mirror the backend schema but are defined independently of the
//! mock-server crate; the integration tests catch drift between the two.
//! Each entity has a read model (with its server id and any denormalized
//! display names) and an `*Input` payload used for both create and update.

mod auth;
mod care;
mod category;
mod client;
mod contract;
mod sede;
mod service;
mod specimen;
mod status;
mod user;

pub use auth::{ChangePassword, ForgotPassword, LoginRequest, LoginResponse, MessageResponse, ResetPassword};
pub use care::{Feeding, FeedingInput, Medicine, MedicineInput, Vaccination, VaccinationInput};
pub use category::{Category, CategoryInput};
pub use client::{Client, ClientInput};
pub use contract::{Contract, ContractInput};
pub use sede::{Sede, SedeInput};
pub use service::{Service, ServiceInput};
pub use specimen::{MoveSpecimen, Specimen, SpecimenInput};
pub use status::{ActiveStatus, CareStatus, ContractStatus, Role, UnknownVariant};
pub use user::{User, UserInput};
