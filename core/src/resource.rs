//! The endpoint table, in generic (`Resource`) and runtime (`ResourceKind`)
//! form.
//!
//! Every entity follows the same REST shape under its collection path:
//! `GET /path`, `GET /path/:id`, `POST /path`, `PUT /path/:id`,
//! `DELETE /path/:id`. A few add a status `PATCH` or a move action.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::form::{FormInput, ToForm};
use crate::listing::ListItem;
use crate::types::{
    ActiveStatus, CareStatus, Category, CategoryInput, Client, ClientInput, Contract, ContractInput, Feeding,
    FeedingInput, Medicine, MedicineInput, Sede, SedeInput, Service, ServiceInput, Specimen, SpecimenInput,
    UnknownVariant, User, UserInput, Vaccination, VaccinationInput,
};

/// Runtime name of a collection, for hosts that cannot use the generic API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Specimens,
    Categories,
    Sedes,
    Clients,
    Contracts,
    Services,
    Medicines,
    Feedings,
    Vaccinations,
    Users,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Specimens,
        ResourceKind::Categories,
        ResourceKind::Sedes,
        ResourceKind::Clients,
        ResourceKind::Contracts,
        ResourceKind::Services,
        ResourceKind::Medicines,
        ResourceKind::Feedings,
        ResourceKind::Vaccinations,
        ResourceKind::Users,
    ];

    /// Collection path, without the leading slash.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Specimens => "specimens",
            ResourceKind::Categories => "specimen-categories",
            ResourceKind::Sedes => "sedes",
            ResourceKind::Clients => "clients",
            ResourceKind::Contracts => "contracts",
            ResourceKind::Services => "services",
            ResourceKind::Medicines => "medicines",
            ResourceKind::Feedings => "alimentaciones",
            ResourceKind::Vaccinations => "vacunaciones",
            ResourceKind::Users => "users",
        }
    }

    /// Path segment and body field of the status `PATCH`, if any.
    pub fn status_action(&self) -> Option<(&'static str, &'static str)> {
        match self {
            ResourceKind::Services => Some(("status", "status")),
            ResourceKind::Medicines => Some(("estado", "estado")),
            _ => None,
        }
    }

    pub fn supports_move(&self) -> bool {
        matches!(self, ResourceKind::Specimens)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_matches('/');
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.path() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "resource",
                value: s.to_string(),
            })
    }
}

/// A REST collection with its read model and write payload.
pub trait Resource {
    const KIND: ResourceKind;
    type Entity: Serialize + DeserializeOwned + Clone + ListItem + ToForm;
    type Input: Serialize + DeserializeOwned + FormInput;
}

/// A collection with a dedicated status `PATCH`.
pub trait StatusResource: Resource {
    type Status: Serialize + FromStr + Copy;

    fn status_of(entity: &Self::Entity) -> Self::Status;

    /// Mirror a confirmed status change into a locally held entity.
    fn apply_status(entity: &mut Self::Entity, status: Self::Status);
}

pub struct Specimens;
pub struct Categories;
pub struct Sedes;
pub struct Clients;
pub struct Contracts;
pub struct Services;
pub struct Medicines;
pub struct Feedings;
pub struct Vaccinations;
pub struct Users;

macro_rules! resource {
    ($marker:ident, $kind:ident, $entity:ty, $input:ty) => {
        impl Resource for $marker {
            const KIND: ResourceKind = ResourceKind::$kind;
            type Entity = $entity;
            type Input = $input;
        }
    };
}

resource!(Specimens, Specimens, Specimen, SpecimenInput);
resource!(Categories, Categories, Category, CategoryInput);
resource!(Sedes, Sedes, Sede, SedeInput);
resource!(Clients, Clients, Client, ClientInput);
resource!(Contracts, Contracts, Contract, ContractInput);
resource!(Services, Services, Service, ServiceInput);
resource!(Medicines, Medicines, Medicine, MedicineInput);
resource!(Feedings, Feedings, Feeding, FeedingInput);
resource!(Vaccinations, Vaccinations, Vaccination, VaccinationInput);
resource!(Users, Users, User, UserInput);

impl StatusResource for Services {
    type Status = ActiveStatus;

    fn status_of(entity: &Service) -> ActiveStatus {
        entity.status
    }

    fn apply_status(entity: &mut Service, status: ActiveStatus) {
        entity.status = status;
    }
}

impl StatusResource for Medicines {
    type Status = CareStatus;

    fn status_of(entity: &Medicine) -> CareStatus {
        entity.estado
    }

    fn apply_status(entity: &mut Medicine, status: CareStatus) {
        entity.estado = status;
    }
}
