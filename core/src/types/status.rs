use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A form or wire value that does not name any variant of a status enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownVariant { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

wire_enum!(
    /// Status of categories, services and specimens.
    ActiveStatus, "status" { Active => "active", Inactive => "inactive" }
);

wire_enum!(
    /// Lifecycle of a boarding contract.
    ContractStatus, "contract status" { Active => "active", Finalized => "finalized", Cancelled => "cancelled" }
);

wire_enum!(
    /// State of a scheduled feeding, medication or vaccination.
    CareStatus, "care status" { Scheduled => "scheduled", Administered => "administered", Cancelled => "cancelled" }
);

wire_enum!(
    Role, "role" { Admin => "admin", Employee => "employee" }
);

impl Default for ActiveStatus {
    fn default() -> Self {
        ActiveStatus::Active
    }
}

impl ActiveStatus {
    pub fn toggled(self) -> Self {
        match self {
            ActiveStatus::Active => ActiveStatus::Inactive,
            ActiveStatus::Inactive => ActiveStatus::Active,
        }
    }
}

impl Default for ContractStatus {
    fn default() -> Self {
        ContractStatus::Active
    }
}

impl Default for CareStatus {
    fn default() -> Self {
        CareStatus::Scheduled
    }
}
