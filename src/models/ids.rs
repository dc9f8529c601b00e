//! Typed record identifiers
//!
//! Each record kind gets its own UUID newtype with a short prefix, so a
//! provider ID can never be passed where a model or admin user ID is
//! expected.
//! The prefixed form (`prv-<uuid>`) is what the CLI prints and accepts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix used in the printed form
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Abbreviated form for tables (`prv-1a2b3c4d`)
            pub fn short(&self) -> String {
                let simple = self.0.simple().to_string();
                format!("{}{}", $prefix, &simple[..8])
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            /// Accepts a bare UUID or the prefixed form
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix($prefix).unwrap_or(s)).map(Self)
            }
        }
    };
}

record_id!(
    /// Identifies a provider in the catalog
    ProviderId => "prv-"
);
record_id!(
    /// Identifies an LLM model offered by a provider
    ModelId => "mdl-"
);
record_id!(
    /// Identifies an admin user
    AdminUserId => "adm-"
);
