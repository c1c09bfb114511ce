//! Newtype identifiers for service endpoints and their project scope.
//!
//! An endpoint identifier is a server-assigned UUID; the project scope is
//! whatever the caller configured (project name or project UUID). Keeping them
//! as distinct types prevents passing one where the other is expected.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServiceEndpointError;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed, server-assigned
// ---------------------------------------------------------------------------

/// Identifies a service endpoint within an Azure DevOps organisation.
///
/// Assigned by the service on create. The host stores it as the resource ID
/// string, so every lifecycle call after create starts by parsing it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(Uuid);

impl EndpointId {
    /// Generates a new random identifier. Only server stand-ins should need this.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the identifier stored in resource state.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceEndpointError::MalformedId`] when `value` is not a UUID
    /// (this includes the empty string of a resource that was never created).
    pub fn parse(value: &str) -> Result<Self, ServiceEndpointError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|source| ServiceEndpointError::MalformedId {
                value: value.to_owned(),
                source,
            })
    }
}

impl FromStr for EndpointId {
    type Err = ServiceEndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: string-backed, from configuration
// ---------------------------------------------------------------------------

string_id! {
    /// Project scope for every service endpoint call, either the project name
    /// or its UUID as configured in `project_id`.
    ProjectId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_hyphenated_uuid() {
        let id = EndpointId::parse("2f3e4a6c-1b2d-4c5e-8f90-a1b2c3d4e5f6").expect("valid uuid");
        assert_eq!(id.to_string(), "2f3e4a6c-1b2d-4c5e-8f90-a1b2c3d4e5f6");
    }

    #[test]
    fn parse_rejects_empty_and_garbage() {
        for raw in ["", "not-a-uuid", "1234"] {
            let err = EndpointId::parse(raw).expect_err("must not parse");
            assert!(matches!(err, ServiceEndpointError::MalformedId { ref value, .. } if value == raw));
        }
    }

    #[test]
    fn project_id_rejects_empty() {
        assert!(ProjectId::new("").is_none());
        assert_eq!(ProjectId::new("proj").map(|p| p.to_string()), Some("proj".to_owned()));
    }
}
