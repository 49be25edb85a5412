//! UUID-backed identifier newtypes shared by the aggregates.

use thiserror::Error;

/// Raised when an identifier string is not a canonical UUID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdentifierError {
    kind: &'static str,
}

impl IdentifierError {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self { kind }
    }

    /// Name of the identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

/// Generate a `Copy` UUID newtype with parsing, display and serde support.
macro_rules! define_uuid_identifier {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Parse an identifier, rejecting surrounding whitespace.
            pub fn new(
                raw: impl AsRef<str>,
            ) -> Result<Self, $crate::domain::identifiers::IdentifierError> {
                let raw = raw.as_ref();
                if raw.trim() != raw {
                    return Err($crate::domain::identifiers::IdentifierError::new($kind));
                }
                ::uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| $crate::domain::identifiers::IdentifierError::new($kind))
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: ::uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::identifiers::IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

pub(crate) use define_uuid_identifier;
