//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, IdentifierError};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Parse a UUID path segment into a typed identifier.
pub(crate) fn parse_path_id<T>(field: FieldName, raw: &str) -> Result<T, Error>
where
    T: FromStr<Err = IdentifierError>,
{
    raw.parse().map_err(|err: IdentifierError| {
        Error::validation(err.to_string()).with_details(json!({
            "field": field.as_str(),
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}
