//! Partial update fields
//!
//! Tracks whether a JSON field was omitted, sent as `null`, or sent with a value.

use serde::{Deserialize, Deserializer};

use super::DomainError;

/// One updatable attribute of a partial update request.
///
/// Use with `#[serde(default)]` so an omitted field stays `Missing`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    #[default]
    Missing,
    Null,
    Value(T),
}

impl<T> FieldUpdate<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, FieldUpdate::Missing)
    }

    /// The supplied value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldUpdate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FieldUpdate<U> {
        match self {
            FieldUpdate::Missing => FieldUpdate::Missing,
            FieldUpdate::Null => FieldUpdate::Null,
            FieldUpdate::Value(v) => FieldUpdate::Value(f(v)),
        }
    }

    /// Apply to a non-nullable attribute. `null` is rejected.
    pub fn apply_required(self, field: &'static str, target: &mut T) -> Result<(), DomainError> {
        match self {
            FieldUpdate::Missing => Ok(()),
            FieldUpdate::Null => Err(DomainError::invalid_field(field, "must not be null")),
            FieldUpdate::Value(v) => {
                *target = v;
                Ok(())
            }
        }
    }

    /// Apply to a nullable attribute. `null` clears it.
    pub fn apply_optional(self, target: &mut Option<T>) {
        match self {
            FieldUpdate::Missing => {}
            FieldUpdate::Null => *target = None,
            FieldUpdate::Value(v) => *target = Some(v),
        }
    }

    /// Reject an explicit `null` on a non-nullable attribute
    pub fn reject_null(&self, field: &'static str) -> Result<(), DomainError> {
        match self {
            FieldUpdate::Null => Err(DomainError::invalid_field(field, "must not be null")),
            _ => Ok(()),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => FieldUpdate::Value(v),
            None => FieldUpdate::Null,
        })
    }
}
