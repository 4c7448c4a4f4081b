//! Tri-state JSON fields: absent, explicit `null`, or a value.
//!
//! A partial-update body needs to distinguish "leave this field alone"
//! (omit the key) from "clear this field" (send a literal `null`).
//! [`FieldValue::Null`] is the explicit-null sentinel; `Unset` fields are
//! skipped entirely when paired with
//! `#[serde(default, skip_serializing_if = "FieldValue::is_unset")]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field that is absent, explicitly `null`, or set to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    /// Field is omitted from the serialized document.
    Unset,
    /// Field is serialized as a literal JSON `null`.
    Null,
    /// Field carries a value.
    Set(T),
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> FieldValue<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<T> for FieldValue<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for FieldValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            // Unset fields are meant to be skipped by the container; one
            // serialized anyway degrades to `null`.
            Self::Unset | Self::Null => serializer.serialize_none(),
            Self::Set(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|opt| match opt {
            Some(v) => Self::Set(v),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, skip_serializing_if = "FieldValue::is_unset")]
        description: FieldValue<String>,
        #[serde(default, skip_serializing_if = "FieldValue::is_unset")]
        replica_count: FieldValue<u32>,
    }

    #[test]
    fn null_sentinel_serializes_as_literal_null() {
        let patch = Patch {
            description: FieldValue::Null,
            replica_count: FieldValue::Set(3),
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"description":null,"replica_count":3}"#);
    }

    #[test]
    fn unset_fields_are_omitted() {
        let patch = Patch::default();
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");

        let patch = Patch {
            description: FieldValue::Set("primary".into()),
            replica_count: FieldValue::Unset,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"description":"primary"}"#);
    }

    #[test]
    fn null_and_absent_deserialize_distinguishably() {
        let patch: Patch = serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert!(patch.description.is_null());
        assert!(patch.replica_count.is_unset());

        let patch: Patch = serde_json::from_str(r#"{"replica_count":2}"#).unwrap();
        assert!(patch.description.is_unset());
        assert_eq!(patch.replica_count.as_option(), Some(&2));
    }
}
