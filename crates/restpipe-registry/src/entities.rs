//! Registry domain entity and its raw service representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use restpipe_core::{Error, FieldValue, Result};

/// Raw registry object as returned by the service.
///
/// `description` is tri-state: a partial update can clear it by sending an
/// explicit `null`, which is distinct from omitting the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestRegistry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "FieldValue::is_unset")]
    pub description: FieldValue<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_network_access: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// A registry the caller can address by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub public_network_access: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl Registry {
    /// Convert a raw service object into the domain entity.
    ///
    /// Identity fields are required; everything else is tolerated missing.
    pub fn from_rest_object(obj: RestRegistry) -> Result<Self> {
        let name = obj
            .name
            .ok_or_else(|| Error::validation("service returned a registry without a name"))?;
        let location = obj
            .location
            .ok_or_else(|| Error::validation("service returned a registry without a location"))?;
        Ok(Self {
            name,
            location,
            description: obj.description.into_option(),
            public_network_access: obj.public_network_access,
            tags: obj.tags,
        })
    }
}
