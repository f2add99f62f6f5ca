use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Resource};
use crate::schema::{FieldKind, FieldSchema};
use crate::timestamp::Timestamp;

/// A legal entity that owns websites, gateway accounts and customers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<Timestamp>,
}

const FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", FieldKind::String),
    FieldSchema::new("name", FieldKind::String),
    FieldSchema::new("address", FieldKind::String),
    FieldSchema::new("address2", FieldKind::String),
    FieldSchema::new("city", FieldKind::String),
    FieldSchema::new("region", FieldKind::String),
    FieldSchema::new("country", FieldKind::String),
    FieldSchema::new("postalCode", FieldKind::String),
    FieldSchema::new("createdTime", FieldKind::DateTime),
    FieldSchema::new("updatedTime", FieldKind::DateTime),
];

impl Organization {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl Entity for Organization {
    const NAME: &'static str = "Organization";

    fn schema() -> &'static [FieldSchema] {
        FIELDS
    }
}

impl Resource for Organization {
    const COLLECTION_PATH: &'static str = "organizations";
    const ITEM_PATH: &'static str = "organizations/{organizationId}";
    const ID_PARAM: &'static str = "organizationId";
}
