use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::Address;
use crate::entity::{Entity, EntityInput, Resource};
use crate::error::Result;
use crate::schema::{FieldKind, FieldSchema};
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<Timestamp>,
}

const FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", FieldKind::String),
    FieldSchema::new("email", FieldKind::String),
    FieldSchema::new("firstName", FieldKind::String),
    FieldSchema::new("lastName", FieldKind::String),
    FieldSchema::new("websiteId", FieldKind::String),
    FieldSchema::new("primaryAddress", FieldKind::Entity(Address::schema)),
    FieldSchema::new("customFields", FieldKind::Object),
    FieldSchema::new("createdTime", FieldKind::DateTime),
    FieldSchema::new("updatedTime", FieldKind::DateTime),
];

impl Customer {
    /// Set the primary address from raw data or a built `Address`.
    pub fn set_primary_address(&mut self, input: EntityInput<Address>) -> Result<()> {
        self.primary_address = Some(input.into_entity()?);
        Ok(())
    }
}

impl Entity for Customer {
    const NAME: &'static str = "Customer";

    fn schema() -> &'static [FieldSchema] {
        FIELDS
    }
}

impl Resource for Customer {
    const COLLECTION_PATH: &'static str = "customers";
    const ITEM_PATH: &'static str = "customers/{customerId}";
    const ID_PARAM: &'static str = "customerId";
}
