use serde::{Deserialize, Serialize};

use crate::entity::{self, Entity, EntityInput};
use crate::error::Result;
use crate::schema::{FieldDefault, FieldKind, FieldSchema};

/// A postal address with attached contact points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
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
    pub emails: Option<Vec<Email>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_numbers: Option<Vec<PhoneNumber>>,
}

const ADDRESS_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("firstName", FieldKind::String),
    FieldSchema::new("lastName", FieldKind::String),
    FieldSchema::new("organization", FieldKind::String),
    FieldSchema::new("address", FieldKind::String),
    FieldSchema::new("address2", FieldKind::String),
    FieldSchema::new("city", FieldKind::String),
    FieldSchema::new("region", FieldKind::String),
    FieldSchema::new("country", FieldKind::String),
    FieldSchema::new("postalCode", FieldKind::String),
    FieldSchema::new("emails", FieldKind::EntityList(Email::schema)),
    FieldSchema::new("phoneNumbers", FieldKind::EntityList(PhoneNumber::schema)),
];

impl Address {
    pub fn set_emails(&mut self, emails: Vec<EntityInput<Email>>) -> Result<()> {
        self.emails = Some(entity::resolve_list(emails)?);
        Ok(())
    }

    pub fn set_phone_numbers(&mut self, phone_numbers: Vec<EntityInput<PhoneNumber>>) -> Result<()> {
        self.phone_numbers = Some(entity::resolve_list(phone_numbers)?);
        Ok(())
    }

    /// The email flagged as primary, or the first one.
    pub fn primary_email(&self) -> Option<&Email> {
        let emails = self.emails.as_deref()?;
        emails
            .iter()
            .find(|e| e.primary == Some(true))
            .or_else(|| emails.first())
    }
}

impl Entity for Address {
    const NAME: &'static str = "Address";

    fn schema() -> &'static [FieldSchema] {
        ADDRESS_FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

const EMAIL_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("label", FieldKind::String),
    FieldSchema::new("value", FieldKind::String),
    FieldSchema::new("primary", FieldKind::Boolean).default_value(FieldDefault::Bool(false)),
];

impl Entity for Email {
    const NAME: &'static str = "Email";

    fn schema() -> &'static [FieldSchema] {
        EMAIL_FIELDS
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

const PHONE_NUMBER_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("label", FieldKind::String),
    FieldSchema::new("value", FieldKind::String),
    FieldSchema::new("primary", FieldKind::Boolean).default_value(FieldDefault::Bool(false)),
];

impl Entity for PhoneNumber {
    const NAME: &'static str = "PhoneNumber";

    fn schema() -> &'static [FieldSchema] {
        PHONE_NUMBER_FIELDS
    }
}
