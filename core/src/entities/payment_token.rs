use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::Address;
use crate::entity::{self, Entity, EntityInput};
use crate::error::Result;
use crate::schema::{FieldDefault, FieldKind, FieldSchema};
use crate::timestamp::Timestamp;

/// A one-time token wrapping a payment instrument.
///
/// The flat card fields (`pan`, `cvv`, `expYear`, `expMonth`, `firstName`,
/// `lastName`) are deprecated. They are still accepted on input and are moved
/// into `paymentInstrument` and `billingAddress` when the token is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_instrument: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

const FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", FieldKind::String),
    FieldSchema::new("method", FieldKind::String).default_value(FieldDefault::Str("payment-card")),
    FieldSchema::new("paymentInstrument", FieldKind::Object),
    FieldSchema::new("billingAddress", FieldKind::Entity(Address::schema)),
    FieldSchema::new("isUsed", FieldKind::Boolean),
    FieldSchema::new("expirationTime", FieldKind::DateTime),
    FieldSchema::new("createdTime", FieldKind::DateTime),
    FieldSchema::new("pan", FieldKind::String).deprecated(),
    FieldSchema::new("cvv", FieldKind::String).deprecated(),
    FieldSchema::new("expYear", FieldKind::Integer).deprecated(),
    FieldSchema::new("expMonth", FieldKind::Integer).deprecated(),
    FieldSchema::new("firstName", FieldKind::String).deprecated(),
    FieldSchema::new("lastName", FieldKind::String).deprecated(),
];

impl PaymentToken {
    pub fn set_billing_address(&mut self, input: EntityInput<Address>) -> Result<()> {
        self.billing_address = Some(input.into_entity()?);
        Ok(())
    }

    /// Move deprecated flat fields into their replacements. Values already
    /// present in the replacements win.
    fn fold_legacy_fields(&mut self) {
        let card = [
            ("pan", self.pan.take().map(Value::from)),
            ("cvv", self.cvv.take().map(Value::from)),
            ("expYear", self.exp_year.take().map(Value::from)),
            ("expMonth", self.exp_month.take().map(Value::from)),
        ];
        if card.iter().any(|(_, v)| v.is_some()) {
            let instrument = self.payment_instrument.get_or_insert_with(Map::new);
            for (key, value) in card {
                if let Some(value) = value {
                    instrument.entry(key).or_insert(value);
                }
            }
        }

        let first_name = self.first_name.take();
        let last_name = self.last_name.take();
        if first_name.is_some() || last_name.is_some() {
            let address = self.billing_address.get_or_insert_with(Address::default);
            if address.first_name.is_none() {
                address.first_name = first_name;
            }
            if address.last_name.is_none() {
                address.last_name = last_name;
            }
        }
    }
}

impl Entity for PaymentToken {
    const NAME: &'static str = "PaymentToken";

    fn schema() -> &'static [FieldSchema] {
        FIELDS
    }

    fn to_data(&self) -> Result<Map<String, Value>> {
        let mut token = self.clone();
        token.fold_legacy_fields();
        entity::serialize_fields(&token)
    }
}
