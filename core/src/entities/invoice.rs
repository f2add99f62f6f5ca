use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::entities::Address;
use crate::entity::{self, Entity, EntityInput, Resource};
use crate::error::Result;
use crate::schema::{FieldDefault, FieldKind, FieldSchema};
use crate::timestamp::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InvoiceItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal_amount: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<Timestamp>,
}

const INVOICE_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", FieldKind::String),
    FieldSchema::new("customerId", FieldKind::String),
    FieldSchema::new("websiteId", FieldKind::String),
    FieldSchema::new("invoiceNumber", FieldKind::Integer),
    FieldSchema::new("currency", FieldKind::String),
    FieldSchema::new("status", FieldKind::String).default_value(FieldDefault::Str("draft")),
    FieldSchema::new("billingAddress", FieldKind::Entity(Address::schema)),
    FieldSchema::new("items", FieldKind::EntityList(InvoiceItem::schema))
        .default_value(FieldDefault::EmptyList),
    FieldSchema::new("subtotalAmount", FieldKind::Number),
    FieldSchema::new("amount", FieldKind::Number),
    FieldSchema::new("notes", FieldKind::String),
    FieldSchema::new("dueTime", FieldKind::DateTime),
    FieldSchema::new("createdTime", FieldKind::DateTime),
];

impl Invoice {
    pub fn set_billing_address(&mut self, input: EntityInput<Address>) -> Result<()> {
        self.billing_address = Some(input.into_entity()?);
        Ok(())
    }

    pub fn set_items(&mut self, items: Vec<EntityInput<InvoiceItem>>) -> Result<()> {
        self.items = Some(entity::resolve_list(items)?);
        Ok(())
    }

    /// Sum of `unitPrice * quantity` over the line items.
    pub fn items_total(&self) -> f64 {
        self.items
            .iter()
            .flatten()
            .map(InvoiceItem::line_total)
            .sum()
    }
}

impl Entity for Invoice {
    const NAME: &'static str = "Invoice";

    fn schema() -> &'static [FieldSchema] {
        INVOICE_FIELDS
    }
}

impl Resource for Invoice {
    const COLLECTION_PATH: &'static str = "invoices";
    const ITEM_PATH: &'static str = "invoices/{invoiceId}";
    const ID_PARAM: &'static str = "invoiceId";
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end_time: Option<Timestamp>,
}

const INVOICE_ITEM_FIELDS: &[FieldSchema] = &[
    FieldSchema::new("id", FieldKind::String),
    FieldSchema::new("type", FieldKind::String).default_value(FieldDefault::Str("debit")),
    FieldSchema::new("description", FieldKind::String),
    FieldSchema::new("unitPrice", FieldKind::Number),
    FieldSchema::new("quantity", FieldKind::Integer).default_value(FieldDefault::Int(1)),
    FieldSchema::new("productId", FieldKind::String),
    FieldSchema::new("periodStartTime", FieldKind::DateTime),
    FieldSchema::new("periodEndTime", FieldKind::DateTime),
];

impl InvoiceItem {
    /// `unitPrice * quantity`; a missing price counts as zero, a missing
    /// quantity as one.
    pub fn line_total(&self) -> f64 {
        let price = self.unit_price.as_ref().and_then(Number::as_f64).unwrap_or(0.0);
        price * self.quantity.unwrap_or(1) as f64
    }
}

impl Entity for InvoiceItem {
    const NAME: &'static str = "InvoiceItem";

    fn schema() -> &'static [FieldSchema] {
        INVOICE_ITEM_FIELDS
    }
}
