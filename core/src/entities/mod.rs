//! Typed entities for the billing API resources this SDK covers.

mod address;
mod customer;
mod invoice;
mod organization;
mod payment_token;

pub use address::{Address, Email, PhoneNumber};
pub use customer::Customer;
pub use invoice::{Invoice, InvoiceItem};
pub use organization::Organization;
pub use payment_token::PaymentToken;
