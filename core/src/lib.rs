//! Synchronous client SDK for the billing API.
//!
//! # Overview
//! Typed entities (organizations, customers, invoices, ...), per-resource
//! services mapping `search`/`load`/`create`/`update` onto GET/POST/PATCH, and
//! a lazy [`Paginator`] that walks a paged list endpoint one page at a time.
//!
//! # Design
//! - `ApiClient` splits every call into a pure `build_*` (request) and
//!   `parse_*` (response) half; the injected `Transport` performs the I/O in
//!   between. There is no global client.
//! - Services are zero-state views of a client, typed by the resource.
//! - Entities declare a static field schema and round-trip losslessly through
//!   `from_data` / `to_data`, deprecated fields excepted. Amounts keep their
//!   integer or fractional JSON form and timestamps keep their original text.
//! - How a list response reports its total count is configurable
//!   (`TotalCountSource`): a header by default, or an envelope field.
//!
//! ```no_run
//! use billing_core::{ApiClient, ClientConfig, SearchParams};
//!
//! # fn main() -> billing_core::Result<()> {
//! let client = ApiClient::from_config(ClientConfig::from_env()?);
//! for org in client.organizations().paginator(SearchParams::new().sort("name")) {
//!     let org = org?;
//!     println!("{}", org.name.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collection;
pub mod config;
pub mod entities;
pub mod entity;
pub mod error;
pub mod http;
pub mod paginator;
pub mod schema;
pub mod search;
pub mod service;
pub mod template;
pub mod timestamp;
pub mod transport;

pub use client::ApiClient;
pub use collection::{Collection, PageInfo, TotalCountSource};
pub use config::ClientConfig;
pub use entities::{
    Address, Customer, Email, Invoice, InvoiceItem, Organization, PaymentToken, PhoneNumber,
};
pub use entity::{Entity, EntityInput, Resource};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use paginator::{PageSource, Pages, Paginator};
pub use schema::{FieldDefault, FieldKind, FieldSchema};
pub use search::SearchParams;
pub use service::{CustomerService, InvoiceService, OrganizationService, Service};
pub use template::Params;
pub use timestamp::Timestamp;
pub use transport::{Transport, UreqTransport};
