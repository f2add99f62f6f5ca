//! The entity contract: typed records built from, and serialized back to, raw
//! JSON objects.
//!
//! # Design
//! Entities are plain serde structs. The [`Entity`] trait adds the schema
//! they declare and the conversions every service relies on: `from_data`
//! when a response arrives and `to_data` before a create/update payload is
//! sent. Nested entities are set through [`EntityInput`], which names up
//! front whether the caller supplies raw data or a built entity.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::schema::{self, FieldSchema};

/// A typed record mirroring one remote resource.
///
/// `to_data(from_data(d)) == d` holds for every declared, non-deprecated field
/// with a non-null value. An explicit `null` reads the same as an absent field
/// and is not written back, so a typed update cannot clear a field; send raw
/// data (`EntityInput::FromRawData`) with the `null` for that.
pub trait Entity: Sized + Clone + Serialize + DeserializeOwned {
    /// Human-readable type name, used in error messages.
    const NAME: &'static str;

    fn schema() -> &'static [FieldSchema];

    fn from_data(data: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(data))
            .map_err(|e| ApiError::DeserializationError(format!("{}: {e}", Self::NAME)))
    }

    fn to_data(&self) -> Result<Map<String, Value>> {
        serialize_fields(self)
    }

    fn from_input(input: EntityInput<Self>) -> Result<Self> {
        match input {
            EntityInput::FromRawData(data) => Self::from_data(data),
            EntityInput::FromEntity(entity) => Ok(entity),
        }
    }

    /// An entity holding only the schema defaults.
    fn with_defaults() -> Result<Self> {
        Self::from_data(schema::defaults(Self::schema()))
    }
}

/// A remote resource with its own collection endpoint.
pub trait Resource: Entity {
    /// e.g. `organizations`
    const COLLECTION_PATH: &'static str;
    /// e.g. `organizations/{organizationId}`
    const ITEM_PATH: &'static str;
    /// Placeholder name of the id in `ITEM_PATH`.
    const ID_PARAM: &'static str;
}

/// Input for a nested-entity setter or a create/update payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityInput<E> {
    FromRawData(Map<String, Value>),
    FromEntity(E),
}

impl<E: Entity> EntityInput<E> {
    /// Raw data from a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(EntityInput::FromRawData(data)),
            other => Err(ApiError::SerializationError(format!(
                "{} input must be a JSON object, got {other}",
                E::NAME
            ))),
        }
    }

    /// Resolve to an entity, deserializing raw data if needed.
    pub fn into_entity(self) -> Result<E> {
        E::from_input(self)
    }

    /// Resolve to a JSON object suitable for a request body.
    ///
    /// Raw data is passed through untouched so callers can send fields the
    /// typed entity does not declare.
    pub fn into_data(self) -> Result<Map<String, Value>> {
        match self {
            EntityInput::FromRawData(data) => Ok(data),
            EntityInput::FromEntity(entity) => entity.to_data(),
        }
    }
}

impl<E: Entity> From<E> for EntityInput<E> {
    fn from(entity: E) -> Self {
        EntityInput::FromEntity(entity)
    }
}

/// Serialize `entity` to an object, dropping its deprecated fields.
pub(crate) fn serialize_fields<E: Entity>(entity: &E) -> Result<Map<String, Value>> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(mut data)) => {
            schema::strip_deprecated(E::schema(), &mut data);
            Ok(data)
        }
        Ok(other) => Err(ApiError::SerializationError(format!(
            "{} serialized to a non-object: {other}",
            E::NAME
        ))),
        Err(e) => Err(ApiError::SerializationError(format!("{}: {e}", E::NAME))),
    }
}

pub(crate) fn resolve_list<E: Entity>(inputs: Vec<EntityInput<E>>) -> Result<Vec<E>> {
    inputs.into_iter().map(E::from_input).collect()
}
