//! One page of a list endpoint, and the strategies that pull the total item
//! count out of a list response.

use serde_json::{Map, Value};

use crate::error::{ApiError, Result};
use crate::http::HttpResponse;

/// Header the billing API uses to report the total number of matching items.
pub const DEFAULT_TOTAL_COUNT_HEADER: &str = "Pagination-Total";

/// An immutable page of entities plus the declared total across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<E> {
    items: Vec<E>,
    total: u64,
    offset: u64,
    limit: Option<u32>,
}

impl<E> Collection<E> {
    pub fn new(items: Vec<E>, total: u64, offset: u64, limit: Option<u32>) -> Self {
        Self {
            items,
            total,
            offset,
            limit,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    /// Total number of items across every page, as reported by the server.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Offset this page was requested at.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Limit this page was requested with, if any.
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            offset: self.offset,
            limit: self.limit,
            len: self.items.len(),
            total: self.total,
        }
    }

    pub(crate) fn try_map<F, T>(self, f: F) -> Result<Collection<T>>
    where
        F: FnMut(E) -> Result<T>,
    {
        Ok(Collection {
            items: self.items.into_iter().map(f).collect::<Result<_>>()?,
            total: self.total,
            offset: self.offset,
            limit: self.limit,
        })
    }
}

impl<E> IntoIterator for Collection<E> {
    type Item = E;
    type IntoIter = std::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, E> IntoIterator for &'a Collection<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Page-level metadata without the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub offset: u64,
    pub limit: Option<u32>,
    pub len: usize,
    pub total: u64,
}

/// Where a list response carries its total item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalCountSource {
    /// Body is a JSON array of items; the total is in the named header.
    Header(String),
    /// Body is a JSON object holding the item array and the total.
    Envelope {
        items_field: String,
        total_field: String,
    },
}

impl Default for TotalCountSource {
    fn default() -> Self {
        TotalCountSource::Header(DEFAULT_TOTAL_COUNT_HEADER.to_string())
    }
}

impl TotalCountSource {
    /// Split a successful list response into raw items and the total count.
    ///
    /// A missing or non-numeric total is fatal for the fetch; no default is
    /// ever substituted.
    pub fn extract(&self, response: &HttpResponse) -> Result<(Vec<Map<String, Value>>, u64)> {
        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;

        match self {
            TotalCountSource::Header(name) => {
                let raw = response.header(name).ok_or_else(|| {
                    ApiError::MalformedResponse(format!("missing '{name}' header"))
                })?;
                let total = raw.trim().parse::<u64>().map_err(|_| {
                    ApiError::MalformedResponse(format!("'{name}' header is not a count: {raw:?}"))
                })?;
                Ok((into_objects(body)?, total))
            }
            TotalCountSource::Envelope {
                items_field,
                total_field,
            } => {
                let Value::Object(mut envelope) = body else {
                    return Err(ApiError::MalformedResponse(
                        "expected a JSON object envelope".to_string(),
                    ));
                };
                let total = envelope
                    .get(total_field)
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        ApiError::MalformedResponse(format!(
                            "missing or invalid '{total_field}' field"
                        ))
                    })?;
                let items = envelope.remove(items_field).ok_or_else(|| {
                    ApiError::MalformedResponse(format!("missing '{items_field}' field"))
                })?;
                Ok((into_objects(items)?, total))
            }
        }
    }
}

fn into_objects(value: Value) -> Result<Vec<Map<String, Value>>> {
    let Value::Array(items) = value else {
        return Err(ApiError::MalformedResponse(
            "expected a JSON array of items".to_string(),
        ));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            other => Err(ApiError::MalformedResponse(format!(
                "expected an object item, got {other}"
            ))),
        })
        .collect()
}
