//! Filter, sort and pagination parameters for list endpoints.

use crate::template::Params;

/// Parameters of a `search` call.
///
/// `offset` and `limit` are usually left unset by callers; a paginator
/// overrides them for every page it fetches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub filter: Option<String>,
    pub q: Option<String>,
    /// Sort keys, `-` prefix for descending, e.g. `-createdTime`.
    pub sort: Vec<String>,
    pub expand: Vec<String>,
    pub fields: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<u32>,
    /// Any other query parameters, passed through verbatim.
    pub extra: Params,
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn sort(mut self, key: impl Into<String>) -> Self {
        self.sort.push(key.into());
        self
    }

    pub fn expand(mut self, relation: impl Into<String>) -> Self {
        self.expand.push(relation.into());
        self
    }

    pub fn fields(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Copy of these parameters positioned at one page.
    pub fn page(&self, offset: u64, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
            ..self.clone()
        }
    }

    /// Flatten into query parameters. Lists are comma-joined; named fields
    /// take precedence over `extra` entries with the same key.
    pub fn to_query(&self) -> Params {
        let mut query = self.extra.clone();
        if let Some(filter) = &self.filter {
            query.insert("filter".to_string(), filter.clone());
        }
        if let Some(q) = &self.q {
            query.insert("q".to_string(), q.clone());
        }
        for (key, values) in [
            ("sort", &self.sort),
            ("expand", &self.expand),
            ("fields", &self.fields),
        ] {
            if !values.is_empty() {
                query.insert(key.to_string(), values.join(","));
            }
        }
        if let Some(offset) = self.offset {
            query.insert("offset".to_string(), offset.to_string());
        }
        if let Some(limit) = self.limit {
            query.insert("limit".to_string(), limit.to_string());
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_produce_empty_query() {
        assert!(SearchParams::new().to_query().is_empty());
    }

    #[test]
    fn lists_are_comma_joined() {
        let query = SearchParams::new()
            .sort("-createdTime")
            .sort("name")
            .expand("website")
            .to_query();
        assert_eq!(query["sort"], "-createdTime,name");
        assert_eq!(query["expand"], "website");
        assert!(!query.contains_key("fields"));
    }

    #[test]
    fn page_overrides_offset_and_limit() {
        let params = SearchParams::new().filter("country:CA").offset(3).limit(7);
        let query = params.page(40, 20).to_query();
        assert_eq!(query["offset"], "40");
        assert_eq!(query["limit"], "20");
        assert_eq!(query["filter"], "country:CA");
    }

    #[test]
    fn named_fields_win_over_extra() {
        let query = SearchParams::new()
            .param("q", "extra")
            .param("criteria", "x")
            .q("named")
            .to_query();
        assert_eq!(query["q"], "named");
        assert_eq!(query["criteria"], "x");
    }
}
