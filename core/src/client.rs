//! HTTP request builder and response parser for the billing API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. Both
//! halves are pure. The executing methods (`get`, `get_collection`, `post`,
//! `patch`, `delete`) glue them together through the injected `Transport`.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::collection::Collection;
use crate::config::ClientConfig;
use crate::entities::{Customer, Invoice, Organization};
use crate::entity::{Entity, Resource};
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::service::Service;
use crate::template::{expand_path, Params};
use crate::transport::{Transport, UreqTransport};

/// Synchronous client for the billing API.
///
/// Holds the configuration and the transport; carries no mutable state
/// between calls.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client with a blocking `ureq` transport honouring `config.timeout`.
    pub fn from_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::new(config, transport)
    }
}

impl<T> ApiClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn organizations(&self) -> Service<'_, T, Organization> {
        Service::new(self)
    }

    pub fn customers(&self) -> Service<'_, T, Customer> {
        Service::new(self)
    }

    pub fn invoices(&self) -> Service<'_, T, Invoice> {
        Service::new(self)
    }

    /// Build a request for `template`, filling placeholders from `params`.
    ///
    /// Parameters not consumed by the template become the query string.
    pub fn build_request(
        &self,
        method: HttpMethod,
        template: &str,
        mut params: Params,
        body: Option<&Map<String, Value>>,
    ) -> Result<HttpRequest> {
        let segments = expand_path(template, &mut params)?;

        let mut url = Url::parse(&self.config.base_url)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(&params);
        }

        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.config.user_agent.clone()),
        ];
        headers.extend(self.config.default_headers.iter().cloned());

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method,
            path: url.into(),
            headers,
            body,
        })
    }

    pub fn build_get(&self, template: &str, params: Params) -> Result<HttpRequest> {
        self.build_request(HttpMethod::Get, template, params, None)
    }

    pub fn build_post(
        &self,
        body: &Map<String, Value>,
        template: &str,
        path_params: Params,
    ) -> Result<HttpRequest> {
        self.build_request(HttpMethod::Post, template, path_params, Some(body))
    }

    pub fn build_patch(
        &self,
        body: &Map<String, Value>,
        template: &str,
        path_params: Params,
    ) -> Result<HttpRequest> {
        self.build_request(HttpMethod::Patch, template, path_params, Some(body))
    }

    pub fn build_delete(&self, template: &str, params: Params) -> Result<HttpRequest> {
        self.build_request(HttpMethod::Delete, template, params, None)
    }

    /// Parse a single entity from a 200 or 201 response.
    pub fn parse_entity<E: Entity>(&self, response: HttpResponse) -> Result<E> {
        check_status(&response, &[200, 201])?;
        match serde_json::from_str(&response.body) {
            Ok(Value::Object(data)) => E::from_data(data),
            Ok(other) => Err(ApiError::DeserializationError(format!(
                "expected a {} object, got {other}",
                E::NAME
            ))),
            Err(e) => Err(ApiError::DeserializationError(e.to_string())),
        }
    }

    /// Parse one page of a list endpoint.
    ///
    /// `offset` and `limit` are the values the page was requested with; the
    /// total comes from the configured `TotalCountSource`.
    pub fn parse_collection<E: Entity>(
        &self,
        response: HttpResponse,
        offset: u64,
        limit: Option<u32>,
    ) -> Result<Collection<E>> {
        check_status(&response, &[200])?;
        let (items, total) = self.config.total_count.extract(&response)?;
        Collection::new(items, total, offset, limit).try_map(E::from_data)
    }

    pub fn parse_empty(&self, response: HttpResponse) -> Result<()> {
        check_status(&response, &[200, 202, 204])
    }
}

impl<T: Transport> ApiClient<T> {
    /// Execute a request through the transport.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.path, "sending request");
        let response = self.transport.send(request)?;
        debug!(
            method = %request.method,
            url = %request.path,
            status = response.status,
            "received response"
        );
        Ok(response)
    }

    pub fn get<E: Entity>(&self, template: &str, params: Params) -> Result<E> {
        let request = self.build_get(template, params)?;
        self.parse_entity(self.execute(&request)?)
    }

    /// GET a list endpoint. `offset`/`limit` in `params` are echoed into the
    /// returned `Collection`.
    pub fn get_collection<E: Entity>(&self, template: &str, params: Params) -> Result<Collection<E>> {
        let offset = params
            .get("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let limit = params.get("limit").and_then(|v| v.parse().ok());
        let request = self.build_get(template, params)?;
        self.parse_collection(self.execute(&request)?, offset, limit)
    }

    pub fn post<E: Entity>(
        &self,
        body: &Map<String, Value>,
        template: &str,
        path_params: Params,
    ) -> Result<E> {
        let request = self.build_post(body, template, path_params)?;
        self.parse_entity(self.execute(&request)?)
    }

    pub fn patch<E: Entity>(
        &self,
        body: &Map<String, Value>,
        template: &str,
        path_params: Params,
    ) -> Result<E> {
        let request = self.build_patch(body, template, path_params)?;
        self.parse_entity(self.execute(&request)?)
    }

    pub fn delete(&self, template: &str, params: Params) -> Result<()> {
        let request = self.build_delete(template, params)?;
        self.parse_empty(self.execute(&request)?)
    }

    /// Typed `get` for a resource's item endpoint.
    pub fn load<E: Resource>(&self, id: &str, mut params: Params) -> Result<E> {
        params.insert(E::ID_PARAM.to_string(), id.to_string());
        self.get(E::ITEM_PATH, params)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<()> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        422 => Err(unprocessable(&response.body)),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Build `UnprocessableEntity` from a 422 body, keeping the server's
/// validation detail as-is.
fn unprocessable(body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v.get("error").or_else(|| v.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string());
    let details = parsed
        .as_ref()
        .and_then(|v| v.get("details"))
        .cloned()
        .unwrap_or(Value::Null);
    ApiError::UnprocessableEntity { message, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::TotalCountSource;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::from_config(ClientConfig::new("http://localhost:3000"))
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn build_get_list_produces_correct_request() {
        let req = client()
            .build_get("organizations", params(&[("limit", "10"), ("offset", "20")]))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/organizations?limit=10&offset=20");
        assert!(req.body.is_none());
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn build_get_item_substitutes_id() {
        let req = client()
            .build_get(
                "organizations/{organizationId}",
                params(&[("organizationId", "org_123"), ("expand", "address")]),
            )
            .unwrap();
        assert_eq!(req.path, "http://localhost:3000/organizations/org_123?expand=address");
    }

    #[test]
    fn path_values_are_percent_encoded() {
        let req = client()
            .build_get("organizations/{organizationId}", params(&[("organizationId", "a/b c")]))
            .unwrap();
        assert_eq!(req.path, "http://localhost:3000/organizations/a%2Fb%20c");
    }

    #[test]
    fn base_url_path_is_kept() {
        let client = ApiClient::from_config(ClientConfig::new("https://api.example.com/v2.1/"));
        let req = client.build_get("organizations", Params::new()).unwrap();
        assert_eq!(req.path, "https://api.example.com/v2.1/organizations");
    }

    #[test]
    fn unresolved_placeholder_fails_before_io() {
        let err = client()
            .build_get("organizations/{organizationId}", Params::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::UnresolvedPathParameter { .. }));
    }

    #[test]
    fn build_post_produces_correct_request() {
        let body = object(json!({"name": "Acme"}));
        let req = client().build_post(&body, "organizations", Params::new()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/organizations");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"name": "Acme"}));
    }

    #[test]
    fn build_patch_produces_correct_request() {
        let body = object(json!({"city": "Montreal"}));
        let req = client()
            .build_patch(
                &body,
                "organizations/{organizationId}",
                params(&[("organizationId", "org_1")]),
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:3000/organizations/org_1");
    }

    #[test]
    fn default_headers_are_sent() {
        let config = ClientConfig::new("http://localhost:3000").with_header("x-request-source", "sdk");
        let client = ApiClient::from_config(config);
        let req = client.build_delete("organizations/{id}", params(&[("id", "1")])).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.header("X-Request-Source"), Some("sdk"));
    }

    #[test]
    fn parse_entity_success() {
        let response = HttpResponse::new(200, r#"{"id":"org_1","name":"Acme"}"#);
        let org: Organization = client().parse_entity(response).unwrap();
        assert_eq!(org.id.as_deref(), Some("org_1"));
        assert_eq!(org.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn parse_entity_not_found() {
        let err = client()
            .parse_entity::<Organization>(HttpResponse::new(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_entity_unprocessable_keeps_details() {
        let body = r#"{"error":"Invalid data","details":[{"field":"name","message":"required"}]}"#;
        let err = client()
            .parse_entity::<Organization>(HttpResponse::new(422, body))
            .unwrap_err();
        match err {
            ApiError::UnprocessableEntity { message, details } => {
                assert_eq!(message, "Invalid data");
                assert_eq!(details, json!([{"field": "name", "message": "required"}]));
            }
            other => panic!("expected UnprocessableEntity, got {other:?}"),
        }
    }

    #[test]
    fn parse_entity_unprocessable_plain_body() {
        let err = client()
            .parse_entity::<Organization>(HttpResponse::new(422, "bad input"))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::UnprocessableEntity { ref message, details: Value::Null } if message == "bad input"
        ));
    }

    #[test]
    fn parse_entity_wrong_status() {
        let err = client()
            .parse_entity::<Organization>(HttpResponse::new(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_entity_bad_json() {
        let err = client()
            .parse_entity::<Organization>(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_collection_with_header_total() {
        let response = HttpResponse::new(200, r#"[{"id":"org_1"},{"id":"org_2"}]"#)
            .with_header("Pagination-Total", "12");
        let page: Collection<Organization> =
            client().parse_collection(response, 10, Some(2)).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.total(), 12);
        assert_eq!(page.offset(), 10);
        assert_eq!(page.items()[1].id.as_deref(), Some("org_2"));
    }

    #[test]
    fn parse_collection_with_envelope_total() {
        let config = ClientConfig::new("http://localhost:3000").with_total_count(
            TotalCountSource::Envelope {
                items_field: "data".to_string(),
                total_field: "total".to_string(),
            },
        );
        let client = ApiClient::from_config(config);
        let response = HttpResponse::new(200, r#"{"data":[{"id":"org_1"}],"total":1}"#);
        let page: Collection<Organization> = client.parse_collection(response, 0, None).unwrap();
        assert_eq!(page.total(), 1);
    }

    #[test]
    fn parse_collection_without_total_is_malformed() {
        let response = HttpResponse::new(200, r#"[{"id":"org_1"}]"#);
        let err = client()
            .parse_collection::<Organization>(response, 0, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn parse_empty_accepts_no_content() {
        assert!(client().parse_empty(HttpResponse::new(204, "")).is_ok());
        assert!(matches!(
            client().parse_empty(HttpResponse::new(404, "")),
            Err(ApiError::NotFound)
        ));
    }
}
