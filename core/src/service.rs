//! Per-resource services: `search`, `load`, `create`, `update` and
//! `paginator` over one resource's endpoints.
//!
//! A service is a borrowed view of an `ApiClient` typed by the resource; it
//! holds no state of its own and never retries.

use std::fmt;
use std::marker::PhantomData;

use crate::client::ApiClient;
use crate::collection::Collection;
use crate::entities::{Customer, Invoice, Organization};
use crate::entity::{EntityInput, Resource};
use crate::error::Result;
use crate::paginator::{PageSource, Paginator};
use crate::search::SearchParams;
use crate::template::Params;
use crate::transport::Transport;

pub struct Service<'c, T, E> {
    client: &'c ApiClient<T>,
    _resource: PhantomData<fn() -> E>,
}

pub type OrganizationService<'c, T> = Service<'c, T, Organization>;
pub type CustomerService<'c, T> = Service<'c, T, Customer>;
pub type InvoiceService<'c, T> = Service<'c, T, Invoice>;

impl<'c, T, E> Service<'c, T, E> {
    pub fn new(client: &'c ApiClient<T>) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &'c ApiClient<T> {
        self.client
    }
}

impl<T, E> Clone for Service<'_, T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for Service<'_, T, E> {}

impl<T, E: Resource> fmt::Debug for Service<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("resource", &E::COLLECTION_PATH)
            .finish()
    }
}

impl<'c, T: Transport, E: Resource> Service<'c, T, E> {
    /// Lazy iterator over every entity matching `params`, using the client's
    /// configured page size. No request is sent until it is first used.
    pub fn paginator(&self, params: SearchParams) -> Paginator<Self> {
        Paginator::new(*self, params).sized(self.client.config().page_size)
    }

    /// One page of entities matching `params`.
    pub fn search(&self, params: &SearchParams) -> Result<Collection<E>> {
        self.client
            .get_collection(E::COLLECTION_PATH, params.to_query())
    }

    /// Fetch one entity by id. Fails with `ApiError::NotFound` if absent.
    pub fn load(&self, id: &str, params: Params) -> Result<E> {
        self.client.load(id, params)
    }

    /// Fails with `ApiError::UnprocessableEntity` if the server rejects the data.
    pub fn create(&self, input: impl Into<EntityInput<E>>) -> Result<E> {
        let body = input.into().into_data()?;
        self.client.post(&body, E::COLLECTION_PATH, Params::new())
    }

    /// Partial update by id. Only the fields present in `input` are sent.
    pub fn update(&self, id: &str, input: impl Into<EntityInput<E>>) -> Result<E> {
        let body = input.into().into_data()?;
        let mut path_params = Params::new();
        path_params.insert(E::ID_PARAM.to_string(), id.to_string());
        self.client.patch(&body, E::ITEM_PATH, path_params)
    }
}

impl<T: Transport, E: Resource> PageSource for Service<'_, T, E> {
    type Item = E;

    fn fetch_page(&self, params: &SearchParams) -> Result<Collection<E>> {
        self.search(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: RefCell<VecDeque<HttpResponse>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn replying(responses: Vec<HttpResponse>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::default(),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Transport("no scripted response left".to_string()))
        }
    }

    fn client(responses: Vec<HttpResponse>) -> ApiClient<ScriptedTransport> {
        ApiClient::new(
            ClientConfig::new("https://api.example.com"),
            ScriptedTransport::replying(responses),
        )
    }

    #[test]
    fn load_hits_item_path() {
        let client = client(vec![HttpResponse::new(200, r#"{"id":"org_123","name":"Acme"}"#)]);
        let org = client.organizations().load("org_123", Params::new()).unwrap();
        assert_eq!(org.name.as_deref(), Some("Acme"));

        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].path, "https://api.example.com/organizations/org_123");
    }

    #[test]
    fn load_missing_is_not_found() {
        let client = client(vec![HttpResponse::new(404, r#"{"error":"not found"}"#)]);
        let err = client.organizations().load("org_123", Params::new()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn create_posts_entity_data() {
        let client = client(vec![HttpResponse::new(201, r#"{"id":"org_9","name":"Acme"}"#)]);
        let created = client
            .organizations()
            .create(Organization::named("Acme"))
            .unwrap();
        assert_eq!(created.id.as_deref(), Some("org_9"));

        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "https://api.example.com/organizations");
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "Acme"}));
    }

    #[test]
    fn update_patches_raw_data_verbatim() {
        let client = client(vec![HttpResponse::new(200, r#"{"id":"cus_1","email":"a@b.c"}"#)]);
        let input =
            EntityInput::<Customer>::from_value(json!({"email": "a@b.c", "unknownField": 1})).unwrap();
        client.customers().update("cus_1", input).unwrap();

        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Patch);
        assert_eq!(requests[0].path, "https://api.example.com/customers/cus_1");
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"email": "a@b.c", "unknownField": 1}));
    }

    #[test]
    fn raw_null_clears_a_field() {
        let client = client(vec![HttpResponse::new(200, r#"{"id":"org_1","name":"Acme"}"#)]);
        let input = EntityInput::<Organization>::from_value(json!({"city": null})).unwrap();
        let updated = client.organizations().update("org_1", input).unwrap();
        assert!(updated.city.is_none());

        let requests = client.transport().requests.borrow();
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"city": null}));
    }

    #[test]
    fn update_validation_failure() {
        let client = client(vec![HttpResponse::new(
            422,
            r#"{"error":"Invalid data","details":["name is required"]}"#,
        )]);
        let err = client
            .organizations()
            .update("org_1", Organization::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::UnprocessableEntity { .. }));
    }

    #[test]
    fn search_passes_filters_as_query() {
        let client = client(vec![HttpResponse::new(200, "[]").with_header("Pagination-Total", "0")]);
        let page = client
            .invoices()
            .search(&SearchParams::new().filter("status:paid").limit(5))
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(page.limit(), Some(5));

        let requests = client.transport().requests.borrow();
        assert_eq!(
            requests[0].path,
            "https://api.example.com/invoices?filter=status%3Apaid&limit=5"
        );
    }

    #[test]
    fn paginator_sends_nothing_until_used() {
        let client = client(Vec::new());
        let paginator = client.organizations().paginator(SearchParams::new());
        assert_eq!(paginator.page_size(), client.config().page_size.get());
        assert!(client.transport().requests.borrow().is_empty());
    }
}
