//! Generic CRUD over one gateway collection.

use std::fmt;
use std::marker::PhantomData;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::request::ApiRequest;

/// Static description of a collection: where it lives, what it is called and
/// how the gateway wraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Path relative to `/api/` (or to the parent record when nested)
    pub path: &'static str,
    pub singular: &'static str,
    pub plural: &'static str,
    /// Key wrapping list answers, as in `{"meters": [...]}`
    pub list_key: Option<&'static str>,
    /// Key wrapping single records, as in `{"meter": {...}}`
    pub item_key: Option<&'static str>,
}

impl ResourceSpec {
    #[must_use]
    pub const fn new(path: &'static str, singular: &'static str, plural: &'static str) -> Self {
        Self {
            path,
            singular,
            plural,
            list_key: None,
            item_key: None,
        }
    }

    #[must_use]
    pub const fn with_envelope(
        mut self,
        list_key: &'static str,
        item_key: &'static str,
    ) -> Self {
        self.list_key = Some(list_key);
        self.item_key = Some(item_key);
        self
    }
}

/// Unwrap `{ <key>: inner }` to `inner`; any other shape passes through.
#[must_use]
pub fn unwrap_envelope(value: Value, key: Option<&str>) -> Value {
    match (value, key) {
        (Value::Object(mut map), Some(key)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (value, _) => value,
    }
}

/// Query parameters for list calls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn limit(self, limit: u32) -> Self {
        self.param("limit", limit)
    }

    pub fn offset(self, offset: u32) -> Self {
        self.param("offset", offset)
    }

    pub fn search(self, term: &str) -> Self {
        self.param("search", term)
    }

    pub fn status(self, status: &str) -> Self {
        self.param("status", status)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

/// CRUD over one collection, decoding records as `T`.
///
/// Obtained from the namespace accessors on [`GatewayClient`]; `T` defaults to
/// the domain model but any deserializable type works, see [`raw`](Self::raw).
pub struct Resource<T> {
    client: GatewayClient,
    spec: ResourceSpec,
    base: Vec<String>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            spec: self.spec,
            base: self.base.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("path", &self.base.join("/"))
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl<T> Resource<T> {
    /// Top-level collection at `spec.path`.
    #[must_use]
    pub fn new(client: GatewayClient, spec: ResourceSpec) -> Self {
        Self::at(client, spec, Vec::new())
    }

    fn at(client: GatewayClient, spec: ResourceSpec, mut base: Vec<String>) -> Self {
        base.extend(
            spec.path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
        );
        Self {
            client,
            spec,
            base,
            _marker: PhantomData,
        }
    }

    /// Collection nested under record `id` of this one.
    #[must_use]
    pub fn nested<U>(&self, id: &str, spec: ResourceSpec) -> Resource<U> {
        let mut base = self.base.clone();
        base.push(id.to_owned());
        Resource::at(self.client.clone(), spec, base)
    }

    /// Same collection, records left as JSON values.
    ///
    /// Typed models drop absent and `null` optional columns when serialized
    /// again; use this view when the answer must be reproduced byte for byte,
    /// explicit `null`s included.
    #[must_use]
    pub fn raw(&self) -> Resource<Value> {
        Resource {
            client: self.client.clone(),
            spec: self.spec,
            base: self.base.clone(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Path of the collection relative to `/api/`, ids included.
    #[must_use]
    pub fn path(&self) -> String {
        self.base.join("/")
    }

    pub(crate) fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// Request against the collection (or below it via `.segment(..)`), with
    /// `message` as the failure message.
    pub fn request(&self, method: Method, message: impl Into<String>) -> ApiRequest {
        ApiRequest::new(method, "")
            .segments(&self.base)
            .on_failure(self.path(), message)
    }

    /// Request against one record.
    pub fn item_request(&self, method: Method, id: &str, message: impl Into<String>) -> ApiRequest {
        self.request(method, message).segment(id)
    }

    /// Perform `request` and decode the answer, unwrapping `key` when the
    /// gateway wrapped it.
    pub(crate) async fn call_enveloped<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
        key: Option<&str>,
    ) -> Result<R, GatewayError> {
        let call_site = request.call_site().clone();
        let value = self.client.call_value(request).await?;
        call_site.decode(unwrap_envelope(value, key))
    }

    pub(crate) async fn call_item<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<R, GatewayError> {
        self.call_enveloped(request, self.spec.item_key).await
    }

    pub(crate) async fn call_list<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<R>, GatewayError> {
        self.call_enveloped(request, self.spec.list_key).await
    }
}

impl<T: DeserializeOwned> Resource<T> {
    /// `GET /api/<path>`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch <plural>`.
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<T>, GatewayError> {
        let request = self
            .request(Method::GET, format!("Failed to fetch {}", self.spec.plural))
            .queries(query.pairs().iter().cloned());
        self.call_list(request).await
    }

    /// `GET /api/<path>/<id>`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch <singular>`.
    pub async fn get(&self, id: &str) -> Result<T, GatewayError> {
        let request = self.item_request(
            Method::GET,
            id,
            format!("Failed to fetch {}", self.spec.singular),
        );
        self.call_item(request).await
    }

    /// `POST /api/<path>`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to create <singular>`.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T, GatewayError> {
        let request = self
            .request(Method::POST, format!("Failed to create {}", self.spec.singular))
            .json(body);
        self.call_item(request).await
    }

    /// `PATCH /api/<path>/<id>`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to update <singular>`.
    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T, GatewayError> {
        let request = self
            .item_request(
                Method::PATCH,
                id,
                format!("Failed to update {}", self.spec.singular),
            )
            .json(body);
        self.call_item(request).await
    }

    /// `DELETE /api/<path>/<id>`, returning whatever the gateway answers
    /// (often `null`).
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to delete <singular>`.
    pub async fn delete(&self, id: &str) -> Result<Value, GatewayError> {
        let request = self.item_request(
            Method::DELETE,
            id,
            format!("Failed to delete {}", self.spec.singular),
        );
        self.client.call_value(request).await
    }

    /// `PUT /api/<path>` replacing the whole collection.
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to replace <plural>`.
    pub async fn replace_all<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<T>, GatewayError> {
        let request = self
            .request(Method::PUT, format!("Failed to replace {}", self.spec.plural))
            .json(body);
        self.call_list(request).await
    }
}
