#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Typed client for the Upkeep maintenance-management request gateway
//!
//! Every call goes through one primitive, [`GatewayClient::call`]: it builds
//! `<base_url>/api/<path>`, sends `Content-Type: application/json` and the
//! session's bearer token, and turns any non-2xx answer into
//! [`GatewayError::RequestFailed`] carrying the resource name, the status and a
//! fixed per-call message.
//!
//! Domain namespaces (`assets()`, `work_orders()`, `meters()`, ...) are thin
//! [`Resource`] values on top of that primitive.
//!
//! ```ignore
//! use std::sync::Arc;
//! use upkeep_gateway::{GatewayClient, GatewayConfig, ListQuery};
//! use upkeep_session::{Session, SessionStore};
//!
//! let config = GatewayConfig::load(Some("gateway.yaml".as_ref()))?;
//! let store = Arc::new(SessionStore::signed_in(Session::new(token)?));
//! let client = GatewayClient::new(&config, store)?;
//!
//! let open = client.work_orders().list(&ListQuery::new().status("open")).await?;
//! let pump = client.assets().create(&serde_json::json!({"name": "Pump A"})).await?;
//! ```

mod api;
mod client;
pub mod config;
mod error;
pub mod models;
mod request;
mod resource;

pub use api::{Safety, Workflow};
pub use client::GatewayClient;
pub use config::{GatewayConfig, RetrySettings, TlsRoots};
pub use error::GatewayError;
pub use request::{ApiRequest, CallSite};
pub use resource::{ListQuery, Resource, ResourceSpec, unwrap_envelope};

pub use upkeep_session::{Anonymous, Session, SessionSource, SessionStore};
