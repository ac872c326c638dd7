//! Domain namespaces on [`GatewayClient`](crate::GatewayClient).
//!
//! Each accessor returns a [`Resource`](crate::Resource) for the collection;
//! calls that do not fit plain CRUD are inherent methods on that resource.

mod assets;
mod inventory;
mod job_plans;
mod meters;
mod people;
mod pm_schedules;
mod routes;
mod safety;
mod work_orders;
mod workflow;

pub use safety::Safety;
pub use workflow::Workflow;
