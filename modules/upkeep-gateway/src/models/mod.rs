//! Records exchanged with the gateway.
//!
//! Commonly used columns are typed; every other column the backend sends is
//! kept in `extra` and written back unchanged. Identifiers are strings and
//! timestamps are kept exactly as the gateway formats them.
//!
//! A typed column sent as `null` reads as `None` and is left out when the
//! record is serialized again. [`Resource::raw`](crate::Resource::raw) keeps
//! answers verbatim.

mod asset;
mod inventory;
mod job_plan;
mod meter;
mod people;
mod pm_schedule;
mod route;
mod safety;
mod work_order;
mod workflow;

use serde_json::{Map, Value};

pub use asset::Asset;
pub use inventory::InventoryItem;
pub use job_plan::{JobPlan, JobPlanPart, JobPlanTask, JobPlanTool};
pub use meter::{Meter, MeterAssignment, MeterGroup, MeterReading};
pub use people::Person;
pub use pm_schedule::{PmAssignment, PmHistoryEntry, PmMaterial, PmSchedule};
pub use route::{Route, RouteAsset, RoutePmAssignment};
pub use safety::{CorrectiveAction, Incident, Precaution};
pub use work_order::WorkOrder;
pub use workflow::{
    BulkTransitionResult, WorkflowAnalytics, WorkflowState, WorkflowStep, WorkflowTemplate,
};

/// Backend columns without a typed field
pub type Extra = Map<String, Value>;

/// Free-form statistics object returned by the `stats` endpoints
pub type ResourceStats = Map<String, Value>;
