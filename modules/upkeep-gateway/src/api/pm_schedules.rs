use http::Method;
use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{PmAssignment, PmHistoryEntry, PmMaterial, PmSchedule};
use crate::resource::{ListQuery, Resource, ResourceSpec};

const PM_SCHEDULES: ResourceSpec = ResourceSpec::new("pm-schedules", "PM schedule", "PM schedules");
const MATERIALS: ResourceSpec = ResourceSpec::new("materials", "PM material", "PM materials");
const ASSIGNMENTS: ResourceSpec =
    ResourceSpec::new("assignments", "PM assignment", "PM assignments");

/// Key wrapping history answers when the gateway wraps them
const HISTORY_KEY: &str = "history";

impl GatewayClient {
    /// `/api/pm-schedules`
    #[must_use]
    pub fn pm_schedules(&self) -> Resource<PmSchedule> {
        Resource::new(self.clone(), PM_SCHEDULES)
    }
}

impl Resource<PmSchedule> {
    /// `/api/pm-schedules/<id>/materials`
    #[must_use]
    pub fn materials(&self, schedule_id: &str) -> Resource<PmMaterial> {
        self.nested(schedule_id, MATERIALS)
    }

    /// `/api/pm-schedules/<id>/assignments`
    #[must_use]
    pub fn assignments(&self, schedule_id: &str) -> Resource<PmAssignment> {
        self.nested(schedule_id, ASSIGNMENTS)
    }

    /// `PUT /api/pm-schedules/<id>/assignments` with the complete new list.
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to replace PM assignments`.
    pub async fn replace_assignments<B: Serialize + ?Sized>(
        &self,
        schedule_id: &str,
        body: &B,
    ) -> Result<Vec<PmAssignment>, GatewayError> {
        self.assignments(schedule_id).replace_all(body).await
    }

    /// `GET /api/pm-schedules/<id>/history`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch PM history`.
    pub async fn history(
        &self,
        schedule_id: &str,
        query: &ListQuery,
    ) -> Result<Vec<PmHistoryEntry>, GatewayError> {
        let request = self
            .item_request(Method::GET, schedule_id, "Failed to fetch PM history")
            .segment("history")
            .queries(query.pairs().iter().cloned());
        self.call_enveloped(request, Some(HISTORY_KEY)).await
    }

    /// `POST /api/pm-schedules/<id>/history`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to record PM history`.
    pub async fn record_history<B: Serialize + ?Sized>(
        &self,
        schedule_id: &str,
        body: &B,
    ) -> Result<PmHistoryEntry, GatewayError> {
        let request = self
            .item_request(Method::POST, schedule_id, "Failed to record PM history")
            .segment("history")
            .json(body);
        self.client().call(request).await
    }
}
