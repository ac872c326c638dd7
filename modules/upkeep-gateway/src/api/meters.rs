use http::Method;
use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{Meter, MeterAssignment, MeterGroup, MeterReading};
use crate::resource::{Resource, ResourceSpec};

const METERS: ResourceSpec =
    ResourceSpec::new("meters", "meter", "meters").with_envelope("meters", "meter");
const GROUPS: ResourceSpec = ResourceSpec::new("meters/groups", "meter group", "meter groups")
    .with_envelope("groups", "group");
const ASSIGNMENTS: ResourceSpec =
    ResourceSpec::new("meters/assignments", "meter assignment", "meter assignments")
        .with_envelope("assignments", "assignment");

const READING_KEY: &str = "reading";

impl GatewayClient {
    /// `/api/meters`. Answers may be wrapped as `{"meters": [...]}` and
    /// `{"meter": {...}}`.
    #[must_use]
    pub fn meters(&self) -> Resource<Meter> {
        Resource::new(self.clone(), METERS)
    }
}

impl Resource<Meter> {
    /// `POST /api/meters/<id>/readings`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to record meter reading`.
    pub async fn record_reading<B: Serialize + ?Sized>(
        &self,
        meter_id: &str,
        body: &B,
    ) -> Result<MeterReading, GatewayError> {
        let request = self
            .item_request(Method::POST, meter_id, "Failed to record meter reading")
            .segment("readings")
            .json(body);
        self.call_enveloped(request, Some(READING_KEY)).await
    }

    /// `/api/meters/groups`
    #[must_use]
    pub fn groups(&self) -> Resource<MeterGroup> {
        Resource::new(self.client().clone(), GROUPS)
    }

    /// `/api/meters/assignments`
    #[must_use]
    pub fn assignments(&self) -> Resource<MeterAssignment> {
        Resource::new(self.client().clone(), ASSIGNMENTS)
    }
}
