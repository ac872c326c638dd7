use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{Route, RouteAsset, RoutePmAssignment};
use crate::resource::{Resource, ResourceSpec};

const ROUTES: ResourceSpec = ResourceSpec::new("routes", "route", "routes");
const ASSETS: ResourceSpec = ResourceSpec::new("assets", "route asset", "route assets");
const PM_ASSIGNMENTS: ResourceSpec = ResourceSpec::new(
    "pm-assignments",
    "route PM assignment",
    "route PM assignments",
);

impl GatewayClient {
    /// `/api/routes`
    #[must_use]
    pub fn routes(&self) -> Resource<Route> {
        Resource::new(self.clone(), ROUTES)
    }
}

impl Resource<Route> {
    /// `/api/routes/<route_id>/assets`
    #[must_use]
    pub fn assets(&self, route_id: &str) -> Resource<RouteAsset> {
        self.nested(route_id, ASSETS)
    }

    /// `PUT /api/routes/<route_id>/assets`, replacing the stops in order.
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to replace route assets`.
    pub async fn replace_assets<B: Serialize + ?Sized>(
        &self,
        route_id: &str,
        body: &B,
    ) -> Result<Vec<RouteAsset>, GatewayError> {
        self.assets(route_id).replace_all(body).await
    }

    /// `/api/routes/<route_id>/pm-assignments`
    #[must_use]
    pub fn pm_assignments(&self, route_id: &str) -> Resource<RoutePmAssignment> {
        self.nested(route_id, PM_ASSIGNMENTS)
    }
}
