use http::Method;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{Asset, ResourceStats};
use crate::resource::{Resource, ResourceSpec};

const ASSETS: ResourceSpec = ResourceSpec::new("assets", "asset", "assets");

impl GatewayClient {
    /// `/api/assets`
    #[must_use]
    pub fn assets(&self) -> Resource<Asset> {
        Resource::new(self.clone(), ASSETS)
    }
}

impl Resource<Asset> {
    /// `GET /api/assets/stats`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch asset stats`.
    pub async fn stats(&self) -> Result<ResourceStats, GatewayError> {
        let request = self
            .request(Method::GET, "Failed to fetch asset stats")
            .segment("stats");
        self.client().call(request).await
    }
}
