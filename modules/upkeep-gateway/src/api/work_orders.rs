use http::Method;
use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{ResourceStats, WorkOrder};
use crate::resource::{Resource, ResourceSpec};

const WORK_ORDERS: ResourceSpec = ResourceSpec::new("work-orders", "work order", "work orders");

impl GatewayClient {
    /// `/api/work-orders`
    #[must_use]
    pub fn work_orders(&self) -> Resource<WorkOrder> {
        Resource::new(self.clone(), WORK_ORDERS)
    }
}

impl Resource<WorkOrder> {
    /// `GET /api/work-orders/stats`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch work order stats`.
    pub async fn stats(&self) -> Result<ResourceStats, GatewayError> {
        let request = self
            .request(Method::GET, "Failed to fetch work order stats")
            .segment("stats");
        self.client().call(request).await
    }

    /// `POST /api/work-orders/<id>/complete`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to complete work order`.
    pub async fn complete<B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
    ) -> Result<WorkOrder, GatewayError> {
        let request = self
            .item_request(Method::POST, id, "Failed to complete work order")
            .segment("complete")
            .json(body);
        self.call_item(request).await
    }

    /// `PATCH /api/work-orders/<id>/assign`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to assign work order`.
    pub async fn assign<B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
    ) -> Result<WorkOrder, GatewayError> {
        let request = self
            .item_request(Method::PATCH, id, "Failed to assign work order")
            .segment("assign")
            .json(body);
        self.call_item(request).await
    }
}
