use http::Method;
use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::InventoryItem;
use crate::resource::{Resource, ResourceSpec};

const INVENTORY: ResourceSpec =
    ResourceSpec::new("inventory", "inventory item", "inventory items");

impl GatewayClient {
    /// `/api/inventory`
    #[must_use]
    pub fn inventory(&self) -> Resource<InventoryItem> {
        Resource::new(self.clone(), INVENTORY)
    }
}

impl Resource<InventoryItem> {
    /// `POST /api/inventory/<id>/adjust`, e.g. `{"delta": -2, "reason": "used on WO-12"}`.
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to adjust stock`.
    pub async fn adjust_stock<B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
    ) -> Result<InventoryItem, GatewayError> {
        let request = self
            .item_request(Method::POST, id, "Failed to adjust stock")
            .segment("adjust")
            .json(body);
        self.call_item(request).await
    }
}
