use http::Method;
use serde::Serialize;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::models::{
    BulkTransitionResult, WorkflowAnalytics, WorkflowState, WorkflowStep, WorkflowTemplate,
};
use crate::request::ApiRequest;
use crate::resource::{ListQuery, Resource, ResourceSpec};

const TEMPLATES: ResourceSpec =
    ResourceSpec::new("workflow/templates", "workflow template", "workflow templates");
const STEPS: ResourceSpec = ResourceSpec::new("steps", "workflow step", "workflow steps");

/// Workflow engine under `/api/workflow/`
#[derive(Debug, Clone)]
pub struct Workflow {
    client: GatewayClient,
}

impl GatewayClient {
    #[must_use]
    pub fn workflow(&self) -> Workflow {
        Workflow {
            client: self.clone(),
        }
    }
}

impl Workflow {
    #[must_use]
    pub fn templates(&self) -> Resource<WorkflowTemplate> {
        Resource::new(self.client.clone(), TEMPLATES)
    }

    /// `/api/workflow/templates/<template_id>/steps`
    #[must_use]
    pub fn steps(&self, template_id: &str) -> Resource<WorkflowStep> {
        self.templates().nested(template_id, STEPS)
    }

    /// `GET /api/workflow/state/<entity_type>/<entity_id>`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch workflow state`.
    pub async fn state(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<WorkflowState, GatewayError> {
        let request = state_request(Method::GET, entity_type, entity_id)
            .on_failure("workflow/state", "Failed to fetch workflow state");
        self.client.call(request).await
    }

    /// `POST /api/workflow/state/<entity_type>/<entity_id>/transition`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to transition workflow state`, e.g. when
    /// the gateway rejects the transition with 409 or 422.
    pub async fn transition<B: Serialize + ?Sized>(
        &self,
        entity_type: &str,
        entity_id: &str,
        body: &B,
    ) -> Result<WorkflowState, GatewayError> {
        let request = state_request(Method::POST, entity_type, entity_id)
            .segment("transition")
            .json(body)
            .on_failure("workflow/state", "Failed to transition workflow state");
        self.client.call(request).await
    }

    /// `GET /api/workflow/analytics`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to fetch workflow analytics`.
    pub async fn analytics(&self, query: &ListQuery) -> Result<WorkflowAnalytics, GatewayError> {
        let request = ApiRequest::get("workflow/analytics")
            .queries(query.pairs().iter().cloned())
            .on_failure("workflow/analytics", "Failed to fetch workflow analytics");
        self.client.call(request).await
    }

    /// `POST /api/workflow/bulk`
    ///
    /// # Errors
    /// `RequestFailed` with `Failed to run bulk transition`.
    pub async fn bulk_transition<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<BulkTransitionResult, GatewayError> {
        let request = ApiRequest::post("workflow/bulk")
            .json(body)
            .on_failure("workflow/bulk", "Failed to run bulk transition");
        self.client.call(request).await
    }
}

fn state_request(method: Method, entity_type: &str, entity_id: &str) -> ApiRequest {
    ApiRequest::new(method, "workflow/state")
        .segment(entity_type)
        .segment(entity_id)
}
