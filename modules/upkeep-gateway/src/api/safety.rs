use crate::client::GatewayClient;
use crate::models::{CorrectiveAction, Incident, Precaution};
use crate::resource::{Resource, ResourceSpec};

const INCIDENTS: ResourceSpec = ResourceSpec::new("safety/incidents", "incident", "incidents");
const PRECAUTIONS: ResourceSpec =
    ResourceSpec::new("safety/precautions", "precaution", "precautions");
const CAPA: ResourceSpec = ResourceSpec::new("safety/capa", "CAPA", "CAPAs");

/// Safety collections under `/api/safety/`
#[derive(Debug, Clone)]
pub struct Safety {
    client: GatewayClient,
}

impl Safety {
    #[must_use]
    pub fn incidents(&self) -> Resource<Incident> {
        Resource::new(self.client.clone(), INCIDENTS)
    }

    #[must_use]
    pub fn precautions(&self) -> Resource<Precaution> {
        Resource::new(self.client.clone(), PRECAUTIONS)
    }

    /// Corrective and preventive actions
    #[must_use]
    pub fn capa(&self) -> Resource<CorrectiveAction> {
        Resource::new(self.client.clone(), CAPA)
    }
}

impl GatewayClient {
    #[must_use]
    pub fn safety(&self) -> Safety {
        Safety {
            client: self.clone(),
        }
    }
}
