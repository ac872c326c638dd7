use crate::client::GatewayClient;
use crate::models::Person;
use crate::resource::{Resource, ResourceSpec};

const PEOPLE: ResourceSpec = ResourceSpec::new("people", "person", "people");

impl GatewayClient {
    /// `/api/people`
    #[must_use]
    pub fn people(&self) -> Resource<Person> {
        Resource::new(self.clone(), PEOPLE)
    }
}
