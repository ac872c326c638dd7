use crate::client::GatewayClient;
use crate::models::{JobPlan, JobPlanPart, JobPlanTask, JobPlanTool};
use crate::resource::{Resource, ResourceSpec};

const JOB_PLANS: ResourceSpec = ResourceSpec::new("job-plans", "job plan", "job plans");
const TASKS: ResourceSpec = ResourceSpec::new("tasks", "job plan task", "job plan tasks");
const PARTS: ResourceSpec = ResourceSpec::new("parts", "job plan part", "job plan parts");
const TOOLS: ResourceSpec = ResourceSpec::new("tools", "job plan tool", "job plan tools");

impl GatewayClient {
    /// `/api/job-plans`
    #[must_use]
    pub fn job_plans(&self) -> Resource<JobPlan> {
        Resource::new(self.clone(), JOB_PLANS)
    }
}

impl Resource<JobPlan> {
    /// `/api/job-plans/<plan_id>/tasks`
    #[must_use]
    pub fn tasks(&self, plan_id: &str) -> Resource<JobPlanTask> {
        self.nested(plan_id, TASKS)
    }

    /// `/api/job-plans/<plan_id>/parts`
    #[must_use]
    pub fn parts(&self, plan_id: &str) -> Resource<JobPlanPart> {
        self.nested(plan_id, PARTS)
    }

    /// `/api/job-plans/<plan_id>/tools`
    #[must_use]
    pub fn tools(&self, plan_id: &str) -> Resource<JobPlanTool> {
        self.nested(plan_id, TOOLS)
    }
}
