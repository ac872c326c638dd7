use serde::{Deserialize, Serialize};

use super::Extra;

/// Preventive maintenance schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmSchedule {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_plan_id: Option<String>,
    /// Calendar unit of the interval (`days`, `weeks`, ...) or a meter trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmMaterial {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_schedule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Person responsible for a PM schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmAssignment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_schedule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One execution of a PM schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmHistoryEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm_schedule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
