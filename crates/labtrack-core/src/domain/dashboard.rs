use serde::{Deserialize, Serialize};

/// Aggregate counters for the landing page. User totals are only filled for admins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inactive_users: Option<u64>,
    pub total_devices: u64,
    pub active_devices: u64,
    pub inactive_devices: u64,
    pub total_reactors: u64,
    pub active_reactors: u64,
    pub inactive_reactors: u64,
    pub experiments_run_today: u64,
    pub experiments_run_this_week: u64,
    pub average_experiment_duration_seconds: f64,
}
