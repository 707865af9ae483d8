//! Maintenance task records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceTask {
    pub id: u64,
    pub task: String,
    pub vehicle: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
}

/// Body of a task creation request; `due_date` is `YYYY-MM-DD`
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaintenanceTask {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub vehicle: String,
    #[serde(default)]
    pub due_date: String,
}
