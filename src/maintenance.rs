//! In-memory maintenance task scheduler
//!
//! Tasks live for the lifetime of the process. Ids increase monotonically
//! and are never reused, even after deletion.

use crate::core::error::{FlowError, FlowResult, require};
use crate::models::maintenance::{MaintenanceTask, NewMaintenanceTask, TaskStatus};
use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Default)]
struct Inner {
    next_id: u64,
    tasks: Vec<MaintenanceTask>,
}

/// Shared task store
#[derive(Default)]
pub struct MaintenanceStore {
    inner: Mutex<Inner>,
}

impl MaintenanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tasks ordered by due date, then id
    pub async fn list(&self) -> Vec<MaintenanceTask> {
        let mut tasks = self.inner.lock().await.tasks.clone();
        tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        tasks
    }

    /// Validate and add a pending task
    pub async fn add(&self, new_task: NewMaintenanceTask) -> FlowResult<MaintenanceTask> {
        require("task", &new_task.task)?;
        require("vehicle", &new_task.vehicle)?;
        require("due_date", &new_task.due_date)?;
        let due_date = NaiveDate::parse_from_str(new_task.due_date.trim(), "%Y-%m-%d")
            .map_err(|_| FlowError::validation("due_date", "must be a date in YYYY-MM-DD form"))?;

        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let task = MaintenanceTask {
            id: inner.next_id,
            task: new_task.task.trim().to_string(),
            vehicle: new_task.vehicle.trim().to_string(),
            due_date,
            status: TaskStatus::Pending,
        };
        inner.tasks.push(task.clone());

        info!("Maintenance task {} added for {}", task.id, task.vehicle);
        Ok(task)
    }

    /// Flip a task between pending and completed
    pub async fn toggle(&self, id: u64) -> FlowResult<MaintenanceTask> {
        let mut inner = self.inner.lock().await;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(FlowError::TaskNotFound(id))?;
        task.status = task.status.toggled();
        Ok(task.clone())
    }

    /// Remove a task
    pub async fn delete(&self, id: u64) -> FlowResult<()> {
        let mut inner = self.inner.lock().await;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        if inner.tasks.len() == before {
            return Err(FlowError::TaskNotFound(id));
        }
        info!("Maintenance task {} deleted", id);
        Ok(())
    }
}
