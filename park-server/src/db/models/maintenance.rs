//! Maintenance Models

use serde::{Deserialize, Serialize};

/// Maintenance job lifecycle; forward-only, `done` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Done,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Done)
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintenance work order tied to one ride
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceJob {
    pub id: i64,
    pub ride_id: i64,
    pub description: String,
    pub scheduled_date: i64,
    pub status: MaintenanceStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Employee crew record attached to a job (many-to-one)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeAssignment {
    pub id: i64,
    pub maintenance_id: i64,
    pub employee_id: i64,
    pub work_date: i64,
    pub worked_hours: f64,
}

/// Schedule-maintenance request: creates the job and its first assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceCreate {
    pub ride_id: i64,
    pub employee_id: i64,
    pub description: String,
    /// YYYY-MM-DD
    pub scheduled_date: String,
    pub worked_hours: f64,
}

/// Attach-additional-crew request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub employee_id: i64,
    /// YYYY-MM-DD
    pub work_date: String,
    pub worked_hours: f64,
}
