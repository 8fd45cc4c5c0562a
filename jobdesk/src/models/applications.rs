//! Job application records and status updates.

use crate::types::{ApplicationId, JobId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of an application.
///
/// Transitions are admin-initiated and unconditional: any status is reachable
/// from any other. The layer does not enforce a transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Interviewed,
    Offered,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Offered => "offered",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// The job columns embedded into an application row by the join select
/// (`select=*,job:jobs(id,title)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub title: String,
}

/// An application as returned by the remote collection, with its job embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub full_name: String,
    pub email: String,
    pub status: ApplicationStatus,
    pub job_id: JobId,
    /// Embedded join target; absent if the referenced job was deleted
    #[serde(default)]
    pub job: Option<JobSummary>,
    pub created_at: DateTime<Utc>,
}

impl Application {
    /// Title of the referenced job, used by the free-text search predicate.
    pub fn job_title(&self) -> &str {
        self.job.as_ref().map(|j| j.title.as_str()).unwrap_or("")
    }
}

/// Status-only update sent when an admin accepts, rejects, or otherwise moves
/// an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn status_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&ApplicationStatus::Shortlisted).unwrap(), "\"shortlisted\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Pending);
    }

    #[test]
    fn deserializes_with_and_without_embedded_job() {
        let id = Uuid::new_v4();
        let job_id = Uuid::new_v4();
        let with_job = serde_json::json!({
            "id": id,
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "status": "pending",
            "job_id": job_id,
            "job": {"id": job_id, "title": "Backend Intern"},
            "created_at": "2025-06-01T12:00:00Z",
        });
        let app: Application = serde_json::from_value(with_job).unwrap();
        assert_eq!(app.job_title(), "Backend Intern");

        let without_job = serde_json::json!({
            "id": id,
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "status": "pending",
            "job_id": job_id,
            "created_at": "2025-06-01T12:00:00Z",
        });
        let app: Application = serde_json::from_value(without_job).unwrap();
        assert_eq!(app.job_title(), "");
    }
}
