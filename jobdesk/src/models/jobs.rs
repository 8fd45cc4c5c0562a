//! Job listing records and mutation requests.

use crate::types::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Employment type of a job listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    Internship,
    FullTime,
    PartTime,
    Contract,
    Remote,
}

/// A job listing as stored by the remote collection.
///
/// No versioning; concurrent edits are last-writer-wins at the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    /// Public object-storage URL of the company logo, when uploaded
    pub company_logo: Option<String>,
    /// Public object-storage URL of the listing image, when uploaded
    pub job_image: Option<String>,
    pub location: String,
    pub job_type: JobType,
    /// Open string - categories are not a closed set
    pub category: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub deadline: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether the listing's deadline lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline < now
    }
}

/// Insert request for a new job listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCreate {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_image: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub category: String,
    pub description: String,
    pub requirements: String,
    pub salary_range: String,
    pub deadline: DateTime<Utc>,
    pub is_active: bool,
}

/// Partial update for an existing job listing. Only the populated fields are
/// sent to the remote collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl JobUpdate {
    /// Soft active toggle - the only field changed by the activate/deactivate
    /// action on the dashboard.
    pub fn active_toggle(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_wire_names() {
        assert_eq!(serde_json::to_string(&JobType::FullTime).unwrap(), "\"full-time\"");
        assert_eq!(serde_json::to_string(&JobType::Internship).unwrap(), "\"internship\"");
        let parsed: JobType = serde_json::from_str("\"part-time\"").unwrap();
        assert_eq!(parsed, JobType::PartTime);
    }

    #[test]
    fn active_toggle_serializes_only_is_active() {
        let update = JobUpdate::active_toggle(false);
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"is_active": false}));
    }
}
