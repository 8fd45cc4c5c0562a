//! Pure derivation layer.
//!
//! Everything here is a pure function over an in-memory snapshot: filtering,
//! sorting, and the aggregate counts the dashboard summary cards display.
//! Nothing mutates the snapshot, nothing performs I/O, and empty input yields
//! empty or zero output. Time-dependent counts (expired jobs, recently active
//! users) take the evaluation instant as a parameter so they stay testable.

use crate::models::{Application, ApplicationMessage, ApplicationStatus, Job, JobType, UserAccount};
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        SortDirection::Descending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSortKey {
    CreatedAt,
    Title,
    Company,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSortKey {
    CreatedAt,
    FullName,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortKey {
    CreatedAt,
    Email,
    LastSignIn,
}

/// Single-key sort configuration. Ties are left in whatever order the sort
/// produces; stability is not required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl Default for Sort<JobSortKey> {
    fn default() -> Self {
        Sort {
            key: JobSortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl Default for Sort<ApplicationSortKey> {
    fn default() -> Self {
        Sort {
            key: ApplicationSortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl Default for Sort<UserSortKey> {
    fn default() -> Self {
        Sort {
            key: UserSortKey::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

/// Free-text filter over job title, company, and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFilter {
    pub search: String,
}

/// Free-text filter over applicant name, email, and the referenced job title,
/// conjoined with an optional exact status match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub search: String,
    pub status: Option<ApplicationStatus>,
}

/// Free-text filter over user email and full name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFilter {
    pub search: String,
}

/// Case-insensitive substring match. An empty needle matches everything.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

/// Filter and sort the jobs snapshot into the sequence to render.
pub fn derive_jobs<'a>(jobs: &'a [Job], filter: &JobFilter, sort: Sort<JobSortKey>) -> Vec<&'a Job> {
    let needle = filter.search.to_lowercase();
    let mut view: Vec<&Job> = jobs
        .iter()
        .filter(|job| {
            contains_ci(&job.title, &needle) || contains_ci(&job.company, &needle) || contains_ci(&job.category, &needle)
        })
        .collect();
    view.sort_unstable_by(|a, b| {
        let ordering = match sort.key {
            JobSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            JobSortKey::Title => a.title.cmp(&b.title),
            JobSortKey::Company => a.company.cmp(&b.company),
            JobSortKey::Deadline => a.deadline.cmp(&b.deadline),
        };
        sort.direction.apply(ordering)
    });
    view
}

/// Filter and sort the applications snapshot into the sequence to render.
pub fn derive_applications<'a>(
    applications: &'a [Application],
    filter: &ApplicationFilter,
    sort: Sort<ApplicationSortKey>,
) -> Vec<&'a Application> {
    let needle = filter.search.to_lowercase();
    let mut view: Vec<&Application> = applications
        .iter()
        .filter(|app| {
            let text_match = contains_ci(&app.full_name, &needle)
                || contains_ci(&app.email, &needle)
                || contains_ci(app.job_title(), &needle);
            let status_match = filter.status.map_or(true, |status| app.status == status);
            text_match && status_match
        })
        .collect();
    view.sort_unstable_by(|a, b| {
        let ordering = match sort.key {
            ApplicationSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            ApplicationSortKey::FullName => a.full_name.cmp(&b.full_name),
            ApplicationSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        };
        sort.direction.apply(ordering)
    });
    view
}

/// Filter and sort the users snapshot into the sequence to render.
pub fn derive_users<'a>(users: &'a [UserAccount], filter: &UserFilter, sort: Sort<UserSortKey>) -> Vec<&'a UserAccount> {
    let needle = filter.search.to_lowercase();
    let mut view: Vec<&UserAccount> = users
        .iter()
        .filter(|user| {
            contains_ci(&user.email, &needle) || contains_ci(user.full_name.as_deref().unwrap_or(""), &needle)
        })
        .collect();
    view.sort_unstable_by(|a, b| {
        let ordering = match sort.key {
            UserSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            UserSortKey::Email => a.email.cmp(&b.email),
            UserSortKey::LastSignIn => a.last_sign_in_at.cmp(&b.last_sign_in_at),
        };
        sort.direction.apply(ordering)
    });
    view
}

/// Aggregate counts for the dashboard summary cards.
///
/// Recomputed on every render from the current snapshots; never cached, so
/// each count is only as fresh as the last fetch of its collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub internships: usize,
    pub full_time: usize,
    pub total_applications: usize,
    pub pending_applications: usize,
    pub unread_messages: usize,
    pub users: usize,
    pub active_users: usize,
}

/// Compute the summary counts at the evaluation instant `now`. `admin_id`
/// excludes the current admin's own replies from the unread count.
pub fn compute_stats(
    jobs: &[Job],
    applications: &[Application],
    messages: &[ApplicationMessage],
    users: &[UserAccount],
    now: DateTime<Utc>,
    admin_id: Option<UserId>,
) -> DashboardStats {
    DashboardStats {
        total: jobs.len(),
        active: jobs.iter().filter(|j| j.is_active).count(),
        expired: jobs.iter().filter(|j| j.is_expired(now)).count(),
        internships: jobs.iter().filter(|j| j.job_type == JobType::Internship).count(),
        full_time: jobs.iter().filter(|j| j.job_type == JobType::FullTime).count(),
        total_applications: applications.len(),
        pending_applications: applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count(),
        unread_messages: messages.iter().filter(|m| m.is_unread_for(admin_id)).count(),
        users: users.len(),
        active_users: users.iter().filter(|u| u.is_recently_active(now)).count(),
    }
}
