//! View state store: collection snapshots plus UI-only parameters.
//!
//! Each snapshot carries a monotonically increasing fetch sequence. A refetch
//! takes a token before issuing the remote call and presents it when applying
//! the result; only the response matching the latest issued token is applied,
//! so concurrent refetches that complete out of order cannot overwrite a newer
//! snapshot with an older one.

use crate::models::{Application, ApplicationMessage, Job, UserAccount};
use crate::types::ApplicationId;
use crate::view::{ApplicationFilter, ApplicationSortKey, JobFilter, JobSortKey, Sort, UserFilter, UserSortKey};

/// Token identifying one fetch within a snapshot's request family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

/// The most recently fetched, in-memory copy of a remote collection.
#[derive(Debug)]
pub struct Snapshot<T> {
    records: Vec<T>,
    issued: u64,
    applied: u64,
    loaded: bool,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            issued: 0,
            applied: 0,
            loaded: false,
        }
    }
}

impl<T> Snapshot<T> {
    /// Reserve the next fetch sequence number. Call before issuing the remote
    /// read; hand the token back to [`Snapshot::apply`] with the result.
    pub fn begin_fetch(&mut self) -> FetchToken {
        self.issued += 1;
        FetchToken(self.issued)
    }

    /// Apply a completed fetch. Returns `false` and leaves the snapshot
    /// untouched when a later fetch has already been issued or applied, so
    /// late responses from superseded requests are dropped.
    pub fn apply(&mut self, token: FetchToken, records: Vec<T>) -> bool {
        if token.0 < self.issued || token.0 <= self.applied {
            tracing::debug!(token = token.0, latest = self.issued, "dropping stale fetch result");
            return false;
        }
        self.records = records;
        self.applied = token.0;
        self.loaded = true;
        true
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Whether at least one fetch has been applied. Aggregate stats are only
    /// consistent once every snapshot is loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Mutate the snapshot in place after a confirmed remote success, without
    /// a follow-up refetch. Only the two optimistic message operations use
    /// this.
    pub fn patch(&mut self, mutate: impl FnOnce(&mut Vec<T>)) {
        mutate(&mut self.records);
    }
}

/// Compose state for the admin reply form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    pub selected_application: Option<ApplicationId>,
    pub subject: String,
    pub body: String,
}

impl ComposeState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// All state the dashboard holds between renders: the four collection
/// snapshots and the UI-only parameters the derivation layer reads.
#[derive(Debug, Default)]
pub struct ViewState {
    pub jobs: Snapshot<Job>,
    pub applications: Snapshot<Application>,
    pub messages: Snapshot<ApplicationMessage>,
    pub users: Snapshot<UserAccount>,

    pub job_filter: JobFilter,
    pub job_sort: Sort<JobSortKey>,
    pub application_filter: ApplicationFilter,
    pub application_sort: Sort<ApplicationSortKey>,
    pub user_filter: UserFilter,
    pub user_sort: Sort<UserSortKey>,

    pub compose: ComposeState,
    /// Set while an image upload is in flight.
    pub uploading: bool,
    /// Which user-listing tier populated the users snapshot, once known.
    pub user_listing_tier: Option<&'static str>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every collection has been fetched at least once.
    pub fn fully_loaded(&self) -> bool {
        self.jobs.is_loaded() && self.applications.is_loaded() && self.messages.is_loaded() && self.users.is_loaded()
    }
}
