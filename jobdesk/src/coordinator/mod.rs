//! Mutation coordinator: the fixed call/refetch/notify discipline.
//!
//! Every mutation follows the same sequence: issue the remote call, on success
//! refetch the owning collection exactly once and emit a success notification,
//! on failure emit an error notification and leave the snapshot in its
//! last-known-good state. Two message operations (mark-read and delete) are
//! the only exceptions: they patch the snapshot in place after a confirmed
//! remote success and skip the refetch.
//!
//! There are no retries and no caller-side timeouts; every failure is terminal
//! for that attempt and requires an explicit user-triggered retry.

pub mod directory;

pub use directory::{AdminDirectory, ProfileDirectory, SelfDirectory, UserDirectory};

use crate::config::Config;
use crate::email::EmailDispatcher;
use crate::errors::{Error, Result};
use crate::gateway::storage::{generate_object_path, BucketStore};
use crate::gateway::{Collection, Gateway, IdentityAdmin, ObjectStore};
use crate::models::users::ProfileUpdate;
use crate::models::{
    Application, ApplicationMessage, ApplicationStatus, ApplicationStatusUpdate, BanDuration, Job, JobCreate,
    JobUpdate, MessageCreate, MessageReadUpdate, Profile, UserAccount, ADMIN_REPLY,
};
use crate::notify::{Notification, Notifier};
use crate::store::ViewState;
use crate::types::{ApplicationId, JobId, MessageId, UserId};
use crate::view::{self, DashboardStats};
use bon::bon;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

pub type JobsCollection = Arc<dyn Collection<Record = Job, CreateRequest = JobCreate, UpdateRequest = JobUpdate>>;
pub type ApplicationsCollection =
    Arc<dyn Collection<Record = Application, CreateRequest = serde_json::Value, UpdateRequest = ApplicationStatusUpdate>>;
pub type ProfilesCollection = Arc<dyn Collection<Record = Profile, CreateRequest = Profile, UpdateRequest = ProfileUpdate>>;
pub type MessagesCollection =
    Arc<dyn Collection<Record = ApplicationMessage, CreateRequest = MessageCreate, UpdateRequest = MessageReadUpdate>>;

/// The authenticated admin on whose behalf the coordinator operates. Used for
/// the unread badge, as the sender of replies, and as the last-resort user
/// listing tier.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub id: UserId,
    pub email: String,
    pub full_name: Option<String>,
}

pub struct Coordinator {
    jobs: JobsCollection,
    applications: ApplicationsCollection,
    messages: MessagesCollection,
    directories: Vec<Arc<dyn UserDirectory>>,
    identity_admin: Option<Arc<dyn IdentityAdmin>>,
    objects: Arc<dyn ObjectStore>,
    email: EmailDispatcher,
    notifier: Arc<dyn Notifier>,
    admin: AdminContext,
    state: ViewState,
}

#[bon]
impl Coordinator {
    #[builder]
    pub fn new(
        jobs: JobsCollection,
        applications: ApplicationsCollection,
        messages: MessagesCollection,
        directories: Vec<Arc<dyn UserDirectory>>,
        identity_admin: Option<Arc<dyn IdentityAdmin>>,
        objects: Arc<dyn ObjectStore>,
        email: EmailDispatcher,
        notifier: Arc<dyn Notifier>,
        admin: AdminContext,
    ) -> Self {
        Self {
            jobs,
            applications,
            messages,
            directories,
            identity_admin,
            objects,
            email,
            notifier,
            admin,
            state: ViewState::new(),
        }
    }
}

impl Coordinator {
    /// Wire the coordinator to a live gateway. The user-directory chain is
    /// built from the configured capabilities: the privileged tier is present
    /// only when a service-role key is configured.
    pub fn from_gateway(gateway: &Gateway, config: &Config, admin: AdminContext, notifier: Arc<dyn Notifier>) -> Self {
        let profiles: ProfilesCollection = Arc::new(gateway.profiles());
        let identity_admin: Option<Arc<dyn IdentityAdmin>> = config
            .gateway
            .service_role_key
            .is_some()
            .then(|| Arc::new(gateway.clone()) as Arc<dyn IdentityAdmin>);

        let mut directories: Vec<Arc<dyn UserDirectory>> = Vec::new();
        if let Some(identity_admin) = identity_admin.clone() {
            directories.push(Arc::new(AdminDirectory::new(identity_admin, profiles.clone())));
        }
        directories.push(Arc::new(ProfileDirectory::new(profiles)));
        directories.push(Arc::new(SelfDirectory::new(admin.clone())));

        Coordinator::builder()
            .jobs(Arc::new(gateway.jobs()))
            .applications(Arc::new(gateway.applications()))
            .messages(Arc::new(gateway.messages()))
            .directories(directories)
            .maybe_identity_admin(identity_admin)
            .objects(Arc::new(BucketStore::new(gateway.clone(), config.storage.bucket.clone())))
            .email(EmailDispatcher::new(Arc::new(gateway.clone()), config.email.clone()))
            .notifier(notifier)
            .admin(admin)
            .build()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Mutable access for the presentation layer to adjust filters, sorts and
    /// compose state between renders.
    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn jobs_view(&self) -> Vec<&Job> {
        view::derive_jobs(self.state.jobs.records(), &self.state.job_filter, self.state.job_sort)
    }

    pub fn applications_view(&self) -> Vec<&Application> {
        view::derive_applications(
            self.state.applications.records(),
            &self.state.application_filter,
            self.state.application_sort,
        )
    }

    pub fn users_view(&self) -> Vec<&UserAccount> {
        view::derive_users(self.state.users.records(), &self.state.user_filter, self.state.user_sort)
    }

    /// Summary counts at `now`, with the current admin excluded from the
    /// unread badge.
    pub fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        view::compute_stats(
            self.state.jobs.records(),
            self.state.applications.records(),
            self.state.messages.records(),
            self.state.users.records(),
            now,
            Some(self.admin.id),
        )
    }

    // ----- refreshes -------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn refresh_jobs(&mut self) {
        let token = self.state.jobs.begin_fetch();
        match self.jobs.list().await {
            Ok(records) => {
                self.state.jobs.apply(token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load jobs")),
        }
    }

    #[instrument(skip(self))]
    pub async fn refresh_applications(&mut self) {
        let token = self.state.applications.begin_fetch();
        match self.applications.list().await {
            Ok(records) => {
                self.state.applications.apply(token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load applications")),
        }
    }

    #[instrument(skip(self))]
    pub async fn refresh_messages(&mut self) {
        let token = self.state.messages.begin_fetch();
        match self.messages.list().await {
            Ok(records) => {
                self.state.messages.apply(token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load messages")),
        }
    }

    #[instrument(skip(self))]
    pub async fn refresh_users(&mut self) {
        let token = self.state.users.begin_fetch();
        let listed = directory::list_with_fallback(&self.directories).await;
        self.apply_users(token, listed);
    }

    /// Issue all four collection fetches concurrently. Responses are applied
    /// under their sequence tokens, so completion order does not matter.
    #[instrument(skip(self))]
    pub async fn refresh_all(&mut self) {
        let jobs_token = self.state.jobs.begin_fetch();
        let applications_token = self.state.applications.begin_fetch();
        let messages_token = self.state.messages.begin_fetch();
        let users_token = self.state.users.begin_fetch();

        let (jobs, applications, messages, users) = futures::join!(
            self.jobs.list(),
            self.applications.list(),
            self.messages.list(),
            directory::list_with_fallback(&self.directories),
        );

        match jobs {
            Ok(records) => {
                self.state.jobs.apply(jobs_token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load jobs")),
        }
        match applications {
            Ok(records) => {
                self.state.applications.apply(applications_token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load applications")),
        }
        match messages {
            Ok(records) => {
                self.state.messages.apply(messages_token, records);
            }
            Err(error) => self.notifier.notify(error.notification("Could not load messages")),
        }
        self.apply_users(users_token, users);
    }

    fn apply_users(&mut self, token: crate::store::FetchToken, listed: Result<(Vec<UserAccount>, &'static str)>) {
        let primary = self.directories.first().map(|d| d.tier());
        match listed {
            Ok((users, tier)) => {
                if self.state.users.apply(token, users) {
                    if Some(tier) != primary && self.state.user_listing_tier != Some(tier) {
                        self.notifier.notify(Notification::warning(
                            "Limited user listing",
                            format!("Showing users from the {tier} source only"),
                        ));
                    }
                    self.state.user_listing_tier = Some(tier);
                }
            }
            Err(error) => self.notifier.notify(error.notification("Could not load users")),
        }
    }

    // ----- jobs ------------------------------------------------------------

    #[instrument(skip(self, create))]
    pub async fn create_job(&mut self, create: JobCreate) -> Result<()> {
        match self.jobs.insert(&create).await {
            Ok(job) => {
                tracing::info!(job_id = %job.id, "job created");
                self.refresh_jobs().await;
                self.notifier
                    .notify(Notification::success("Job created", format!("\"{}\" is now listed", job.title)));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not create job"));
                Err(error)
            }
        }
    }

    #[instrument(skip(self, update))]
    pub async fn update_job(&mut self, id: JobId, update: JobUpdate) -> Result<()> {
        match self.jobs.update(id, &update).await {
            Ok(job) => {
                self.refresh_jobs().await;
                self.notifier
                    .notify(Notification::success("Job updated", format!("\"{}\" was saved", job.title)));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not update job"));
                Err(error)
            }
        }
    }

    /// Soft activate/deactivate without touching any other field.
    #[instrument(skip(self))]
    pub async fn toggle_job_active(&mut self, id: JobId, is_active: bool) -> Result<()> {
        match self.jobs.update(id, &JobUpdate::active_toggle(is_active)).await {
            Ok(job) => {
                self.refresh_jobs().await;
                let title = if is_active { "Job activated" } else { "Job deactivated" };
                self.notifier.notify(Notification::success(title, format!("\"{}\"", job.title)));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not update job"));
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_job(&mut self, id: JobId) -> Result<()> {
        match self.jobs.delete(id).await {
            Ok(()) => {
                self.refresh_jobs().await;
                self.notifier
                    .notify(Notification::success("Job deleted", "The listing was removed"));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not delete job"));
                Err(error)
            }
        }
    }

    // ----- applications ----------------------------------------------------

    /// Unconditional status set; any status is reachable from any other.
    #[instrument(skip(self))]
    pub async fn set_application_status(&mut self, id: ApplicationId, status: ApplicationStatus) -> Result<()> {
        match self.applications.update(id, &ApplicationStatusUpdate { status }).await {
            Ok(application) => {
                self.refresh_applications().await;
                self.notifier.notify(Notification::success(
                    "Application updated",
                    format!("{} is now {}", application.full_name, status.as_str()),
                ));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not update application"));
                Err(error)
            }
        }
    }

    pub async fn accept_application(&mut self, id: ApplicationId) -> Result<()> {
        self.set_application_status(id, ApplicationStatus::Accepted).await
    }

    pub async fn reject_application(&mut self, id: ApplicationId) -> Result<()> {
        self.set_application_status(id, ApplicationStatus::Rejected).await
    }

    // ----- messages --------------------------------------------------------

    /// Send the composed reply to the selected application's applicant. The
    /// message record is the source of truth; the email is a best-effort
    /// side-channel whose failure is logged and never surfaced.
    #[instrument(skip(self))]
    pub async fn send_reply(&mut self) -> Result<()> {
        let (full_name, email, subject) = match self.reply_target() {
            Ok(target) => target,
            Err(error) => {
                self.notifier.notify(error.notification("Reply not sent"));
                return Err(error);
            }
        };
        let create = MessageCreate {
            full_name,
            email,
            subject,
            message: self.state.compose.body.trim().to_string(),
            message_type: ADMIN_REPLY.to_string(),
            sender_id: Some(self.admin.id),
        };
        match self.messages.insert(&create).await {
            Ok(message) => {
                if let Err(error) = self
                    .email
                    .send_reply(&message.email, &message.full_name, &message.subject, &message.message)
                    .await
                {
                    tracing::warn!(%error, "reply email dispatch failed, message record kept");
                }
                self.state.compose.clear();
                self.refresh_messages().await;
                self.notifier.notify(Notification::success(
                    "Reply sent",
                    format!("Your reply to {} was recorded", message.full_name),
                ));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Reply not sent"));
                Err(error)
            }
        }
    }

    /// Validate the compose state and resolve the applicant to reply to.
    fn reply_target(&self) -> Result<(String, String, String)> {
        if self.state.compose.body.trim().is_empty() {
            return Err(Error::Validation {
                message: "Message body cannot be empty".to_string(),
            });
        }
        let id = self.state.compose.selected_application.ok_or_else(|| Error::Validation {
            message: "Select an application to reply to".to_string(),
        })?;
        let application = self
            .state
            .applications
            .records()
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::NotFound {
                resource: "applications".to_string(),
                id: id.to_string(),
            })?;
        let subject = if self.state.compose.subject.trim().is_empty() {
            match application.job_title() {
                "" => "Regarding your application".to_string(),
                title => format!("Regarding your application for {title}"),
            }
        } else {
            self.state.compose.subject.trim().to_string()
        };
        Ok((application.full_name.clone(), application.email.clone(), subject))
    }

    /// Optimistic: the snapshot row is replaced with the authoritative record
    /// after confirmed success, with no refetch.
    #[instrument(skip(self))]
    pub async fn mark_message_read(&mut self, id: MessageId) -> Result<()> {
        match self.messages.update(id, &MessageReadUpdate { is_read: true }).await {
            Ok(updated) => {
                self.state.messages.patch(|records| {
                    if let Some(record) = records.iter_mut().find(|m| m.id == id) {
                        *record = updated;
                    }
                });
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not update message"));
                Err(error)
            }
        }
    }

    /// Optimistic: the row is removed from the snapshot after confirmed
    /// success, with no refetch.
    #[instrument(skip(self))]
    pub async fn delete_message(&mut self, id: MessageId) -> Result<()> {
        match self.messages.delete(id).await {
            Ok(()) => {
                self.state.messages.patch(|records| records.retain(|m| m.id != id));
                self.notifier
                    .notify(Notification::success("Message deleted", "The message was removed"));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not delete message"));
                Err(error)
            }
        }
    }

    // ----- storage ---------------------------------------------------------

    /// Upload an image for the pending create/edit form, returning the public
    /// URL to write into its image field. The content type is guessed from the
    /// original filename; there is no content validation beyond that.
    #[instrument(skip(self, bytes))]
    pub async fn upload_image(&mut self, original_filename: &str, bytes: Bytes) -> Result<String> {
        self.state.uploading = true;
        let path = generate_object_path(original_filename);
        let content_type = mime_guess::from_path(original_filename).first_or_octet_stream();
        let result = self.objects.upload(&path, bytes, content_type.essence_str()).await;
        self.state.uploading = false;
        match result {
            Ok(url) => Ok(url),
            Err(error) => {
                self.notifier.notify(error.notification("Image upload failed"));
                Err(error)
            }
        }
    }

    // ----- users -----------------------------------------------------------

    fn require_identity_admin(&self, operation: &str) -> Result<Arc<dyn IdentityAdmin>> {
        self.identity_admin.clone().ok_or_else(|| Error::MissingCapability {
            operation: operation.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&mut self, id: UserId) -> Result<()> {
        let identity_admin = match self.require_identity_admin("delete user") {
            Ok(identity_admin) => identity_admin,
            Err(error) => {
                self.notifier.notify(error.notification("Could not delete user"));
                return Err(error);
            }
        };
        match identity_admin.delete_identity(id).await {
            Ok(()) => {
                self.refresh_users().await;
                self.notifier
                    .notify(Notification::success("User deleted", "The account was removed"));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not delete user"));
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn set_user_ban(&mut self, id: UserId, duration: BanDuration) -> Result<()> {
        let identity_admin = match self.require_identity_admin("update ban status") {
            Ok(identity_admin) => identity_admin,
            Err(error) => {
                self.notifier.notify(error.notification("Could not update user"));
                return Err(error);
            }
        };
        match identity_admin.set_ban(id, duration).await {
            Ok(()) => {
                self.refresh_users().await;
                let (title, message) = match duration {
                    BanDuration::Permanent => ("User banned", "The account can no longer sign in"),
                    BanDuration::None => ("Ban lifted", "The account can sign in again"),
                };
                self.notifier.notify(Notification::success(title, message));
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(error.notification("Could not update user"));
                Err(error)
            }
        }
    }
}
