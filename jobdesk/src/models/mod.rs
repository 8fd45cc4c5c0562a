//! Remote record types and mutation request types.
//!
//! These mirror the rows held by the managed backend. The layer never owns
//! them: it holds transient snapshots and sends create/update requests built
//! from the request types in each submodule.

pub mod applications;
pub mod jobs;
pub mod messages;
pub mod users;

pub use applications::{Application, ApplicationStatus, ApplicationStatusUpdate, JobSummary};
pub use jobs::{Job, JobCreate, JobType, JobUpdate};
pub use messages::{ApplicationMessage, MessageCreate, MessageReadUpdate, ADMIN_REPLY};
pub use users::{AccountStatus, AuthIdentity, BanDuration, Profile, Role, UserAccount};
