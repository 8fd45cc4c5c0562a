//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`JobId`]: Job listing identifier
//! - [`ApplicationId`]: Job application identifier
//! - [`MessageId`]: Application message identifier
//! - [`UserId`]: Auth-system identity (opaque, minted by the remote auth service)

use uuid::Uuid;

pub type JobId = Uuid;
pub type ApplicationId = Uuid;
pub type MessageId = Uuid;
pub type UserId = Uuid;

/// The four remote collections this layer snapshots. Used to name the owning
/// collection of a mutation when triggering a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Jobs,
    Applications,
    Profiles,
    Messages,
}

impl CollectionKind {
    /// Remote collection name as exposed by the gateway.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Jobs => "jobs",
            CollectionKind::Applications => "applications",
            CollectionKind::Profiles => "profiles",
            CollectionKind::Messages => "application_messages",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
