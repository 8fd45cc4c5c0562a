//! Applicant messages and admin replies.

use crate::types::{MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message type written when an admin replies from the dashboard. The column
/// is an open string - other writers use their own type tags.
pub const ADMIN_REPLY: &str = "admin_reply";

/// A message row, optionally joined with the sender identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationMessage {
    pub id: MessageId,
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sender_id: Option<UserId>,
}

impl ApplicationMessage {
    /// Whether the message counts towards the unread badge for `admin_id`:
    /// unread, and not sent by that admin.
    pub fn is_unread_for(&self, admin_id: Option<UserId>) -> bool {
        if self.is_read {
            return false;
        }
        match (self.sender_id, admin_id) {
            (Some(sender), Some(admin)) => sender != admin,
            _ => true,
        }
    }
}

/// Insert request for a new message record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<UserId>,
}

/// Read-flag update, the only field mutated independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageReadUpdate {
    pub is_read: bool,
}
