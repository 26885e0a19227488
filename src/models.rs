use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Roles ---

/// Role
///
/// Permission class of an authenticated user. Stored as lowercase text in `profiles.role`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Candidate,
    Employer,
    Admin,
}

impl Role {
    /// Parses the stored role text. Unknown or malformed values yield `None`,
    /// which the guard treats as "no role".
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "candidate" => Some(Role::Candidate),
            "employer" => Some(Role::Employer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record stored in `public.profiles`. The role is kept as raw text
/// so that a malformed value survives the round trip and is rejected by the guard
/// rather than by the row decoder.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: String,
}

impl User {
    pub fn parsed_role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }
}

/// Message
///
/// A direct message between two users, stored in `public.messages`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// InboxEntry
///
/// A received message joined with the sender's email, ready for the inbox view.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct InboxEntry {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads ---

/// RegisterUserRequest
///
/// Input payload for `POST /register`. The password is forwarded to the identity
/// provider and never stored or logged here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// SendMessageRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

// --- Dashboards ---

/// InboxCounts
///
/// Message counters for one user, computed by the repository.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[ts(export)]
pub struct InboxCounts {
    pub received: i64,
    pub unread: i64,
    pub sent: i64,
}

/// DashboardSummary
///
/// Payload of the candidate and employer dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardSummary {
    pub user_id: Uuid,
    pub role: Role,
    pub inbox: InboxCounts,
    pub recent_messages: Vec<InboxEntry>,
}

/// AdminDashboardStats
///
/// Output schema for `GET /admin/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AdminDashboardStats {
    pub total_users: i64,
    pub total_candidates: i64,
    pub total_employers: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
}
