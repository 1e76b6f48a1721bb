//! Event domain model: lifecycle status, actors, registration settings and
//! the audit trail.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{AudienceConfig, SessionConfig};
use crate::api::{EventId, FacilityId, UserId};

/// Lifecycle status of an event. Exactly one holds at any time.
///
/// `completed` and `cancelled` are terminal; no further mutation is
/// permitted once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Draft,
    PendingApproval,
    Approved,
    Published,
    Completed,
    Cancelled,
}

impl LifecycleStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleStatus::Completed | LifecycleStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Draft => "draft",
            LifecycleStatus::PendingApproval => "pending_approval",
            LifecycleStatus::Approved => "approved",
            LifecycleStatus::Published => "published",
            LifecycleStatus::Completed => "completed",
            LifecycleStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(LifecycleStatus::Draft),
            "pending_approval" => Ok(LifecycleStatus::PendingApproval),
            "approved" => Ok(LifecycleStatus::Approved),
            "published" => Ok(LifecycleStatus::Published),
            "completed" => Ok(LifecycleStatus::Completed),
            "cancelled" => Ok(LifecycleStatus::Cancelled),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

/// Who may see an event once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Internal,
    Student,
    Public,
}

/// Actor roles understood by the governance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Teacher,
    Staff,
    Student,
    Parent,
}

impl Role {
    /// Roles allowed to own (create) events.
    pub fn can_own_events(&self) -> bool {
        matches!(self, Role::Admin | Role::Teacher | Role::Staff)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TEACHER" => Ok(Role::Teacher),
            "STAFF" => Ok(Role::Staff),
            "STUDENT" => Ok(Role::Student),
            "PARENT" => Ok(Role::Parent),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// The authenticated caller of a governance operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, event: &Event) -> bool {
        self.user_id == event.owner_user_id
    }
}

/// Registration metadata for events that take sign-ups.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistrationSettings {
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opens_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
}

/// Workflow audit trail.
///
/// A stamp is set only when its transition has occurred and is cleared
/// when a prior transition is invalidated: rejection clears the approval
/// stamps, approval clears the rejection stamps, and a forced re-approval
/// clears both approval and publication.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditTrail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl AuditTrail {
    pub fn clear_approval(&mut self) {
        self.approved_by = None;
        self.approved_at = None;
        self.approval_comment = None;
    }

    pub fn clear_rejection(&mut self) {
        self.rejected_by = None;
        self.rejected_at = None;
        self.rejection_comment = None;
    }

    pub fn clear_publication(&mut self) {
        self.published_at = None;
    }
}

/// A school event.
///
/// Mutated only through the lifecycle controller; never hard-deleted
/// except via the explicit bulk-delete operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
    pub audience: AudienceConfig,
    pub sessions: SessionConfig,
    #[serde(default)]
    pub scanner_ids: Vec<UserId>,
    pub visibility: Visibility,
    #[serde(default)]
    pub registration: RegistrationSettings,
    pub status: LifecycleStatus,
    #[serde(default)]
    pub audit: AuditTrail,
    pub owner_user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// A fresh draft owned by the given user.
    pub fn draft(owner_user_id: UserId, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: EventId::generate(),
            title,
            description: None,
            poster_url: None,
            start_date: None,
            end_date: None,
            facility_id: None,
            audience: AudienceConfig::all_students(),
            sessions: SessionConfig::default(),
            scanner_ids: Vec::new(),
            visibility: Visibility::Internal,
            registration: RegistrationSettings::default(),
            status: LifecycleStatus::Draft,
            audit: AuditTrail::default(),
            owner_user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
