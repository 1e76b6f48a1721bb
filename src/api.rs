//! Public API surface for the event governance backend.
//!
//! This file consolidates the identifier newtypes and shared DTO types used
//! across the repository contract, the service layer and the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::models::{LifecycleStatus, SessionConfig, StudentContext, Visibility};

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(value: Uuid) -> Self {
                $name(value)
            }

            /// Generate a fresh random identifier.
            pub fn generate() -> Self {
                $name(Uuid::new_v4())
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                $name(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Event identifier (primary key).
    EventId
);
uuid_id!(
    /// Facility (venue) identifier.
    FacilityId
);
uuid_id!(
    /// Student identifier.
    StudentId
);
uuid_id!(
    /// Class-section identifier.
    SectionId
);
uuid_id!(
    /// Grade-level identifier.
    LevelId
);
uuid_id!(
    /// Account identifier for any actor (teacher, staff, admin, guardian).
    UserId
);

/// An operational facility as exposed by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityInfo {
    pub id: FacilityId,
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

/// Lightweight projection of an existing event used by the venue
/// availability checker. Only the fields the overlap scan needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBooking {
    pub id: EventId,
    pub title: String,
    pub facility_id: Option<FacilityId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub session_config: SessionConfig,
}

/// Filters accepted by the event listing queries.
///
/// `page` is 1-based. `disable_pagination` returns the full result set and
/// is meant for internal callers that post-filter (audience scoping).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFilters {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Vec<LifecycleStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibilities: Option<Vec<Visibility>>,
    #[serde(default)]
    pub disable_pagination: bool,
}

impl Default for EventFilters {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            facility_id: None,
            search_term: None,
            owner_user_id: None,
            statuses: None,
            visibilities: None,
            disable_pagination: false,
        }
    }
}

impl EventFilters {
    /// Filters that return every matching row, unpaginated.
    pub fn unpaginated() -> Self {
        Self {
            disable_pagination: true,
            ..Self::default()
        }
    }
}
