//! Facility repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{FacilityId, FacilityInfo};

/// Repository trait for facility (venue) lookups.
#[async_trait]
pub trait FacilityRepository: Send + Sync {
    /// Whether a facility exists and is operational. Decommissioned
    /// facilities report `false`.
    async fn facility_exists(&self, id: FacilityId) -> RepositoryResult<bool>;

    /// All operational facilities, for availability checks and listings.
    async fn get_operational_facilities(&self) -> RepositoryResult<Vec<FacilityInfo>>;
}
