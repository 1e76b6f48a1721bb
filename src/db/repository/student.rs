//! Student population repository trait.

use async_trait::async_trait;
use std::collections::HashMap;

use super::error::RepositoryResult;
use crate::api::{LevelId, SectionId, UserId};
use crate::models::StudentContext;

/// Repository trait for the population-counting and membership queries the
/// audience rule engine consumes.
///
/// All counts are over *active* students only.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Total number of active students.
    async fn count_active_students(&self) -> RepositoryResult<i64>;

    /// Number of active students enrolled in any of the given levels.
    async fn count_students_by_levels(&self, ids: &[LevelId]) -> RepositoryResult<i64>;

    /// Number of active students enrolled in any of the given sections.
    async fn count_students_by_sections(&self, ids: &[SectionId]) -> RepositoryResult<i64>;

    /// Display names for the given levels. Unknown ids are omitted from
    /// the map.
    async fn get_level_names(
        &self,
        ids: &[LevelId],
    ) -> RepositoryResult<HashMap<LevelId, String>>;

    /// Group memberships of the students linked to a user account: the
    /// student's own context for a student account, one context per child
    /// for a guardian account.
    async fn get_student_contexts_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<StudentContext>>;
}
