//! Repository contract consumed by the governance engine.
//!
//! The traits here are the only persistence surface the core logic sees;
//! SQL/ORM details live entirely behind them.

pub mod error;
pub mod event;
pub mod facility;
pub mod student;

pub use error::{RepositoryError, RepositoryResult};
pub use event::EventRepository;
pub use facility::FacilityRepository;
pub use student::StudentRepository;

use async_trait::async_trait;

/// Complete persistence surface: event CRUD, facility lookups and the
/// student population queries, plus a connectivity probe.
#[async_trait]
pub trait FullRepository: EventRepository + FacilityRepository + StudentRepository {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
