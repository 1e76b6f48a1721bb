//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::clock::{Clock, SystemClock};
use crate::services::events::EventService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// Override the clock, mainly for tests.
    pub fn with_clock(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Event service bound to this state's repository and clock.
    pub fn events(&self) -> EventService {
        EventService::new(self.repository.clone(), self.clock.clone())
    }
}
