//! Service layer: validation, lifecycle control, audience resolution,
//! schedule checking and venue availability on top of the repository
//! contract.

pub mod audience;
pub mod availability;
pub mod clock;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod schedule;

pub use clock::{Clock, SystemClock};
pub use error::{FieldError, ServiceError, ServiceResult};
pub use events::{CreateEventRequest, EventPage, EventService, UpdateEventRequest};
pub use lifecycle::WorkflowAction;

#[cfg(test)]
#[path = "availability_tests.rs"]
mod availability_tests;
#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
#[cfg(test)]
#[path = "schedule_tests.rs"]
mod schedule_tests;
