pub mod audience;
pub mod event;
pub mod session;
pub mod time;

pub use audience::*;
pub use event::*;
pub use session::*;
pub use time::*;
