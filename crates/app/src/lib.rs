pub mod actions;
pub mod generate;
pub mod invalidate;
pub mod router;
pub mod state;
pub mod upload;

pub use actions::{ActionOutcome, Actions};
pub use invalidate::{CacheInvalidator, LoggingInvalidator, Target};
pub use state::AppState;
