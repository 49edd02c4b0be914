pub mod ease;
pub mod rating;
pub mod review;
pub mod state;

pub use ease::EaseFactor;
pub use rating::Rating;
pub use review::ReviewLog;
pub use state::{RawSchedulingState, SchedulingState};
