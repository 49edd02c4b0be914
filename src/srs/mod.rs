pub mod sm2;

pub use sm2::{next_state, SchedulingEngine};
