//! SM-2 spaced repetition scheduling.
//!
//! [`srs::SchedulingEngine`] is a pure function from a card's
//! [`domain::SchedulingState`] and a [`domain::Rating`] to the next state.
//! Everything else in the crate is the thin collaborator layer around it.

pub mod config;
pub mod domain;
pub mod error;
pub mod review;
pub mod srs;
pub mod store;

pub use domain::{EaseFactor, Rating, ReviewLog, SchedulingState};
pub use error::SchedulingError;
pub use srs::{next_state, SchedulingEngine};
