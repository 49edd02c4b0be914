//! Storage seam for scheduling state.
//!
//! The engine never touches storage; the review service drives a
//! [`SchedulingStore`] through a single read-modify-write per review.

pub mod memory;

use chrono::{DateTime, Utc};

use crate::domain::SchedulingState;

pub use memory::InMemoryStore;

pub type CardId = i64;

/// Error returned when the backing store cannot serve a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
  /// Lock poisoned or backend unreachable
  Unavailable,
  /// Stored data could not be decoded into a valid state
  Corrupt(String),
}

impl std::fmt::Display for StoreError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unavailable => write!(f, "Scheduling store unavailable"),
      Self::Corrupt(reason) => write!(f, "Corrupt scheduling data: {}", reason),
    }
  }
}

impl std::error::Error for StoreError {}

pub trait SchedulingStore {
  fn load(&self, card_id: CardId) -> Result<Option<SchedulingState>, StoreError>;

  fn save(&self, card_id: CardId, state: &SchedulingState) -> Result<(), StoreError>;

  /// Store `state` only if the card has none yet. Returns false when the card
  /// already exists, leaving its state untouched.
  fn insert_new(&self, card_id: CardId, state: &SchedulingState) -> Result<bool, StoreError>;

  /// Cards with `next_review_date <= at`, oldest due date first, ties by id
  fn due_cards(&self, at: DateTime<Utc>, limit: usize) -> Result<Vec<CardId>, StoreError>;

  /// Load, transform and save one card as a single step with respect to other
  /// writers of the same card. Returns `None` when the card is unknown.
  fn update<T, F>(&self, card_id: CardId, f: F) -> Result<Option<T>, StoreError>
  where
    F: FnOnce(SchedulingState) -> (SchedulingState, T);
}
