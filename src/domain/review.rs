use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Rating, SchedulingState};
use crate::store::CardId;

/// Audit record for one review: the state before and after the transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
  pub card_id: CardId,
  pub rating: Rating,
  pub reviewed_at: DateTime<Utc>,
  pub previous: SchedulingState,
  pub next: SchedulingState,
}

impl ReviewLog {
  pub fn new(
    card_id: CardId,
    rating: Rating,
    reviewed_at: DateTime<Utc>,
    previous: SchedulingState,
    next: SchedulingState,
  ) -> Self {
    Self {
      card_id,
      rating,
      reviewed_at,
      previous,
      next,
    }
  }

  /// True if this review broke a streak of successful reviews
  pub fn is_lapse(&self) -> bool {
    !self.rating.is_correct() && self.previous.repetitions() > 0
  }
}
