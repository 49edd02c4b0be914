//! Review submission: load state, run the engine, persist, log.

use chrono::{DateTime, Utc};

use crate::config::SchedulerConfig;
use crate::domain::{Rating, ReviewLog, SchedulingState};
use crate::error::SchedulingError;
use crate::srs::SchedulingEngine;
use crate::store::{CardId, SchedulingStore};

pub struct ReviewService<S> {
  store: S,
  engine: SchedulingEngine,
  config: SchedulerConfig,
}

impl<S: SchedulingStore> ReviewService<S> {
  pub fn new(store: S, config: SchedulerConfig) -> Self {
    Self {
      store,
      engine: SchedulingEngine,
      config,
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  /// Create the initial scheduling state for a new card
  pub fn register_card(&self, card_id: CardId, now: DateTime<Utc>) -> Result<SchedulingState, SchedulingError> {
    let state = SchedulingState::new(now);
    if !self.store.insert_new(card_id, &state)? {
      return Err(SchedulingError::DuplicateCard(card_id));
    }
    tracing::debug!("Registered card {} for scheduling", card_id);
    Ok(state)
  }

  /// Apply one review to a card as a single read-modify-write.
  pub fn submit_review(
    &self,
    card_id: CardId,
    rating: Rating,
    now: DateTime<Utc>,
  ) -> Result<ReviewLog, SchedulingError> {
    let engine = self.engine;
    let cap = self.config.max_interval_days;

    let log = self
      .store
      .update(card_id, |previous| {
        let mut next = engine.next(previous, rating, now);
        if let Some(max_days) = cap {
          next = next.with_interval_cap(max_days, now);
        }
        (next, ReviewLog::new(card_id, rating, now, previous, next))
      })?
      .ok_or(SchedulingError::CardNotFound(card_id))?;

    tracing::debug!(
      "Card {} rated {}: interval {} -> {} days, ease {} -> {}, next review {}",
      card_id,
      rating,
      log.previous.interval_days(),
      log.next.interval_days(),
      log.previous.ease_factor(),
      log.next.ease_factor(),
      log.next.next_review_date()
    );
    Ok(log)
  }

  /// Due cards as of `now`, limited by the configured batch size
  pub fn due_cards(&self, now: DateTime<Utc>) -> Result<Vec<CardId>, SchedulingError> {
    Ok(self.store.due_cards(now, self.config.due_limit)?)
  }

  /// Interval each rating would produce, without persisting anything
  pub fn preview(&self, card_id: CardId, now: DateTime<Utc>) -> Result<[(Rating, SchedulingState); 4], SchedulingError> {
    let current = self
      .store
      .load(card_id)?
      .ok_or(SchedulingError::CardNotFound(card_id))?;
    let mut outcomes = self.engine.preview(current, now);
    if let Some(max_days) = self.config.max_interval_days {
      for (_, state) in outcomes.iter_mut() {
        *state = state.with_interval_cap(max_days, now);
      }
    }
    Ok(outcomes)
  }
}
