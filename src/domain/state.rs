use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::EaseFactor;
use crate::error::SchedulingError;

/// Per-card SM-2 scheduling record.
///
/// Only [`SchedulingState::new`] and the scheduling engine produce values;
/// anything loaded from storage goes through [`SchedulingState::from_parts`]
/// or serde, both of which validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedulingState", into = "RawSchedulingState")]
pub struct SchedulingState {
  next_review_date: DateTime<Utc>,
  interval_days: u32,
  repetitions: u32,
  ease_factor: EaseFactor,
}

/// Unvalidated wire/storage shape of [`SchedulingState`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSchedulingState {
  pub next_review_date: DateTime<Utc>,
  pub interval_days: i64,
  pub repetitions: i64,
  pub ease_factor: EaseFactor,
}

impl SchedulingState {
  /// Initial state for a freshly created card, due immediately.
  pub fn new(now: DateTime<Utc>) -> Self {
    Self {
      next_review_date: now,
      interval_days: 1,
      repetitions: 0,
      ease_factor: EaseFactor::INITIAL,
    }
  }

  /// Rebuild a state from stored columns, rejecting anything out of invariant.
  pub fn from_parts(
    next_review_date: DateTime<Utc>,
    interval_days: i64,
    repetitions: i64,
    ease_hundredths: i64,
  ) -> Result<Self, SchedulingError> {
    if ease_hundredths < i64::from(EaseFactor::MIN.hundredths()) {
      return Err(SchedulingError::EaseBelowFloor(ease_hundredths));
    }
    let ease_hundredths = u32::try_from(ease_hundredths)
      .map_err(|_| SchedulingError::InvalidEase(ease_hundredths.to_string()))?;
    let ease_factor = EaseFactor::from_hundredths(ease_hundredths)?;

    Self::validate(next_review_date, interval_days, repetitions, ease_factor)
  }

  fn validate(
    next_review_date: DateTime<Utc>,
    interval_days: i64,
    repetitions: i64,
    ease_factor: EaseFactor,
  ) -> Result<Self, SchedulingError> {
    if repetitions < 0 {
      return Err(SchedulingError::NegativeRepetitions(repetitions));
    }
    if interval_days < 0 {
      return Err(SchedulingError::NegativeInterval(interval_days));
    }
    let repetitions =
      u32::try_from(repetitions).map_err(|_| SchedulingError::RepetitionsOutOfRange(repetitions))?;
    let interval_days =
      u32::try_from(interval_days).map_err(|_| SchedulingError::IntervalOutOfRange(interval_days))?;
    if interval_days == 0 && repetitions > 0 {
      return Err(SchedulingError::ZeroIntervalAfterSuccess { repetitions });
    }

    Ok(Self {
      next_review_date,
      interval_days,
      repetitions,
      ease_factor,
    })
  }

  /// Assemble an engine result. Callers guarantee the invariants.
  pub(crate) fn scheduled(
    now: DateTime<Utc>,
    interval_days: u32,
    repetitions: u32,
    ease_factor: EaseFactor,
  ) -> Self {
    debug_assert!(interval_days >= 1);
    Self {
      next_review_date: add_days(now, interval_days),
      interval_days,
      repetitions,
      ease_factor,
    }
  }

  pub fn next_review_date(&self) -> DateTime<Utc> {
    self.next_review_date
  }

  pub fn interval_days(&self) -> u32 {
    self.interval_days
  }

  pub fn repetitions(&self) -> u32 {
    self.repetitions
  }

  pub fn ease_factor(&self) -> EaseFactor {
    self.ease_factor
  }

  /// A card is due once its next review date has been reached.
  pub fn is_due(&self, at: DateTime<Utc>) -> bool {
    self.next_review_date <= at
  }

  /// Caller-side policy: shorten an interval longer than `max_days`,
  /// rescheduling from `reviewed_at`. Ease and repetitions are untouched.
  pub fn with_interval_cap(self, max_days: u32, reviewed_at: DateTime<Utc>) -> Self {
    let max_days = max_days.max(1);
    if self.interval_days <= max_days {
      return self;
    }
    Self {
      next_review_date: add_days(reviewed_at, max_days),
      interval_days: max_days,
      ..self
    }
  }
}

impl TryFrom<RawSchedulingState> for SchedulingState {
  type Error = SchedulingError;

  fn try_from(raw: RawSchedulingState) -> Result<Self, Self::Error> {
    Self::validate(
      raw.next_review_date,
      raw.interval_days,
      raw.repetitions,
      raw.ease_factor,
    )
  }
}

impl From<SchedulingState> for RawSchedulingState {
  fn from(state: SchedulingState) -> Self {
    Self {
      next_review_date: state.next_review_date,
      interval_days: i64::from(state.interval_days),
      repetitions: i64::from(state.repetitions),
      ease_factor: state.ease_factor,
    }
  }
}

/// `now + days`, saturating at the latest representable instant.
pub(crate) fn add_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
  TimeDelta::try_days(i64::from(days))
    .and_then(|delta| now.checked_add_signed(delta))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
