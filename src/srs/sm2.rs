//! SM-2 scheduling with four rating buckets.
//!
//! - Again resets the streak: interval 1 day, repetitions 0
//! - Hard/Good/Easy advance it: 1 day, then 6 days, then `interval * EF`
//! - EF is updated on every review and never drops below 1.3
//!
//! The clock is always injected so results are reproducible.

use chrono::{DateTime, Utc};

use crate::domain::{EaseFactor, Rating, SchedulingState};

const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;
const RELEARN_INTERVAL_DAYS: u32 = 1;

/// Stateless SM-2 scheduler. Safe to share across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulingEngine;

impl SchedulingEngine {
  /// Compute the state that follows `current` after a review rated `rating` at `now`.
  pub fn next(&self, current: SchedulingState, rating: Rating, now: DateTime<Utc>) -> SchedulingState {
    let ease = current.ease_factor();
    debug_assert!(ease >= EaseFactor::MIN);

    let (interval, repetitions) = if rating.is_correct() {
      let interval = match current.repetitions() {
        0 => FIRST_INTERVAL_DAYS,
        1 => SECOND_INTERVAL_DAYS,
        // Interval grows by the EF the card had going into this review
        _ => ease.scale_days(current.interval_days()).max(1),
      };
      (interval, current.repetitions().saturating_add(1))
    } else {
      (RELEARN_INTERVAL_DAYS, 0)
    };

    SchedulingState::scheduled(now, interval, repetitions, ease.apply_quality(rating.quality()))
  }

  /// Fold a review history over `initial`, oldest review first.
  pub fn replay<'a, I>(&self, initial: SchedulingState, reviews: I) -> SchedulingState
  where
    I: IntoIterator<Item = &'a (Rating, DateTime<Utc>)>,
  {
    reviews
      .into_iter()
      .fold(initial, |state, (rating, at)| self.next(state, *rating, *at))
  }

  /// Outcome of every rating from `current`, in Again..Easy order.
  pub fn preview(&self, current: SchedulingState, now: DateTime<Utc>) -> [(Rating, SchedulingState); 4] {
    Rating::ALL.map(|rating| (rating, self.next(current, rating, now)))
  }
}

/// Shorthand for `SchedulingEngine.next(current, rating, now)`
pub fn next_state(current: SchedulingState, rating: Rating, now: DateTime<Utc>) -> SchedulingState {
  SchedulingEngine.next(current, rating, now)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeDelta, TimeZone};

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
  }

  fn state(interval: i64, reps: i64, ease: i64) -> SchedulingState {
    SchedulingState::from_parts(t0(), interval, reps, ease).unwrap()
  }

  #[test]
  fn test_first_review_good() {
    let next = next_state(SchedulingState::new(t0()), Rating::Good, t0());
    assert_eq!(next.repetitions(), 1);
    assert_eq!(next.interval_days(), 1);
    assert_eq!(next.ease_factor(), EaseFactor::INITIAL);
    assert_eq!(next.next_review_date(), t0() + TimeDelta::days(1));
  }

  #[test]
  fn test_second_review_good() {
    let next = next_state(state(1, 1, 250), Rating::Good, t0());
    assert_eq!(next.repetitions(), 2);
    assert_eq!(next.interval_days(), 6);
  }

  #[test]
  fn test_third_review_good() {
    let next = next_state(state(6, 2, 250), Rating::Good, t0());
    assert_eq!(next.repetitions(), 3);
    // 6 * 2.5 = 15
    assert_eq!(next.interval_days(), 15);
  }

  #[test]
  fn test_growth_uses_ease_before_update() {
    // Easy raises EF to 2.60, but this interval is scaled by 2.50
    let next = next_state(state(6, 2, 250), Rating::Easy, t0());
    assert_eq!(next.interval_days(), 15);
    assert_eq!(next.ease_factor().hundredths(), 260);
  }

  #[test]
  fn test_failed_review_resets() {
    let next = next_state(state(15, 5, 250), Rating::Again, t0());
    assert_eq!(next.repetitions(), 0);
    assert_eq!(next.interval_days(), 1);
    assert_eq!(next.ease_factor().hundredths(), 170);
  }

  #[test]
  fn test_hard_advances_but_costs_ease() {
    let next = next_state(state(6, 2, 250), Rating::Hard, t0());
    assert_eq!(next.repetitions(), 3);
    assert_eq!(next.interval_days(), 15);
    assert_eq!(next.ease_factor().hundredths(), 236);

    // The lowered EF slows the following step: 15 * 2.36 = 35.4
    let after = next_state(next, Rating::Good, t0());
    assert_eq!(after.interval_days(), 35);
  }

  #[test]
  fn test_zero_interval_first_review() {
    let next = next_state(state(0, 0, 250), Rating::Good, t0());
    assert_eq!(next.interval_days(), 1);
    assert_eq!(next.repetitions(), 1);
  }

  #[test]
  fn test_ease_factor_floor() {
    let mut current = state(10, 5, 250);
    for _ in 0..10 {
      current = next_state(current, Rating::Again, t0());
      assert!(current.ease_factor() >= EaseFactor::MIN);
      assert_eq!(current.interval_days(), 1);
    }
    assert_eq!(current.ease_factor(), EaseFactor::MIN);
  }

  #[test]
  fn test_interval_grows_exponentially() {
    let mut current = SchedulingState::new(t0());
    for i in 0..5 {
      current = next_state(current, Rating::Good, t0());
      match i {
        0 => assert_eq!(current.interval_days(), 1),
        1 => assert_eq!(current.interval_days(), 6),
        _ => assert!(current.interval_days() > 6),
      }
    }
    // 1, 6, 15, 38, 95
    assert_eq!(current.interval_days(), 95);
  }

  #[test]
  fn test_huge_interval_saturates_date() {
    let next = next_state(state(i64::from(u32::MAX), 9, 250), Rating::Good, t0());
    assert_eq!(next.interval_days(), u32::MAX);
    assert_eq!(next.next_review_date(), DateTime::<Utc>::MAX_UTC);
  }

  #[test]
  fn test_replay_matches_step_by_step() {
    let day = |n| t0() + TimeDelta::days(n);
    let history = [
      (Rating::Good, day(0)),
      (Rating::Good, day(1)),
      (Rating::Hard, day(7)),
      (Rating::Again, day(22)),
      (Rating::Easy, day(23)),
    ];

    let replayed = SchedulingEngine.replay(SchedulingState::new(t0()), &history);

    let mut manual = SchedulingState::new(t0());
    for (rating, at) in &history {
      manual = next_state(manual, *rating, *at);
    }
    assert_eq!(replayed, manual);
    assert_eq!(replayed.repetitions(), 1);
    assert_eq!(replayed.next_review_date(), day(24));
  }

  #[test]
  fn test_preview_covers_all_ratings() {
    let current = state(6, 2, 250);
    let preview = SchedulingEngine.preview(current, t0());

    let ratings: Vec<Rating> = preview.iter().map(|(r, _)| *r).collect();
    assert_eq!(ratings, Rating::ALL.to_vec());
    assert_eq!(preview[0].1.interval_days(), 1);
    for (rating, outcome) in preview {
      assert_eq!(outcome, next_state(current, rating, t0()));
    }
  }
}
