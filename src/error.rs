use crate::store::{CardId, StoreError};

/// Contract violations and collaborator failures surfaced by this crate.
///
/// None of these are retryable: a state that fails validation came from
/// corrupted or foreign data and must not be silently repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
  NegativeRepetitions(i64),
  NegativeInterval(i64),
  RepetitionsOutOfRange(i64),
  IntervalOutOfRange(i64),
  /// Stored ease in hundredths (e.g. 129 for 1.29)
  EaseBelowFloor(i64),
  InvalidEase(String),
  /// A zero interval is only valid before the first successful review
  ZeroIntervalAfterSuccess { repetitions: u32 },
  CardNotFound(CardId),
  DuplicateCard(CardId),
  Store(StoreError),
}

impl std::fmt::Display for SchedulingError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NegativeRepetitions(n) => write!(f, "repetitions must be non-negative, got {}", n),
      Self::NegativeInterval(n) => write!(f, "interval_days must be non-negative, got {}", n),
      Self::RepetitionsOutOfRange(n) => write!(f, "repetitions out of range: {}", n),
      Self::IntervalOutOfRange(n) => write!(f, "interval_days out of range: {}", n),
      Self::EaseBelowFloor(h) => {
        write!(f, "ease factor {:.2} is below the 1.30 floor", *h as f64 / 100.0)
      }
      Self::InvalidEase(s) => write!(f, "invalid ease factor: {:?}", s),
      Self::ZeroIntervalAfterSuccess { repetitions } => write!(
        f,
        "interval_days is 0 but repetitions is {}",
        repetitions
      ),
      Self::CardNotFound(id) => write!(f, "card {} has no scheduling state", id),
      Self::DuplicateCard(id) => write!(f, "card {} is already scheduled", id),
      Self::Store(e) => write!(f, "store error: {}", e),
    }
  }
}

impl std::error::Error for SchedulingError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Store(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StoreError> for SchedulingError {
  fn from(e: StoreError) -> Self {
    Self::Store(e)
  }
}
