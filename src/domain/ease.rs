//! Fixed-point ease factor.
//!
//! Stored as an integer count of hundredths so that every SM-2 update is
//! exact and identical on every platform. All SM-2 ease deltas are whole
//! hundredths, so no precision is lost.

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EaseFactor(u32);

impl EaseFactor {
  /// 2.50
  pub const INITIAL: EaseFactor = EaseFactor(250);
  /// 1.30
  pub const MIN: EaseFactor = EaseFactor(130);

  pub fn from_hundredths(hundredths: u32) -> Result<Self, SchedulingError> {
    if hundredths < Self::MIN.0 {
      return Err(SchedulingError::EaseBelowFloor(hundredths as i64));
    }
    Ok(Self(hundredths))
  }

  pub fn hundredths(&self) -> u32 {
    self.0
  }

  /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), floored at 1.3.
  ///
  /// In hundredths the delta is `10 - d * (8 + 2d)` with `d = 5 - q`.
  pub fn apply_quality(self, quality: u8) -> Self {
    let d = 5 - i64::from(quality.min(5));
    let delta = 10 - d * (8 + 2 * d);
    let next = (i64::from(self.0) + delta).clamp(i64::from(Self::MIN.0), i64::from(u32::MAX));
    Self(next as u32)
  }

  /// `round(days * ease)` with ties rounded away from zero, saturating at `u32::MAX`.
  pub fn scale_days(&self, days: u32) -> u32 {
    let scaled = (u64::from(days) * u64::from(self.0) + 50) / 100;
    scaled.min(u64::from(u32::MAX)) as u32
  }

  /// Parse a decimal such as `"2.5"` or `"2.50"`.
  ///
  /// More than two fractional digits is rejected rather than rounded.
  pub fn parse(s: &str) -> Result<Self, SchedulingError> {
    let invalid = || SchedulingError::InvalidEase(s.to_string());
    let trimmed = s.trim();
    let (whole, frac) = match trimmed.split_once('.') {
      // A dot must be followed by at least one digit
      Some((_, "")) => return Err(invalid()),
      Some(parts) => parts,
      None => (trimmed, ""),
    };

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || frac.len() > 2 || !all_digits(frac) {
      return Err(invalid());
    }

    let whole: u32 = whole.parse().map_err(|_| invalid())?;
    let frac: u32 = match frac.len() {
      0 => 0,
      1 => frac.parse::<u32>().map_err(|_| invalid())? * 10,
      _ => frac.parse().map_err(|_| invalid())?,
    };

    let hundredths = whole
      .checked_mul(100)
      .and_then(|w| w.checked_add(frac))
      .ok_or_else(invalid)?;
    Self::from_hundredths(hundredths)
  }
}

impl Default for EaseFactor {
  fn default() -> Self {
    Self::INITIAL
  }
}

impl std::fmt::Display for EaseFactor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
  }
}

impl TryFrom<String> for EaseFactor {
  type Error = SchedulingError;

  fn try_from(s: String) -> Result<Self, Self::Error> {
    Self::parse(&s)
  }
}

impl From<EaseFactor> for String {
  fn from(ease: EaseFactor) -> Self {
    ease.to_string()
  }
}
