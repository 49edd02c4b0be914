use serde::{Deserialize, Serialize};

/// The learner's self-reported recall for a single review.
///
/// Quality mapping onto the SM-2 0-5 scale: Again=0, Hard=3, Good=4, Easy=5.
/// Hard is a passing grade: it advances repetitions and grows the interval,
/// but costs 0.14 of ease so the card's future intervals grow more slowly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
  Again,
  Hard,
  Good,
  Easy,
}

impl Rating {
  pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  /// SM-2 quality score used by the ease formula
  pub fn quality(&self) -> u8 {
    match self {
      Self::Again => 0,
      Self::Hard => 3,
      Self::Good => 4,
      Self::Easy => 5,
    }
  }

  /// True for every rating that keeps the repetition streak alive
  pub fn is_correct(&self) -> bool {
    !matches!(self, Self::Again)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "again" => Some(Self::Again),
      "hard" => Some(Self::Hard),
      "good" => Some(Self::Good),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  /// Map a 1-4 answer button (Again..Easy) to a rating
  pub fn from_button(button: u8) -> Option<Self> {
    match button {
      1 => Some(Self::Again),
      2 => Some(Self::Hard),
      3 => Some(Self::Good),
      4 => Some(Self::Easy),
      _ => None,
    }
  }
}

impl std::fmt::Display for Rating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
