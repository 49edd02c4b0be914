use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use super::{CardId, SchedulingStore, StoreError};
use crate::domain::SchedulingState;

type StateMap = BTreeMap<CardId, SchedulingState>;

/// Process-local store. One lock guards every card, so `update` is
/// serialized per card (and across cards).
#[derive(Debug, Default)]
pub struct InMemoryStore {
  states: Mutex<StateMap>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn try_lock(&self) -> Result<MutexGuard<'_, StateMap>, StoreError> {
    self.states.lock().map_err(|_: PoisonError<_>| {
      tracing::error!("Scheduling store mutex poisoned - a thread panicked while holding the lock");
      StoreError::Unavailable
    })
  }

  pub fn len(&self) -> Result<usize, StoreError> {
    Ok(self.try_lock()?.len())
  }

  pub fn is_empty(&self) -> Result<bool, StoreError> {
    Ok(self.try_lock()?.is_empty())
  }

  /// Serialize every card's state as a JSON object keyed by card id
  pub fn snapshot_json(&self) -> Result<String, StoreError> {
    let states = self.try_lock()?;
    serde_json::to_string(&*states).map_err(|e| StoreError::Corrupt(e.to_string()))
  }

  /// Rebuild a store from [`InMemoryStore::snapshot_json`] output.
  ///
  /// Every state is validated; one bad record rejects the whole snapshot.
  pub fn restore_json(json: &str) -> Result<Self, StoreError> {
    let states: StateMap = serde_json::from_str(json).map_err(|e| {
      tracing::warn!("Rejected scheduling snapshot: {}", e);
      StoreError::Corrupt(e.to_string())
    })?;
    tracing::debug!("Restored {} scheduling states", states.len());
    Ok(Self {
      states: Mutex::new(states),
    })
  }
}

impl SchedulingStore for InMemoryStore {
  fn load(&self, card_id: CardId) -> Result<Option<SchedulingState>, StoreError> {
    Ok(self.try_lock()?.get(&card_id).copied())
  }

  fn save(&self, card_id: CardId, state: &SchedulingState) -> Result<(), StoreError> {
    self.try_lock()?.insert(card_id, *state);
    Ok(())
  }

  fn insert_new(&self, card_id: CardId, state: &SchedulingState) -> Result<bool, StoreError> {
    match self.try_lock()?.entry(card_id) {
      Entry::Occupied(_) => Ok(false),
      Entry::Vacant(slot) => {
        slot.insert(*state);
        Ok(true)
      }
    }
  }

  fn due_cards(&self, at: DateTime<Utc>, limit: usize) -> Result<Vec<CardId>, StoreError> {
    let states = self.try_lock()?;
    let mut due: Vec<(DateTime<Utc>, CardId)> = states
      .iter()
      .filter(|(_, state)| state.is_due(at))
      .map(|(id, state)| (state.next_review_date(), *id))
      .collect();
    due.sort_unstable();
    Ok(due.into_iter().take(limit).map(|(_, id)| id).collect())
  }

  fn update<T, F>(&self, card_id: CardId, f: F) -> Result<Option<T>, StoreError>
  where
    F: FnOnce(SchedulingState) -> (SchedulingState, T),
  {
    let mut states = self.try_lock()?;
    let Some(current) = states.get_mut(&card_id) else {
      return Ok(None);
    };
    let (next, out) = f(*current);
    *current = next;
    Ok(Some(out))
  }
}
