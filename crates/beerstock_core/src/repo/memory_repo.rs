//! In-memory beer repository.
//!
//! Intended for tests and embedding. Mirrors the SQLite repository contract,
//! including the unique-name backstop and the quantity compare-and-set guard.

use crate::model::beer::{Beer, BeerId};
use crate::repo::beer_repo::{BeerRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: BeerId,
    rows: BTreeMap<BeerId, Beer>,
}

/// Thread-safe in-memory beer store.
#[derive(Debug, Default)]
pub struct InMemoryBeerRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryBeerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl BeerRepository for InMemoryBeerRepository {
    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Beer>> {
        Ok(self
            .lock()?
            .rows
            .values()
            .find(|beer| beer.name == name)
            .cloned())
    }

    fn find_all(&self) -> RepoResult<Vec<Beer>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    fn save(&self, beer: &Beer) -> RepoResult<Beer> {
        beer.validate()?;

        let mut state = self.lock()?;
        let name_taken = state
            .rows
            .values()
            .any(|stored| stored.name == beer.name && stored.id != beer.id);
        if name_taken {
            return Err(RepoError::DuplicateName(beer.name.clone()));
        }

        let id = match beer.id {
            Some(id) if state.rows.contains_key(&id) => id,
            Some(id) => return Err(RepoError::NotFound(id)),
            None => {
                state.last_id += 1;
                state.last_id
            }
        };

        let stored = Beer {
            id: Some(id),
            ..beer.clone()
        };
        state.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
        self.lock()?
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    fn compare_and_set_quantity(&self, id: BeerId, expected: u32, new: u32) -> RepoResult<bool> {
        let mut state = self.lock()?;
        match state.rows.get_mut(&id) {
            Some(beer) if beer.quantity == expected && new <= beer.capacity_max => {
                beer.quantity = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
