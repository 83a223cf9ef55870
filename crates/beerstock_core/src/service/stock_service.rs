//! Beer stock use-case service.
//!
//! # Responsibility
//! - Enforce name uniqueness on creation and existence on lookup/deletion.
//! - Keep every quantity mutation within `0..=capacity_max`.
//! - Surface each failure as a distinct `StockError` kind.
//!
//! # Invariants
//! - A rejected increment/decrement never writes to storage.
//! - Quantity writes go through the repository compare-and-set guard, so a
//!   concurrent writer is reported as `ConcurrentUpdate` instead of being lost.
//! - The service holds no state besides its repository.

use crate::model::beer::{Beer, BeerId};
use crate::repo::beer_repo::{BeerRepository, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identifies the record a lookup was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeerKey {
    Id(BeerId),
    Name(String),
}

impl Display for BeerKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name `{name}`"),
        }
    }
}

/// Service error for stock use-cases.
#[derive(Debug)]
pub enum StockError {
    /// A record with this name already exists.
    DuplicateName(String),
    /// No record matches the given id or name.
    NotFound(BeerKey),
    /// Increment would push quantity above `capacity_max`.
    CapacityExceeded { id: BeerId, amount: u32 },
    /// Decrement would push quantity below zero.
    InsufficientStock { id: BeerId, amount: u32 },
    /// Stored quantity changed between read and write.
    ConcurrentUpdate(BeerId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for StockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName(name) => write!(f, "beer `{name}` is already registered"),
            Self::NotFound(key) => write!(f, "beer not found with {key}"),
            Self::CapacityExceeded { id, amount } => write!(
                f,
                "beer {id}: adding {amount} would exceed the maximum stock capacity"
            ),
            Self::InsufficientStock { id, amount } => write!(
                f,
                "beer {id}: removing {amount} would take the stock below zero"
            ),
            Self::ConcurrentUpdate(id) => {
                write!(f, "beer {id}: stock was modified concurrently, retry the request")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StockError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StockError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(BeerKey::Id(id)),
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

pub type StockResult<T> = Result<T, StockError>;

/// Stock manager over a repository implementation.
pub struct StockService<R: BeerRepository> {
    repo: R,
}

impl<R: BeerRepository> StockService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new record after checking its name is free.
    ///
    /// Any `id` already set on `beer` is ignored; storage assigns a fresh one.
    pub fn create(&self, beer: &Beer) -> StockResult<Beer> {
        if self.repo.find_by_name(&beer.name)?.is_some() {
            warn!("event=beer_create module=service status=rejected reason=duplicate_name");
            return Err(StockError::DuplicateName(beer.name.clone()));
        }

        let unsaved = Beer {
            id: None,
            ..beer.clone()
        };
        let saved = self.repo.save(&unsaved)?;
        info!(
            "event=beer_create module=service status=ok beer_id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    pub fn find_by_name(&self, name: &str) -> StockResult<Beer> {
        self.repo
            .find_by_name(name)?
            .ok_or_else(|| StockError::NotFound(BeerKey::Name(name.to_string())))
    }

    pub fn find_by_id(&self, id: BeerId) -> StockResult<Beer> {
        self.repo
            .find_by_id(id)?
            .ok_or(StockError::NotFound(BeerKey::Id(id)))
    }

    /// Lists every record; empty when nothing is stored.
    pub fn list_all(&self) -> StockResult<Vec<Beer>> {
        Ok(self.repo.find_all()?)
    }

    pub fn delete_by_id(&self, id: BeerId) -> StockResult<()> {
        self.find_by_id(id)?;
        self.repo.delete_by_id(id)?;
        info!("event=beer_delete module=service status=ok beer_id={id}");
        Ok(())
    }

    /// Adds `amount` units, failing when the result would exceed capacity.
    pub fn increment(&self, id: BeerId, amount: u32) -> StockResult<Beer> {
        let beer = self.find_by_id(id)?;
        let Some(next) = beer.quantity_after_increment(amount) else {
            warn!(
                "event=stock_increment module=service status=rejected beer_id={} amount={} quantity={} capacity_max={}",
                id, amount, beer.quantity, beer.capacity_max
            );
            return Err(StockError::CapacityExceeded { id, amount });
        };
        self.store_quantity(beer, next, "stock_increment")
    }

    /// Removes `amount` units, failing when the result would go below zero.
    pub fn decrement(&self, id: BeerId, amount: u32) -> StockResult<Beer> {
        let beer = self.find_by_id(id)?;
        let Some(next) = beer.quantity_after_decrement(amount) else {
            warn!(
                "event=stock_decrement module=service status=rejected beer_id={} amount={} quantity={}",
                id, amount, beer.quantity
            );
            return Err(StockError::InsufficientStock { id, amount });
        };
        self.store_quantity(beer, next, "stock_decrement")
    }

    fn store_quantity(&self, beer: Beer, next: u32, event: &str) -> StockResult<Beer> {
        let id = beer.id.ok_or_else(|| {
            StockError::Repo(RepoError::InvalidData(format!(
                "stored beer `{}` has no id",
                beer.name
            )))
        })?;

        if !self
            .repo
            .compare_and_set_quantity(id, beer.quantity, next)?
        {
            warn!("event={event} module=service status=conflict beer_id={id}");
            return Err(StockError::ConcurrentUpdate(id));
        }

        info!(
            "event={} module=service status=ok beer_id={} from={} to={}",
            event, id, beer.quantity, next
        );
        Ok(Beer {
            quantity: next,
            ..beer
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BeerKey, StockError, StockService};
    use crate::model::beer::{Beer, BeerCategory, BeerId};
    use crate::repo::beer_repo::{BeerRepository, RepoResult};
    use crate::repo::memory_repo::InMemoryBeerRepository;

    /// Repository whose quantity guard always loses the race.
    struct RacingRepository {
        inner: InMemoryBeerRepository,
    }

    impl BeerRepository for RacingRepository {
        fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
            self.inner.find_by_id(id)
        }

        fn find_by_name(&self, name: &str) -> RepoResult<Option<Beer>> {
            self.inner.find_by_name(name)
        }

        fn find_all(&self) -> RepoResult<Vec<Beer>> {
            self.inner.find_all()
        }

        fn save(&self, beer: &Beer) -> RepoResult<Beer> {
            self.inner.save(beer)
        }

        fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
            self.inner.delete_by_id(id)
        }

        fn compare_and_set_quantity(&self, _: BeerId, _: u32, _: u32) -> RepoResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn lost_race_is_reported_and_nothing_is_written() {
        let repo = RacingRepository {
            inner: InMemoryBeerRepository::new(),
        };
        let service = StockService::new(&repo);
        let created = service
            .create(&Beer::new("Skol", "Ambev", 100, 10, BeerCategory::Lager))
            .unwrap();
        let id = created.id.unwrap();

        let err = service.increment(id, 5).unwrap_err();
        assert!(matches!(err, StockError::ConcurrentUpdate(found) if found == id));
        assert_eq!(repo.inner.find_by_id(id).unwrap().unwrap().quantity, 10);
    }

    #[test]
    fn create_ignores_caller_supplied_id() {
        let service = StockService::new(InMemoryBeerRepository::new());
        let mut beer = Beer::new("Skol", "Ambev", 100, 10, BeerCategory::Lager);
        beer.id = Some(42);

        let created = service.create(&beer).unwrap();
        assert_eq!(created.id, Some(1));
    }

    #[test]
    fn error_messages_name_the_offending_record() {
        let not_found = StockError::NotFound(BeerKey::Name("Skol".to_string()));
        assert_eq!(not_found.to_string(), "beer not found with name `Skol`");

        let exceeded = StockError::CapacityExceeded { id: 7, amount: 90 };
        assert!(exceeded.to_string().contains("beer 7"));
        assert!(exceeded.to_string().contains("90"));
    }
}
