//! Beer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage operations the stock service needs.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Beer::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `compare_and_set_quantity` writes only when the stored quantity still
//!   matches the caller's snapshot.

use crate::db::DbError;
use crate::model::beer::{Beer, BeerCategory, BeerId, BeerValidationError};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BEER_SELECT_SQL: &str = "SELECT
    id,
    name,
    brand,
    capacity_max,
    quantity,
    category
FROM beers";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for beer persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(BeerValidationError),
    Db(DbError),
    NotFound(BeerId),
    /// Storage-level uniqueness backstop for `name`.
    DuplicateName(String),
    InvalidData(String),
    LockPoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "beer not found: {id}"),
            Self::DuplicateName(name) => write!(f, "beer name already stored: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted beer data: {message}"),
            Self::LockPoisoned => write!(f, "beer store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BeerValidationError> for RepoError {
    fn from(value: BeerValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract consumed by the stock service.
pub trait BeerRepository {
    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Beer>>;
    /// Returns every record ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Beer>>;
    /// Inserts when `beer.id` is `None`, overwrites by id otherwise.
    fn save(&self, beer: &Beer) -> RepoResult<Beer>;
    fn delete_by_id(&self, id: BeerId) -> RepoResult<()>;
    /// Sets `quantity = new` only if it still equals `expected`.
    ///
    /// Returns `false` when the guard did not match.
    fn compare_and_set_quantity(&self, id: BeerId, expected: u32, new: u32) -> RepoResult<bool>;
}

impl<R: BeerRepository + ?Sized> BeerRepository for &R {
    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        (**self).find_by_id(id)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Beer>> {
        (**self).find_by_name(name)
    }

    fn find_all(&self) -> RepoResult<Vec<Beer>> {
        (**self).find_all()
    }

    fn save(&self, beer: &Beer) -> RepoResult<Beer> {
        (**self).save(beer)
    }

    fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
        (**self).delete_by_id(id)
    }

    fn compare_and_set_quantity(&self, id: BeerId, expected: u32, new: u32) -> RepoResult<bool> {
        (**self).compare_and_set_quantity(id, expected, new)
    }
}

/// SQLite-backed beer repository.
pub struct SqliteBeerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBeerRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, beer: &Beer) -> RepoResult<Beer> {
        self.conn
            .execute(
                "INSERT INTO beers (
                    name,
                    brand,
                    capacity_max,
                    quantity,
                    category
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    beer.name.as_str(),
                    beer.brand.as_str(),
                    beer.capacity_max,
                    beer.quantity,
                    beer.category.as_str(),
                ],
            )
            .map_err(|err| map_unique_violation(err, &beer.name))?;

        Ok(Beer {
            id: Some(self.conn.last_insert_rowid()),
            ..beer.clone()
        })
    }

    fn overwrite(&self, id: BeerId, beer: &Beer) -> RepoResult<Beer> {
        let changed = self
            .conn
            .execute(
                "UPDATE beers
                 SET
                    name = ?1,
                    brand = ?2,
                    capacity_max = ?3,
                    quantity = ?4,
                    category = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?6;",
                params![
                    beer.name.as_str(),
                    beer.brand.as_str(),
                    beer.capacity_max,
                    beer.quantity,
                    beer.category.as_str(),
                    id,
                ],
            )
            .map_err(|err| map_unique_violation(err, &beer.name))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(beer.clone())
    }
}

impl BeerRepository for SqliteBeerRepository<'_> {
    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BEER_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt.query_row([id], |row| Ok(parse_beer_row(row))).optional()?;
        row.transpose()
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Beer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BEER_SELECT_SQL} WHERE name = ?1;"))?;
        let row = stmt
            .query_row([name], |row| Ok(parse_beer_row(row)))
            .optional()?;
        row.transpose()
    }

    fn find_all(&self) -> RepoResult<Vec<Beer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BEER_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut beers = Vec::new();

        while let Some(row) = rows.next()? {
            beers.push(parse_beer_row(row)?);
        }

        Ok(beers)
    }

    fn save(&self, beer: &Beer) -> RepoResult<Beer> {
        beer.validate()?;

        match beer.id {
            None => self.insert(beer),
            Some(id) => self.overwrite(id, beer),
        }
    }

    fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM beers WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn compare_and_set_quantity(&self, id: BeerId, expected: u32, new: u32) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE beers
             SET
                quantity = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2
               AND quantity = ?3
               AND ?1 <= capacity_max;",
            params![new, id, expected],
        )?;

        Ok(changed == 1)
    }
}

fn parse_beer_row(row: &Row<'_>) -> RepoResult<Beer> {
    let id: BeerId = row.get("id")?;

    let category_text: String = row.get("category")?;
    let category = BeerCategory::parse(&category_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in beers.category (id {id})"
        ))
    })?;

    let beer = Beer {
        id: Some(id),
        name: row.get("name")?,
        brand: row.get("brand")?,
        capacity_max: parse_count(row, "capacity_max", id)?,
        quantity: parse_count(row, "quantity", id)?,
        category,
    };
    beer.validate()?;
    Ok(beer)
}

fn parse_count(row: &Row<'_>, column: &str, id: BeerId) -> RepoResult<u32> {
    let value: i64 = row.get(column)?;
    u32::try_from(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid value `{value}` in beers.{column} (id {id})"))
    })
}

fn map_unique_violation(err: rusqlite::Error, name: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateName(name.to_string())
        }
        _ => err.into(),
    }
}
