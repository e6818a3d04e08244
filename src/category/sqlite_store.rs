//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params};

use crate::{
    Error, UserID,
    category::{Category, CategoryId, CategoryPatch, CategoryStore, NewCategory},
    db::CreateTable,
};

const CATEGORY_COLUMNS: &str = "id, name, icon, color, amount, owner";

/// Creates, retrieves and mutates categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        self.lock()?
            .query_row(
                &format!(
                    "INSERT INTO category (name, icon, color, amount, owner) \
                    VALUES (?1, ?2, ?3, 0, ?4) \
                    RETURNING {CATEGORY_COLUMNS}"
                ),
                params![
                    new_category.name,
                    new_category.icon,
                    new_category.color,
                    new_category.owner.as_i64()
                ],
                map_row_to_category,
            )
            .map_err(Error::from)
    }

    fn get(&self, id: CategoryId) -> Result<Category, Error> {
        self.lock()?
            .query_row(
                &format!("SELECT {CATEGORY_COLUMNS} FROM category WHERE id = ?1"),
                params![id],
                map_row_to_category,
            )
            .map_err(Error::from)
    }

    fn get_by_owner(&self, owner: UserID) -> Result<Vec<Category>, Error> {
        self.lock()?
            .prepare(&format!(
                "SELECT {CATEGORY_COLUMNS} FROM category WHERE owner = ?1 ORDER BY id"
            ))?
            .query_map(params![owner.as_i64()], map_row_to_category)?
            .map(|maybe_category| maybe_category.map_err(Error::from))
            .collect()
    }

    fn update(&self, id: CategoryId, patch: &CategoryPatch) -> Result<Category, Error> {
        self.lock()?
            .query_row(
                &format!(
                    "UPDATE category SET \
                        name = COALESCE(?1, name), \
                        icon = COALESCE(?2, icon), \
                        color = COALESCE(?3, color), \
                        amount = COALESCE(?4, amount), \
                        owner = COALESCE(?5, owner) \
                    WHERE id = ?6 \
                    RETURNING {CATEGORY_COLUMNS}"
                ),
                params![
                    patch.name,
                    patch.icon,
                    patch.color,
                    patch.amount,
                    patch.owner.map(|owner| owner.as_i64()),
                    id
                ],
                map_row_to_category,
            )
            .map_err(Error::from)
    }

    fn add_to_amount(&self, id: CategoryId, delta: f64) -> Result<Category, Error> {
        // A single UPDATE so that the read and write of `amount` cannot interleave
        // with another connection.
        self.lock()?
            .query_row(
                &format!(
                    "UPDATE category SET amount = amount + ?1 WHERE id = ?2 \
                    RETURNING {CATEGORY_COLUMNS}"
                ),
                params![delta, id],
                map_row_to_category,
            )
            .map_err(Error::from)
    }

    fn delete(&self, id: CategoryId) -> Result<(), Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM category WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // `owner` is deliberately not a foreign key: a general update may
        // reassign it to any user ID.
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS category (
                id INTEGER PRIMARY KEY,
                name TEXT,
                icon TEXT,
                color TEXT,
                amount REAL NOT NULL DEFAULT 0,
                owner INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_category_owner ON category(owner);",
        )
    }
}

fn map_row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        amount: row.get(4)?,
        owner: UserID::new(row.get(5)?),
    })
}
