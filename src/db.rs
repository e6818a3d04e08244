/*! This module defines how the application's SQLite database is set up. */

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, auth::SQLiteUserStore, category::SQLiteCategoryStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create the table(s) for the model if they do not already exist.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// Create all of the database tables for the application.
///
/// This is idempotent, calling it on an already initialized database leaves
/// the existing data untouched.
///
/// # Errors
/// This function may return a [Error::SqlError] if an SQL related error occurred.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUserStore::create_table(&transaction)?;
    SQLiteCategoryStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_succeeds() {
        let connection = Connection::open_in_memory().unwrap();

        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
            .execute(
                "INSERT INTO user (email, password) VALUES ('a@b.c', 'hash')",
                (),
            )
            .unwrap();

        initialize(&connection).unwrap();

        let count: i64 = connection
            .query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
