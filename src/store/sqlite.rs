// 🗄️ SQLite backend - Person / Consumable / Consumes tables

use rusqlite::{params, Connection};
use std::path::Path;
use tracing::debug;

use super::{StoreError, TableStore};
use crate::entities::{Cents, Consumable, ConsumableId, Person};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened sqlite store");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, creating the schema if it is missing
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

pub fn setup_database(conn: &Connection) -> Result<(), StoreError> {
    // WAL for crash recovery; relations must point at existing rows
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Person (
            name TEXT PRIMARY KEY UNIQUE NOT NULL
        )",
        [],
    )?;

    // AUTOINCREMENT: ids of removed consumables are never handed out again
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Consumable (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            price INTEGER NOT NULL,
            quantity INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Consumes (
            person TEXT REFERENCES Person(name),
            consumable INTEGER REFERENCES Consumable(id),
            UNIQUE(person, consumable)
        )",
        [],
    )?;

    Ok(())
}

/// Constraint violations become [`StoreError::Conflict`], the rest stay SQLite errors
fn classify(err: rusqlite::Error, what: String) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            StoreError::Conflict(what)
        }
        other => StoreError::Sqlite(other),
    }
}

impl TableStore for SqliteStore {
    fn create_person(&mut self, name: &str) -> Result<(), StoreError> {
        self.conn
            .execute("INSERT INTO Person (name) VALUES (?1)", params![name])
            .map_err(|e| classify(e, format!("person `{}`", name)))?;
        Ok(())
    }

    fn delete_person(&mut self, name: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM Consumes WHERE person = ?1", params![name])?;
        tx.execute("DELETE FROM Person WHERE name = ?1", params![name])?;
        tx.commit()?;
        Ok(())
    }

    fn fetch_persons(&self) -> Result<Vec<Person>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name FROM Person ORDER BY rowid")?;

        let persons = stmt
            .query_map([], |row| Ok(Person::new(row.get(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(persons)
    }

    fn create_consumable(
        &mut self,
        name: &str,
        price: Cents,
        quantity: u32,
    ) -> Result<ConsumableId, StoreError> {
        self.conn
            .execute(
                "INSERT INTO Consumable (name, price, quantity) VALUES (?1, ?2, ?3)",
                params![name, price, quantity],
            )
            .map_err(|e| classify(e, format!("consumable `{}`", name)))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn delete_consumable(&mut self, id: ConsumableId) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM Consumes WHERE consumable = ?1", params![id])?;
        tx.execute("DELETE FROM Consumable WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn fetch_consumables(&self) -> Result<Vec<Consumable>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, price, quantity FROM Consumable ORDER BY id")?;

        let consumables = stmt
            .query_map([], |row| {
                Ok(Consumable::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(consumables)
    }

    fn create_relation(&mut self, person: &str, consumable: ConsumableId) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO Consumes (person, consumable) VALUES (?1, ?2)",
                params![person, consumable],
            )
            .map_err(|e| classify(e, format!("relation `{}` -> {}", person, consumable)))?;
        Ok(())
    }

    fn delete_relation(&mut self, person: &str, consumable: ConsumableId) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM Consumes WHERE person = ?1 AND consumable = ?2",
            params![person, consumable],
        )?;
        Ok(())
    }

    fn fetch_relations(&self) -> Result<Vec<(String, ConsumableId)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT person, consumable FROM Consumes ORDER BY rowid")?;

        let relations: Vec<(String, ConsumableId)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(relations)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM Consumes", [])?;
        tx.execute("DELETE FROM Person", [])?;
        tx.execute("DELETE FROM Consumable", [])?;
        tx.commit()?;
        Ok(())
    }
}
