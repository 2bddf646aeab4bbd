//! # Storage
//!
//! The persistence contract the table session is written against, plus the
//! two backends: [`MemoryStore`] (nothing is durable) and [`SqliteStore`].

use thiserror::Error;

use crate::entities::{Cents, Consumable, ConsumableId, Person};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness or foreign key constraint refused the write
    #[error("constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

/// Trait defining the durable side of a table session.
///
/// Fetches return rows in insertion order. Deleting a person or a consumable
/// also removes every relation row that references it.
pub trait TableStore {
    /// Store a new person; fails with [`StoreError::Conflict`] on a duplicate name
    fn create_person(&mut self, name: &str) -> Result<(), StoreError>;

    fn delete_person(&mut self, name: &str) -> Result<(), StoreError>;

    fn fetch_persons(&self) -> Result<Vec<Person>, StoreError>;

    /// Store a new consumable and return its freshly allocated id
    fn create_consumable(
        &mut self,
        name: &str,
        price: Cents,
        quantity: u32,
    ) -> Result<ConsumableId, StoreError>;

    fn delete_consumable(&mut self, id: ConsumableId) -> Result<(), StoreError>;

    fn fetch_consumables(&self) -> Result<Vec<Consumable>, StoreError>;

    /// Record that `person` consumed `consumable`. Recording it twice is a no-op.
    fn create_relation(&mut self, person: &str, consumable: ConsumableId) -> Result<(), StoreError>;

    fn delete_relation(&mut self, person: &str, consumable: ConsumableId) -> Result<(), StoreError>;

    fn fetch_relations(&self) -> Result<Vec<(String, ConsumableId)>, StoreError>;

    /// Wipe relations, persons and consumables
    fn clear_all(&mut self) -> Result<(), StoreError>;
}
