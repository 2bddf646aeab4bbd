// Table Organizer - Core Library
// Tracks who ate what at a shared table and splits the bill.
// Used by the CLI, the terminal UI, and tests.

pub mod entities;
pub mod error;
pub mod money;
pub mod settings;
pub mod store;
pub mod summary;
pub mod table;
pub mod validation;

// Re-export commonly used types
pub use entities::{Cents, Consumable, ConsumableId, Person};
pub use error::TableError;
pub use money::{parse_price, print_price};
pub use settings::{Backend, Settings};
pub use store::{MemoryStore, SqliteStore, StoreError, TableStore};
pub use summary::{BillSummary, ConsumableLine, PersonLine};
pub use table::TableManager;
pub use validation::{
    validate_person_name, ConsumableForm, NewConsumable, ValidationError, ValidationResult,
};
