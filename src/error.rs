//! Errors raised by the table session.
//!
//! - [`DuplicatePerson`] when a name is already seated at the table.
//! - [`Persistence`] when the store rejected a write; in-memory state is left
//!   untouched.
//!
//! Removing something that does not exist is not an error: those operations
//! return `Ok(false)`.
//!
//! [`DuplicatePerson`]: TableError::DuplicatePerson
//! [`Persistence`]: TableError::Persistence
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("`{0}` is already at the table")]
    DuplicatePerson(String),
    #[error("person name must not be empty")]
    EmptyName,
    #[error("invalid consumable: {0}")]
    InvalidConsumable(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}
