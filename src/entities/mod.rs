// Entity Models
//
// Each entity has a stable identity (person name, consumable id).
// The person/consumable relation is mirrored as id sets on both sides;
// only the table manager keeps the two sides in agreement.

pub mod consumable;
pub mod person;

pub use consumable::{Cents, Consumable, ConsumableId};
pub use person::Person;
