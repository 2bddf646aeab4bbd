// 🍽️ Consumable Entity - an item ordered at the table
//
// Identity is the integer id handed out by the store; it never changes and is
// never reused. Consumers are referenced by person name, never by pointer.

use std::collections::BTreeSet;

/// Amount of money in cents
pub type Cents = i64;

/// Stable identity of a consumable
pub type ConsumableId = i64;

// ============================================================================
// CONSUMABLE ENTITY
// ============================================================================

#[derive(Debug, Clone)]
pub struct Consumable {
    /// Stable identity - allocated by the store on creation
    pub id: ConsumableId,

    pub name: String,

    /// Unit price in cents
    pub price: Cents,

    pub quantity: u32,

    /// Names of the persons sharing this item
    consumers: BTreeSet<String>,
}

impl Consumable {
    pub fn new(id: ConsumableId, name: String, price: Cents, quantity: u32) -> Self {
        Consumable {
            id,
            name,
            price,
            quantity,
            consumers: BTreeSet::new(),
        }
    }

    /// Register a consumer on this side of the relation only.
    /// Returns false if the person was already linked.
    pub fn add_person(&mut self, name: &str) -> bool {
        self.consumers.insert(name.to_string())
    }

    /// Drop a consumer on this side of the relation only
    pub fn remove_person(&mut self, name: &str) -> bool {
        self.consumers.remove(name)
    }

    pub fn is_consumed_by(&self, name: &str) -> bool {
        self.consumers.contains(name)
    }

    pub fn consumers(&self) -> impl Iterator<Item = &str> {
        self.consumers.iter().map(String::as_str)
    }

    pub fn number_of_consumers(&self) -> usize {
        self.consumers.len()
    }

    /// `price * quantity`, saturating at `Cents::MAX`
    pub fn total_price(&self) -> Cents {
        self.price.saturating_mul(Cents::from(self.quantity))
    }

    /// Share of the total price owed by each consumer.
    ///
    /// Integer division: the remainder is reported by [`rounding_remainder`].
    /// An item nobody consumed has a share of zero.
    ///
    /// [`rounding_remainder`]: Consumable::rounding_remainder
    pub fn share(&self) -> Cents {
        match self.consumers.len() {
            0 => 0,
            n => self.total_price() / n as Cents,
        }
    }

    /// Cents lost when the total does not divide evenly among the consumers
    pub fn rounding_remainder(&self) -> Cents {
        match self.consumers.len() {
            0 => 0,
            n => self.total_price() % n as Cents,
        }
    }

    pub(crate) fn clear_consumers(&mut self) {
        self.consumers.clear();
    }
}

/// Two consumables are the same item when their ids match
impl PartialEq for Consumable {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Consumable {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumable_creation() {
        let beer = Consumable::new(1, "Beer".to_string(), 450, 3);

        assert_eq!(beer.id, 1);
        assert_eq!(beer.name, "Beer");
        assert_eq!(beer.price, 450);
        assert_eq!(beer.quantity, 3);
        assert_eq!(beer.number_of_consumers(), 0);
    }

    #[test]
    fn test_total_price_is_price_times_quantity() {
        let beer = Consumable::new(1, "Beer".to_string(), 450, 3);
        assert_eq!(beer.total_price(), 1350);

        let water = Consumable::new(2, "Water".to_string(), 0, 5);
        assert_eq!(water.total_price(), 0);
    }

    #[test]
    fn test_total_price_saturates() {
        let yacht = Consumable::new(1, "Yacht".to_string(), Cents::MAX / 2 + 1, 2);
        assert_eq!(yacht.total_price(), Cents::MAX);
    }

    #[test]
    fn test_add_and_remove_person() {
        let mut pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);

        assert!(pizza.add_person("ana"));
        assert!(pizza.add_person("bruno"));
        assert!(!pizza.add_person("ana")); // Already linked

        assert_eq!(pizza.number_of_consumers(), 2);
        assert!(pizza.is_consumed_by("ana"));

        assert!(pizza.remove_person("ana"));
        assert!(!pizza.remove_person("ana"));
        assert!(!pizza.is_consumed_by("ana"));
        assert_eq!(pizza.consumers().collect::<Vec<_>>(), vec!["bruno"]);
    }

    #[test]
    fn test_share_without_consumers_is_zero() {
        let pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);

        assert_eq!(pizza.share(), 0);
        assert_eq!(pizza.rounding_remainder(), 0);
    }

    #[test]
    fn test_share_splits_evenly() {
        let mut pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);
        pizza.add_person("ana");
        pizza.add_person("bruno");

        assert_eq!(pizza.share(), 500);
        assert_eq!(pizza.rounding_remainder(), 0);
    }

    #[test]
    fn test_share_truncates_and_reports_remainder() {
        let mut pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);
        pizza.add_person("ana");
        pizza.add_person("bruno");
        pizza.add_person("carla");

        assert_eq!(pizza.share(), 333);
        assert_eq!(pizza.rounding_remainder(), 1);
        assert_eq!(pizza.share() * 3 + pizza.rounding_remainder(), pizza.total_price());
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = Consumable::new(7, "Beer".to_string(), 450, 1);
        let b = Consumable::new(7, "Renamed".to_string(), 999, 2);
        let c = Consumable::new(8, "Beer".to_string(), 450, 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
