// 🧑 Person Entity - a participant at the table
//
// The name is the identity. Consumed items are held as ids so the
// person/consumable graph has no cyclic ownership.

use std::collections::BTreeSet;

use super::consumable::{Cents, Consumable, ConsumableId};

#[derive(Debug, Clone)]
pub struct Person {
    /// Unique, non-empty name
    pub name: String,

    /// Ids of the consumables this person shares
    consumables: BTreeSet<ConsumableId>,
}

impl Person {
    pub fn new(name: String) -> Self {
        Person {
            name,
            consumables: BTreeSet::new(),
        }
    }

    /// Link a consumable on this side of the relation only.
    /// Returns false if it was already linked.
    pub fn add_consumable(&mut self, id: ConsumableId) -> bool {
        self.consumables.insert(id)
    }

    /// Unlink a consumable on this side of the relation only
    pub fn remove_consumable(&mut self, id: ConsumableId) -> bool {
        self.consumables.remove(&id)
    }

    pub fn consumes(&self, id: ConsumableId) -> bool {
        self.consumables.contains(&id)
    }

    pub fn consumable_ids(&self) -> impl Iterator<Item = ConsumableId> + '_ {
        self.consumables.iter().copied()
    }

    pub fn number_of_consumables(&self) -> usize {
        self.consumables.len()
    }

    /// Personal share before tip.
    ///
    /// Each linked item contributes `total_price / consumers`; items not
    /// linked to this person are ignored.
    pub fn personal_bill<'a, I>(&self, consumables: I) -> Cents
    where
        I: IntoIterator<Item = &'a Consumable>,
    {
        consumables
            .into_iter()
            .filter(|c| self.consumes(c.id))
            .map(Consumable::share)
            .fold(0, Cents::saturating_add)
    }

    pub(crate) fn clear_consumables(&mut self) {
        self.consumables.clear();
    }
}

/// Persons are equal when their names match
impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Person {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(consumable: &mut Consumable, person: &mut Person) {
        consumable.add_person(&person.name);
        person.add_consumable(consumable.id);
    }

    #[test]
    fn test_person_creation() {
        let person = Person::new("ana".to_string());

        assert_eq!(person.name, "ana");
        assert_eq!(person.number_of_consumables(), 0);
    }

    #[test]
    fn test_add_consumable_is_one_sided() {
        let mut person = Person::new("ana".to_string());
        let pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);

        assert!(person.add_consumable(pizza.id));
        assert!(!person.add_consumable(pizza.id));

        assert!(person.consumes(1));
        assert!(!pizza.is_consumed_by("ana"));
    }

    #[test]
    fn test_personal_bill_without_items_is_zero() {
        let person = Person::new("ana".to_string());
        let pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);

        assert_eq!(person.personal_bill([&pizza]), 0);
        assert_eq!(person.personal_bill(std::iter::empty()), 0);
    }

    #[test]
    fn test_personal_bill_sums_shares() {
        let mut ana = Person::new("ana".to_string());
        let mut bruno = Person::new("bruno".to_string());
        let mut pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);
        let mut beer = Consumable::new(2, "Beer".to_string(), 450, 2);
        let salad = Consumable::new(3, "Salad".to_string(), 800, 1);

        linked(&mut pizza, &mut ana);
        linked(&mut pizza, &mut bruno);
        linked(&mut beer, &mut ana);

        let all = [pizza, beer, salad];

        assert_eq!(ana.personal_bill(&all), 500 + 900);
        assert_eq!(bruno.personal_bill(&all), 500);
    }

    #[test]
    fn test_personal_bill_ignores_item_with_stale_link() {
        // Person side says linked, consumable side has no consumers
        let mut ana = Person::new("ana".to_string());
        let pizza = Consumable::new(1, "Pizza".to_string(), 1000, 1);
        ana.add_consumable(pizza.id);

        assert_eq!(ana.personal_bill([&pizza]), 0);
    }

    #[test]
    fn test_equality_is_by_name() {
        let mut a = Person::new("ana".to_string());
        a.add_consumable(3);
        let b = Person::new("ana".to_string());
        let c = Person::new("bruno".to_string());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
