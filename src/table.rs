// 🧾 Table Manager - the table session
//
// Sole owner of the persons and consumables at the table. Every mutation is
// written to the store first; memory is only touched once the store accepted
// the write, so a failed call leaves the session exactly as it was.
//
// One session per running application: construct it once and hand out
// `&mut TableManager` to whatever drives it.

use tracing::{debug, info, warn};

use crate::entities::{Cents, Consumable, ConsumableId, Person};
use crate::error::TableError;
use crate::store::{StoreError, TableStore};

pub struct TableManager<S: TableStore> {
    persons: Vec<Person>,
    consumables: Vec<Consumable>,
    tip: u32,
    store: S,
}

impl<S: TableStore> TableManager<S> {
    /// Open a session over `store`, rebuilding the graph it holds.
    ///
    /// Persons load first, then consumables, then relations are replayed by
    /// name/id. Relations that point at a missing row are skipped.
    pub fn open(store: S, tip: i64) -> Result<Self, TableError> {
        let persons = store.fetch_persons()?;
        let consumables = store.fetch_consumables()?;
        let relations = store.fetch_relations()?;

        let mut table = TableManager {
            persons,
            consumables,
            tip: 0,
            store,
        };
        table.set_tip(tip);

        let mut skipped = 0;
        for (name, id) in relations {
            if !table.link_in_memory(id, &name) {
                warn!(person = %name, consumable = id, "skipping relation to missing row");
                skipped += 1;
            }
        }

        info!(
            persons = table.persons.len(),
            consumables = table.consumables.len(),
            skipped_relations = skipped,
            "table session opened"
        );

        Ok(table)
    }

    /// Give the store back, ending the session
    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // PERSONS
    // ========================================================================

    /// Seat a person. Surrounding whitespace is trimmed from the name.
    pub fn add_person(&mut self, name: &str) -> Result<&Person, TableError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TableError::EmptyName);
        }
        if self.find_person(name).is_some() {
            return Err(TableError::DuplicatePerson(name.to_string()));
        }

        self.store.create_person(name).map_err(|e| match e {
            StoreError::Conflict(_) => TableError::DuplicatePerson(name.to_string()),
            other => TableError::Persistence(other),
        })?;

        debug!(person = name, "person added");
        self.persons.push(Person::new(name.to_string()));
        Ok(&self.persons[self.persons.len() - 1])
    }

    /// Remove a person and every link to what they consumed.
    /// Returns false if nobody by that name is at the table.
    pub fn remove_person(&mut self, name: &str) -> Result<bool, TableError> {
        let Some(position) = self.persons.iter().position(|p| p.name == name) else {
            return Ok(false);
        };

        self.store.delete_person(name)?;

        let person = self.persons.remove(position);
        for id in person.consumable_ids() {
            if let Some(consumable) = self.consumable_mut(id) {
                consumable.remove_person(name);
            }
        }

        debug!(person = name, "person removed");
        Ok(true)
    }

    // ========================================================================
    // CONSUMABLES
    // ========================================================================

    pub fn add_consumable(
        &mut self,
        name: &str,
        price: Cents,
        quantity: u32,
    ) -> Result<&Consumable, TableError> {
        if price < 0 {
            return Err(TableError::InvalidConsumable(format!(
                "price must not be negative, got {}",
                price
            )));
        }
        if quantity == 0 {
            return Err(TableError::InvalidConsumable(
                "quantity must be at least 1".to_string(),
            ));
        }
        let in_range = price
            .checked_mul(Cents::from(quantity))
            .and_then(|total| self.total_bill().checked_add(total))
            .is_some();
        if !in_range {
            return Err(TableError::InvalidConsumable(
                "total price is too large".to_string(),
            ));
        }

        let id = self.store.create_consumable(name, price, quantity)?;

        debug!(consumable = id, name, price, quantity, "consumable added");
        self.consumables
            .push(Consumable::new(id, name.to_string(), price, quantity));
        Ok(&self.consumables[self.consumables.len() - 1])
    }

    /// Remove a consumable and every link to the persons who shared it.
    /// Returns false if no consumable has that id.
    pub fn remove_consumable(&mut self, id: ConsumableId) -> Result<bool, TableError> {
        let Some(position) = self.consumables.iter().position(|c| c.id == id) else {
            return Ok(false);
        };

        self.store.delete_consumable(id)?;

        let consumable = self.consumables.remove(position);
        for name in consumable.consumers() {
            if let Some(person) = self.person_mut(name) {
                person.remove_consumable(id);
            }
        }

        debug!(consumable = id, "consumable removed");
        Ok(true)
    }

    // ========================================================================
    // RELATION
    // ========================================================================

    /// Link `person` to consumable `id` on both sides and persist the link.
    ///
    /// No-op returning `Ok(false)` when either side is not at the table.
    /// Linking an existing pair again is harmless.
    pub fn add_consumable_to_person(
        &mut self,
        id: ConsumableId,
        person: &str,
    ) -> Result<bool, TableError> {
        if self.find_consumable(id).is_none() || self.find_person(person).is_none() {
            return Ok(false);
        }

        self.store.create_relation(person, id)?;
        self.link_in_memory(id, person);

        debug!(person, consumable = id, "link added");
        Ok(true)
    }

    /// Unlink `person` from consumable `id` on both sides and persist the removal.
    /// Returns whether a link existed.
    pub fn remove_consumable_from_person(
        &mut self,
        id: ConsumableId,
        person: &str,
    ) -> Result<bool, TableError> {
        let linked = self
            .find_consumable(id)
            .is_some_and(|c| c.is_consumed_by(person));
        if !linked {
            return Ok(false);
        }

        self.store.delete_relation(person, id)?;

        if let Some(consumable) = self.consumable_mut(id) {
            consumable.remove_person(person);
        }
        if let Some(p) = self.person_mut(person) {
            p.remove_consumable(id);
        }

        debug!(person, consumable = id, "link removed");
        Ok(true)
    }

    /// Flip the link between `person` and consumable `id`.
    /// Returns the new state, or `None` if either side is not at the table.
    pub fn toggle_consumable_for_person(
        &mut self,
        id: ConsumableId,
        person: &str,
    ) -> Result<Option<bool>, TableError> {
        match self.find_consumable(id).map(|c| c.is_consumed_by(person)) {
            None => Ok(None),
            Some(true) => {
                self.remove_consumable_from_person(id, person)?;
                Ok(Some(false))
            }
            Some(false) => Ok(self
                .add_consumable_to_person(id, person)?
                .then_some(true)),
        }
    }

    fn link_in_memory(&mut self, id: ConsumableId, person: &str) -> bool {
        let Some(ci) = self.consumables.iter().position(|c| c.id == id) else {
            return false;
        };
        let Some(pi) = self.persons.iter().position(|p| p.name == person) else {
            return false;
        };

        self.consumables[ci].add_person(person);
        self.persons[pi].add_consumable(id);
        true
    }

    // ========================================================================
    // BILL
    // ========================================================================

    pub fn tip(&self) -> u32 {
        self.tip
    }

    /// Set the tip percentage; negative values become 0
    pub fn set_tip(&mut self, pct: i64) {
        self.tip = u32::try_from(pct.max(0)).unwrap_or(u32::MAX);
    }

    /// Sum of every consumable's total price, in cents
    pub fn total_bill(&self) -> Cents {
        self.consumables
            .iter()
            .map(Consumable::total_price)
            .fold(0, Cents::saturating_add)
    }

    pub fn total_bill_with_tip(&self) -> Cents {
        self.apply_tip(self.total_bill())
    }

    /// A person's share including tip
    pub fn personal_bill(&self, person: &Person) -> Cents {
        self.apply_tip(person.personal_bill(&self.consumables))
    }

    /// Rounds down; saturates at `Cents::MAX`
    fn apply_tip(&self, amount: Cents) -> Cents {
        let tipped = i128::from(amount) * (100 + i128::from(self.tip)) / 100;
        Cents::try_from(tipped).unwrap_or(Cents::MAX)
    }

    /// Total price of items nobody has claimed yet
    pub fn unclaimed_total(&self) -> Cents {
        self.consumables
            .iter()
            .filter(|c| c.number_of_consumers() == 0)
            .map(Consumable::total_price)
            .fold(0, Cents::saturating_add)
    }

    /// Cents lost to integer division across all shared items (before tip)
    pub fn rounding_loss(&self) -> Cents {
        self.consumables.iter().map(Consumable::rounding_remainder).sum()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn number_of_persons(&self) -> usize {
        self.persons.len()
    }

    pub fn number_of_consumables(&self) -> usize {
        self.consumables.len()
    }

    /// Person at `position` in insertion order. Panics when out of bounds.
    pub fn person(&self, position: usize) -> &Person {
        &self.persons[position]
    }

    /// Consumable at `position` in insertion order. Panics when out of bounds.
    pub fn consumable(&self, position: usize) -> &Consumable {
        &self.consumables[position]
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn consumables(&self) -> &[Consumable] {
        &self.consumables
    }

    pub fn find_person(&self, name: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.name == name)
    }

    pub fn find_consumable(&self, id: ConsumableId) -> Option<&Consumable> {
        self.consumables.iter().find(|c| c.id == id)
    }

    /// Persons sharing consumable `id`, in table order
    pub fn consumers_of(&self, id: ConsumableId) -> Vec<&Person> {
        self.persons.iter().filter(|p| p.consumes(id)).collect()
    }

    fn person_mut(&mut self, name: &str) -> Option<&mut Person> {
        self.persons.iter_mut().find(|p| p.name == name)
    }

    fn consumable_mut(&mut self, id: ConsumableId) -> Option<&mut Consumable> {
        self.consumables.iter_mut().find(|c| c.id == id)
    }

    /// Empty the table and wipe everything the store holds
    pub fn clear(&mut self) -> Result<(), TableError> {
        self.store.clear_all()?;

        for person in &mut self.persons {
            person.clear_consumables();
        }
        for consumable in &mut self.consumables {
            consumable.clear_consumers();
        }
        self.persons.clear();
        self.consumables.clear();

        info!("table cleared");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
