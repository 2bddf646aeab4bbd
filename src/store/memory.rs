// In-memory backend: every write succeeds and nothing survives the process.
// Only the consumable id counter lives here.

use super::{StoreError, TableStore};
use crate::entities::{Cents, Consumable, ConsumableId, Person};

#[derive(Debug)]
pub struct MemoryStore {
    next_id: ConsumableId,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore { next_id: 1 }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore for MemoryStore {
    fn create_person(&mut self, _name: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn delete_person(&mut self, _name: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn fetch_persons(&self) -> Result<Vec<Person>, StoreError> {
        Ok(Vec::new())
    }

    fn create_consumable(
        &mut self,
        _name: &str,
        _price: Cents,
        _quantity: u32,
    ) -> Result<ConsumableId, StoreError> {
        let id = self.next_id;
        self.next_id += 1;
        Ok(id)
    }

    fn delete_consumable(&mut self, _id: ConsumableId) -> Result<(), StoreError> {
        Ok(())
    }

    fn fetch_consumables(&self) -> Result<Vec<Consumable>, StoreError> {
        Ok(Vec::new())
    }

    fn create_relation(&mut self, _person: &str, _consumable: ConsumableId) -> Result<(), StoreError> {
        Ok(())
    }

    fn delete_relation(&mut self, _person: &str, _consumable: ConsumableId) -> Result<(), StoreError> {
        Ok(())
    }

    fn fetch_relations(&self) -> Result<Vec<(String, ConsumableId)>, StoreError> {
        Ok(Vec::new())
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut store = MemoryStore::new();

        assert_eq!(store.create_consumable("Beer", 450, 1).unwrap(), 1);
        assert_eq!(store.create_consumable("Wine", 2000, 1).unwrap(), 2);

        store.delete_consumable(2).unwrap();
        store.clear_all().unwrap();

        assert_eq!(store.create_consumable("Water", 300, 1).unwrap(), 3);
    }

    #[test]
    fn test_fetches_are_empty() {
        let mut store = MemoryStore::new();
        store.create_person("ana").unwrap();
        store.create_relation("ana", 1).unwrap();

        assert!(store.fetch_persons().unwrap().is_empty());
        assert!(store.fetch_consumables().unwrap().is_empty());
        assert!(store.fetch_relations().unwrap().is_empty());
    }
}
