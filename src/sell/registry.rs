//! The sell registry: sell id → sale definition, with the CRUD semantics
//! the settings menus rely on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::errors::SellGuiError;
use super::types::{SellEntry, SellId};

/// Mapping from sell id to configured sale. Wraps the map so create and
/// edit enforce key uniqueness and re-key atomicity in one place.
///
/// Serializes transparently as a JSON object keyed by the stringified
/// sell id, which is exactly the persisted property format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SellRegistry {
    entries: BTreeMap<SellId, SellEntry>,
}

impl SellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SellId) -> Option<&SellEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: SellId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Iterate entries in ascending sell-id order. The selectors index
    /// into this order, so it must stay stable between calls.
    pub fn iter(&self) -> impl Iterator<Item = (SellId, &SellEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Insert a new sale. Rejects an id that is already assigned,
    /// reporting the item it is assigned to.
    pub fn create(&mut self, id: SellId, entry: SellEntry) -> Result<(), SellGuiError> {
        if let Some(existing) = self.entries.get(&id) {
            return Err(SellGuiError::DuplicateId {
                sell_id: id,
                item_id: existing.item_id.clone(),
            });
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Re-key `old_id` to `new_id` carrying `entry`. The removal and the
    /// insert happen as one step: afterwards exactly one of the two ids is
    /// present, never both and never neither.
    pub fn edit(
        &mut self,
        old_id: SellId,
        new_id: SellId,
        entry: SellEntry,
    ) -> Result<(), SellGuiError> {
        if new_id != old_id {
            if let Some(existing) = self.entries.get(&new_id) {
                return Err(SellGuiError::DuplicateId {
                    sell_id: new_id,
                    item_id: existing.item_id.clone(),
                });
            }
        }
        self.entries.remove(&old_id);
        self.entries.insert(new_id, entry);
        Ok(())
    }

    /// Remove a sale. Removing an id that is not present is a no-op;
    /// returns whether anything was actually removed.
    pub fn delete(&mut self, id: SellId) -> bool {
        self.entries.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(item: &str, value: u32) -> SellEntry {
        SellEntry {
            item_id: item.to_string(),
            item_display_name: item.to_string(),
            value,
            scoreboard: "money".to_string(),
        }
    }

    #[test]
    fn create_then_delete_restores_empty() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        assert_eq!(registry.len(), 1);
        assert!(registry.delete(5));
        assert!(registry.is_empty());
    }

    #[test]
    fn create_rejects_existing_id_without_mutating() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        let err = registry.create(5, entry("minecraft:gold_ingot", 3)).unwrap_err();
        match err {
            SellGuiError::DuplicateId { sell_id, item_id } => {
                assert_eq!(sell_id, 5);
                assert_eq!(item_id, "minecraft:diamond");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(registry.get(5).unwrap().item_id, "minecraft:diamond");
    }

    #[test]
    fn edit_rekeys_with_exactly_one_key_present() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        registry.edit(5, 7, entry("minecraft:diamond", 12)).expect("edit");
        assert!(!registry.contains(5));
        assert_eq!(registry.get(7).unwrap().value, 12);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn edit_keeps_same_key_in_place() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        registry.edit(5, 5, entry("minecraft:diamond", 42)).expect("edit");
        assert_eq!(registry.get(5).unwrap().value, 42);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn edit_rejects_collision_with_other_key() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        registry.create(7, entry("minecraft:emerald", 8)).expect("create");
        let err = registry.edit(5, 7, entry("minecraft:diamond", 10)).unwrap_err();
        assert!(matches!(err, SellGuiError::DuplicateId { sell_id: 7, .. }));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(5).unwrap().item_id, "minecraft:diamond");
    }

    #[test]
    fn delete_of_absent_key_is_noop() {
        let mut registry = SellRegistry::new();
        assert!(!registry.delete(99));
        registry.create(1, entry("minecraft:dirt", 1)).expect("create");
        assert!(!registry.delete(99));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_round_trips_through_property_json() {
        let mut registry = SellRegistry::new();
        registry.create(5, entry("minecraft:diamond", 10)).expect("create");
        registry.create(12, entry("minecraft:emerald", 7)).expect("create");
        let raw = serde_json::to_string(&registry).expect("serialize");
        let reloaded: SellRegistry = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(reloaded, registry);

        // Keys are stringified integers in the persisted object.
        let value: serde_json::Value = serde_json::from_str(&raw).expect("value");
        assert!(value.get("5").is_some());
        assert!(value.get("12").is_some());
    }
}
