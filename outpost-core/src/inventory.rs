//! Player inventory: a fixed grid of item stacks plus a crypto wallet.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OutpostError, Result};
use crate::types::ItemId;

/// Slots in the inventory grid (4x4).
pub const INVENTORY_SLOTS: usize = 16;
/// Largest stack a single slot holds.
pub const MAX_STACK: u32 = 99;

/// A stack of identical items occupying one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item type.
    pub item_id: ItemId,
    /// Units in the stack, `1..=MAX_STACK`.
    pub quantity: u32,
}

/// The player's carried items and money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
    crypto: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; INVENTORY_SLOTS],
            crypto: 0,
        }
    }
}

impl Inventory {
    /// An empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit, topping up an existing stack before opening a new slot.
    ///
    /// # Errors
    /// Returns [`OutpostError::InventoryFull`] when no stack or slot can take it.
    pub fn add_item(&mut self, item_id: &ItemId) -> Result<()> {
        if let Some(stack) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|s| &s.item_id == item_id && s.quantity < MAX_STACK)
        {
            stack.quantity += 1;
            return Ok(());
        }
        if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(ItemStack {
                item_id: item_id.clone(),
                quantity: 1,
            });
            return Ok(());
        }
        debug!(item = %item_id, "Inventory is full");
        Err(OutpostError::InventoryFull {
            item_id: item_id.to_string(),
            quantity: 1,
        })
    }

    /// Add `quantity` units one at a time.
    ///
    /// # Errors
    /// Returns [`OutpostError::InventoryFull`] with the units that did not fit.
    pub fn add_items(&mut self, item_id: &ItemId, quantity: u32) -> Result<()> {
        for added in 0..quantity {
            if self.add_item(item_id).is_err() {
                return Err(OutpostError::InventoryFull {
                    item_id: item_id.to_string(),
                    quantity: quantity - added,
                });
            }
        }
        Ok(())
    }

    /// Total units of `item_id` across all stacks.
    #[must_use]
    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| &s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Remove `quantity` units, emptying slots front to back.
    ///
    /// Nothing is removed unless the full quantity is available.
    pub fn remove_items(&mut self, item_id: &ItemId, quantity: u32) -> bool {
        if self.quantity_of(item_id) < quantity {
            return false;
        }
        let mut remaining = quantity;
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            let Some(stack) = slot.as_mut().filter(|s| &s.item_id == item_id) else {
                continue;
            };
            if stack.quantity <= remaining {
                remaining -= stack.quantity;
                *slot = None;
            } else {
                stack.quantity -= remaining;
                remaining = 0;
            }
        }
        true
    }

    /// Every slot, empty ones included.
    #[must_use]
    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Occupied slots only.
    pub fn stacks(&self) -> impl Iterator<Item = &ItemStack> {
        self.slots.iter().flatten()
    }

    /// Current crypto balance.
    #[must_use]
    pub fn crypto(&self) -> u32 {
        self.crypto
    }

    /// Credit crypto.
    pub fn add_crypto(&mut self, amount: u32) {
        self.crypto = self.crypto.saturating_add(amount);
        debug!(amount, total = self.crypto, "Crypto earned");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_identical_items() {
        let mut inv = Inventory::new();
        let ore = ItemId::from("iron_ore");
        inv.add_items(&ore, 3).expect("fits");
        assert_eq!(inv.quantity_of(&ore), 3);
        assert_eq!(inv.stacks().count(), 1);
    }

    #[test]
    fn overflowing_stack_opens_new_slot() {
        let mut inv = Inventory::new();
        let dust = ItemId::from("cosmic_dust");
        inv.add_items(&dust, MAX_STACK + 1).expect("fits");
        assert_eq!(inv.stacks().count(), 2);
        assert_eq!(inv.quantity_of(&dust), MAX_STACK + 1);
    }

    #[test]
    fn full_inventory_rejects_new_types() {
        let mut inv = Inventory::new();
        for i in 0..INVENTORY_SLOTS {
            inv.add_item(&ItemId::new(format!("item_{i}"))).expect("fits");
        }
        let err = inv.add_item(&ItemId::from("alien_relic"));
        assert!(matches!(err, Err(OutpostError::InventoryFull { .. })));
    }

    #[test]
    fn remove_is_all_or_nothing() {
        let mut inv = Inventory::new();
        let ore = ItemId::from("iron_ore");
        inv.add_items(&ore, 2).expect("fits");
        assert!(!inv.remove_items(&ore, 3));
        assert_eq!(inv.quantity_of(&ore), 2);
        assert!(inv.remove_items(&ore, 2));
        assert_eq!(inv.quantity_of(&ore), 0);
        assert!(inv.slots().iter().all(Option::is_none));
    }

    #[test]
    fn crypto_accumulates() {
        let mut inv = Inventory::new();
        inv.add_crypto(25);
        inv.add_crypto(10);
        assert_eq!(inv.crypto(), 35);
    }
}
