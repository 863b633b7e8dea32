use crate::id::ItemTypeId;
use serde::{Deserialize, Serialize};

/// A quantity of a single item kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_type: ItemTypeId,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item_type: ItemTypeId, quantity: u32) -> Self {
        Self {
            item_type,
            quantity,
        }
    }

    /// A one-unit stack.
    pub fn single(item_type: ItemTypeId) -> Self {
        Self::new(item_type, 1)
    }
}

/// Why a stack was refused by a slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    #[error("stack of {0:?} has zero quantity")]
    ZeroQuantity(ItemTypeId),
    #[error("stack of {quantity} {item_type:?} exceeds max stack size {max}")]
    ExceedsMaxStack {
        item_type: ItemTypeId,
        quantity: u32,
        max: u32,
    },
}

/// One logical container: empty, or a stack with `0 < quantity <= max`.
///
/// Max-stack limits belong to the catalog, so operations that can grow a
/// stack take the limit as an argument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlot {
    stack: Option<ItemStack>,
}

impl ItemSlot {
    pub fn empty() -> Self {
        Self { stack: None }
    }

    /// Wrap a stack without validation. A zero-quantity stack becomes empty.
    pub fn from_stack(stack: Option<ItemStack>) -> Self {
        Self {
            stack: stack.filter(|s| s.quantity > 0),
        }
    }

    pub fn stack(&self) -> Option<&ItemStack> {
        self.stack.as_ref()
    }

    pub fn kind(&self) -> Option<ItemTypeId> {
        self.stack.as_ref().map(|s| s.item_type)
    }

    /// Units held; 0 when empty.
    pub fn quantity(&self) -> u32 {
        self.stack.as_ref().map(|s| s.quantity).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_none()
    }

    /// Replace the contents after checking the stack-size limit.
    pub fn set(&mut self, stack: Option<ItemStack>, max_stack: u32) -> Result<(), SlotError> {
        if let Some(s) = &stack {
            if s.quantity == 0 {
                return Err(SlotError::ZeroQuantity(s.item_type));
            }
            if s.quantity > max_stack {
                return Err(SlotError::ExceedsMaxStack {
                    item_type: s.item_type,
                    quantity: s.quantity,
                    max: max_stack,
                });
            }
        }
        self.stack = stack;
        Ok(())
    }

    /// Remove and return the whole stack.
    pub fn take(&mut self) -> Option<ItemStack> {
        self.stack.take()
    }

    /// Merge `incoming` into this slot, up to `max_stack`.
    ///
    /// Returns whatever did not fit. A stack of a different kind is handed
    /// back untouched.
    #[must_use = "the remainder holds items that did not fit"]
    pub fn merge(&mut self, incoming: ItemStack, max_stack: u32) -> Option<ItemStack> {
        if incoming.quantity == 0 {
            return None;
        }
        match &mut self.stack {
            None => {
                let accepted = incoming.quantity.min(max_stack);
                if accepted > 0 {
                    self.stack = Some(ItemStack::new(incoming.item_type, accepted));
                }
                remainder(incoming.item_type, incoming.quantity - accepted)
            }
            Some(held) if held.item_type == incoming.item_type => {
                let space = max_stack.saturating_sub(held.quantity);
                let accepted = incoming.quantity.min(space);
                held.quantity += accepted;
                remainder(incoming.item_type, incoming.quantity - accepted)
            }
            Some(_) => Some(incoming),
        }
    }

    /// Remove up to `count` units into a new stack.
    pub fn split(&mut self, count: u32) -> Option<ItemStack> {
        let held = self.stack.as_mut()?;
        let taken = count.min(held.quantity);
        if taken == 0 {
            return None;
        }
        held.quantity -= taken;
        let item_type = held.item_type;
        if held.quantity == 0 {
            self.stack = None;
        }
        Some(ItemStack::new(item_type, taken))
    }

    /// Remove one unit, emptying the slot when the last one goes.
    pub fn decrement(&mut self) {
        let _ = self.split(1);
    }

    /// Remove one unit. When that was the last unit and `leftover` is set,
    /// the slot keeps a single unit of the leftover kind instead of emptying
    /// (e.g. a drained container).
    pub fn decrement_leaving(&mut self, leftover: Option<ItemTypeId>) {
        let was_last = self.quantity() == 1;
        self.decrement();
        if was_last && let Some(kind) = leftover {
            self.stack = Some(ItemStack::single(kind));
        }
    }
}

impl From<Option<ItemStack>> for ItemSlot {
    fn from(stack: Option<ItemStack>) -> Self {
        Self::from_stack(stack)
    }
}

impl From<ItemStack> for ItemSlot {
    fn from(stack: ItemStack) -> Self {
        Self::from_stack(Some(stack))
    }
}

fn remainder(item_type: ItemTypeId, quantity: u32) -> Option<ItemStack> {
    (quantity > 0).then(|| ItemStack::new(item_type, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    const COAL: ItemTypeId = ItemTypeId(0);
    const ORE: ItemTypeId = ItemTypeId(1);
    const BUCKET: ItemTypeId = ItemTypeId(2);

    #[test]
    fn empty_slot_reports_nothing() {
        let slot = ItemSlot::empty();
        assert!(slot.is_empty());
        assert_eq!(slot.quantity(), 0);
        assert_eq!(slot.kind(), None);
    }

    #[test]
    fn set_accepts_within_limit() {
        let mut slot = ItemSlot::empty();
        slot.set(Some(ItemStack::new(COAL, 64)), 64).unwrap();
        assert_eq!(slot.quantity(), 64);
        assert_eq!(slot.kind(), Some(COAL));
    }

    #[test]
    fn set_rejects_over_limit() {
        let mut slot = ItemSlot::empty();
        let err = slot.set(Some(ItemStack::new(COAL, 65)), 64).unwrap_err();
        assert_eq!(
            err,
            SlotError::ExceedsMaxStack {
                item_type: COAL,
                quantity: 65,
                max: 64
            }
        );
        assert!(slot.is_empty(), "refused stack must not land");
    }

    #[test]
    fn set_rejects_zero_quantity() {
        let mut slot = ItemSlot::empty();
        assert_eq!(
            slot.set(Some(ItemStack::new(COAL, 0)), 64),
            Err(SlotError::ZeroQuantity(COAL))
        );
    }

    #[test]
    fn set_none_clears() {
        let mut slot = ItemSlot::from(ItemStack::new(COAL, 3));
        slot.set(None, 64).unwrap();
        assert!(slot.is_empty());
    }

    #[test]
    fn from_zero_stack_is_empty() {
        assert!(ItemSlot::from(ItemStack::new(COAL, 0)).is_empty());
    }

    #[test]
    fn merge_into_empty_adopts() {
        let mut slot = ItemSlot::empty();
        let rest = slot.merge(ItemStack::new(COAL, 10), 64);
        assert_eq!(rest, None);
        assert_eq!(slot.quantity(), 10);
    }

    #[test]
    fn merge_same_kind_fills_to_limit() {
        let mut slot = ItemSlot::from(ItemStack::new(COAL, 60));
        let rest = slot.merge(ItemStack::new(COAL, 10), 64);
        assert_eq!(slot.quantity(), 64);
        assert_eq!(rest, Some(ItemStack::new(COAL, 6)));
    }

    #[test]
    fn merge_oversized_into_empty_splits() {
        let mut slot = ItemSlot::empty();
        let rest = slot.merge(ItemStack::new(ORE, 100), 64);
        assert_eq!(slot.quantity(), 64);
        assert_eq!(rest, Some(ItemStack::new(ORE, 36)));
    }

    #[test]
    fn merge_foreign_kind_is_returned() {
        let mut slot = ItemSlot::from(ItemStack::new(COAL, 5));
        let incoming = ItemStack::new(ORE, 3);
        let rest = slot.merge(incoming.clone(), 64);
        assert_eq!(rest, Some(incoming));
        assert_eq!(slot.stack(), Some(&ItemStack::new(COAL, 5)));
    }

    #[test]
    fn split_takes_at_most_held() {
        let mut slot = ItemSlot::from(ItemStack::new(ORE, 5));
        assert_eq!(slot.split(3), Some(ItemStack::new(ORE, 3)));
        assert_eq!(slot.quantity(), 2);
        assert_eq!(slot.split(10), Some(ItemStack::new(ORE, 2)));
        assert!(slot.is_empty());
        assert_eq!(slot.split(1), None);
    }

    #[test]
    fn decrement_empties_at_zero() {
        let mut slot = ItemSlot::from(ItemStack::new(ORE, 2));
        slot.decrement();
        assert_eq!(slot.quantity(), 1);
        slot.decrement();
        assert!(slot.is_empty());
        slot.decrement();
        assert!(slot.is_empty());
    }

    #[test]
    fn decrement_leaving_swaps_last_unit() {
        let mut slot = ItemSlot::from(ItemStack::new(COAL, 1));
        slot.decrement_leaving(Some(BUCKET));
        assert_eq!(slot.stack(), Some(&ItemStack::single(BUCKET)));
    }

    #[test]
    fn decrement_leaving_ignores_leftover_when_units_remain() {
        let mut slot = ItemSlot::from(ItemStack::new(COAL, 2));
        slot.decrement_leaving(Some(BUCKET));
        assert_eq!(slot.stack(), Some(&ItemStack::new(COAL, 1)));
    }

    #[test]
    fn take_empties() {
        let mut slot = ItemSlot::from(ItemStack::new(ORE, 4));
        assert_eq!(slot.take(), Some(ItemStack::new(ORE, 4)));
        assert!(slot.is_empty());
    }
}
