//! Local-variable-slot index derived from load/store instructions.
//!
//! Built once when a sequence is attached so rewrite passes can reference
//! existing locals without re-scanning the body. The index is a snapshot:
//! it is not re-derived after mutation, and a pass that adds locals must
//! re-attach before relying on it.

use crate::instruction::{Instruction, Opcode, Operand};
use std::collections::BTreeMap;

/// Metadata about one local-variable slot referenced by the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotInfo {
    /// Slot identifier as minted by the runtime.
    pub slot: u16,
    /// Number of load instructions referencing the slot.
    pub loads: usize,
    /// Number of store instructions referencing the slot.
    pub stores: usize,
    /// Index of the first instruction referencing the slot.
    pub first_use: usize,
}

/// Scans the sequence once and builds the slot-id lookup, deduplicating
/// by slot identifier.
pub fn index_local_slots(instructions: &[Instruction]) -> BTreeMap<u16, SlotInfo> {
    let mut slots = BTreeMap::new();
    for (index, ins) in instructions.iter().enumerate() {
        let is_load = matches!(ins.op, Opcode::LoadLocal);
        let is_store = matches!(ins.op, Opcode::StoreLocal);
        if !is_load && !is_store {
            continue;
        }
        let Some(Operand::Slot(slot)) = ins.operand else {
            continue;
        };

        let info = slots.entry(slot).or_insert(SlotInfo {
            slot,
            loads: 0,
            stores: 0,
            first_use: index,
        });
        if is_load {
            info.loads += 1;
        } else {
            info.stores += 1;
        }
    }
    slots
}
