//! ilweave: a cursor-based editor for rewriting the decoded instruction
//! stream of a pre-compiled method body before the runtime loads it.
//!
//! Rewrite passes attach a decoded sequence, navigate it with structural
//! pattern search and a backtracking cursor stack, splice and remove
//! instructions in place, and flush the finished sequence back to the
//! host runtime's encoder. The editor never decodes or encodes machine
//! code itself and never verifies the semantics of the result; both are
//! the callers' concern.

pub mod dump;
pub mod editor;
pub mod instruction;
pub mod ledger;
pub mod pattern;
pub mod result;
pub mod slots;

pub use editor::Editor;
pub use instruction::{Instruction, Label, MemberRef, Opcode, Operand, TargetMethod};
pub use ledger::{InMemoryLedger, PatchLedger};
pub use pattern::{Pattern, Step};
pub use result::{Error, Result};
pub use slots::SlotInfo;

/// Returns true if the opcode unconditionally ends execution of the
/// method body (returns or raises).
#[inline]
pub fn is_terminal_opcode(op: Opcode) -> bool {
    matches!(op, Opcode::Ret | Opcode::Throw)
}

/// Returns true if the opcode transfers control to a labelled target.
#[inline]
pub fn is_branch_opcode(op: Opcode) -> bool {
    matches!(
        op,
        Opcode::Jump | Opcode::JumpIf | Opcode::JumpIfNot | Opcode::Switch
    )
}

/// Returns true if the opcode reads or writes a local-variable slot.
#[inline]
pub fn is_local_access_opcode(op: Opcode) -> bool {
    matches!(op, Opcode::LoadLocal | Opcode::StoreLocal)
}

/// Builds the instruction that loads the integer constant `value`.
///
/// Convenience for rewrite passes that synthesize arithmetic; pairs with
/// [`Pattern`] steps that match on `LOAD_CONST` with an exact operand.
pub fn load_const_int(value: i64) -> Instruction {
    Instruction::with_operand(Opcode::LoadConst, Operand::Int(value))
}
