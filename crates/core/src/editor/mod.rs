//! The editing session: lifecycle, cursor stack, and the fluent facade
//! that rewrite passes chain navigation and mutation calls on.

use crate::dump;
use crate::instruction::{Instruction, Label, TargetMethod};
use crate::ledger::PatchLedger;
use crate::pattern::Pattern;
use crate::result::{Error, Result};
use crate::slots::{SlotInfo, index_local_slots};
use std::collections::BTreeMap;
use std::path::PathBuf;

mod mutate;
mod search;

/// State owned by one attach-to-flush edit over a single method body.
pub(crate) struct Session {
    pub(crate) target: TargetMethod,
    pub(crate) instructions: Vec<Instruction>,
    /// Index stack; the top entry is the current cursor position. Every
    /// entry is kept inside `[0, len-1]` across mutations.
    pub(crate) cursor: Vec<usize>,
    /// Side buffer filled by `copy_range`/`copy_until`, overwritten by
    /// each new copy.
    pub(crate) buffer: Vec<Instruction>,
    pub(crate) slots: BTreeMap<u16, SlotInfo>,
}

impl Session {
    /// Shifts every stacked index at or after the insertion point.
    ///
    /// The whole stack is renormalized, not just the top entry, so an
    /// older checkpoint keeps naming the instruction it named before the
    /// splice.
    pub(crate) fn renormalize_insert(&mut self, at: usize, count: usize) {
        for index in &mut self.cursor {
            if *index >= at {
                *index += count;
            }
        }
    }

    /// Shifts every stacked index past the removed range down, and clamps
    /// entries that pointed into the removed range onto the edit point.
    pub(crate) fn renormalize_remove(&mut self, at: usize, count: usize) {
        let last = self.instructions.len().saturating_sub(1);
        for index in &mut self.cursor {
            if *index >= at + count {
                *index -= count;
            } else if *index > at {
                *index = at;
            }
            if *index > last {
                *index = last;
            }
        }
    }
}

/// Cursor-based editor over a decoded method-body instruction stream.
///
/// A caller attaches a target method's decoded sequence, issues a chain
/// of navigation and mutation calls (each returning the live handle), and
/// flushes to obtain the finished sequence for the runtime loader:
///
/// ```
/// use ilweave_core::{Editor, Instruction, Opcode, Operand, Pattern, TargetMethod};
///
/// let body = vec![
///     Instruction::with_operand(Opcode::LoadArg, Operand::Int(0)),
///     Instruction::with_operand(Opcode::LoadConst, Operand::Int(5)),
///     Instruction::new(Opcode::Add),
///     Instruction::new(Opcode::Ret),
/// ];
///
/// let mut editor = Editor::new();
/// editor
///     .attach(TargetMethod::new("Inventory", "stackSize"), &body)?
///     .find_first(&Pattern::of_ops(&[Opcode::Add]))?
///     .set_opcode(Opcode::Mul)?;
/// let rewritten = editor.flush()?;
/// assert_eq!(rewritten[2].op, Opcode::Mul);
/// # Ok::<(), ilweave_core::Error>(())
/// ```
///
/// The session is single-threaded and non-reentrant; it exclusively owns
/// the working sequence, cursor stack, and side buffer between `attach`
/// and `flush`. Individual operations either fully succeed or fully fail,
/// but a chain is not transactional: after a mid-chain error the caller
/// must discard the session rather than continue.
#[derive(Default)]
pub struct Editor {
    ledger: Option<Box<dyn PatchLedger>>,
    dump_dir: Option<PathBuf>,
    session: Option<Session>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("ledger", &self.ledger.as_ref().map(|_| "dyn PatchLedger"))
            .field("dump_dir", &self.dump_dir)
            .field("session", &self.session.as_ref().map(|s| &s.target))
            .finish()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects the record of rewrite passes already applied per target,
    /// used to enrich search-failure dumps.
    pub fn with_ledger(mut self, ledger: Box<dyn PatchLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Enables best-effort export of failure dumps into `dir`.
    pub fn with_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dump_dir = Some(dir.into());
        self
    }

    /// Attaches a decoded instruction sequence for editing.
    ///
    /// The input is cloned into an internally owned sequence; the
    /// caller's list is never modified. The local-slot index is built
    /// here, once, and the cursor stack is reset to `[0]`. Attaching
    /// discards any prior session state.
    pub fn attach(
        &mut self,
        target: TargetMethod,
        instructions: &[Instruction],
    ) -> Result<&mut Self> {
        if instructions.is_empty() {
            return Err(Error::InvalidInput(format!(
                "cannot attach an empty instruction sequence for {target}"
            )));
        }

        tracing::debug!(
            "attaching {} instructions from {target}",
            instructions.len()
        );
        let slots = index_local_slots(instructions);
        self.session = Some(Session {
            target,
            instructions: instructions.to_vec(),
            cursor: vec![0],
            buffer: Vec::new(),
            slots,
        });
        Ok(self)
    }

    /// Detaches and returns the finished sequence, clearing the cursor
    /// stack and releasing the side buffer. The editor returns to the
    /// unattached state and may be re-attached afterwards.
    pub fn flush(&mut self) -> Result<Vec<Instruction>> {
        let session = self.session.take().ok_or(Error::NotAttached)?;
        tracing::debug!(
            "flushing {} instructions for {}",
            session.instructions.len(),
            session.target
        );
        Ok(session.instructions)
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Identity of the method currently under edit.
    pub fn target(&self) -> Result<&TargetMethod> {
        Ok(&self.session()?.target)
    }

    /// Read-only view of the working sequence.
    pub fn instructions(&self) -> Result<&[Instruction]> {
        Ok(&self.session()?.instructions)
    }

    /// Number of instructions currently in the working sequence.
    pub fn len(&self) -> Result<usize> {
        Ok(self.session()?.instructions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.session
            .as_ref()
            .is_none_or(|session| session.instructions.is_empty())
    }

    /// The index currently at the top of the cursor stack.
    pub fn cursor(&self) -> Result<usize> {
        let session = self.session()?;
        session.cursor.last().copied().ok_or(Error::NotAttached)
    }

    /// Index of the last instruction in the working sequence.
    pub fn last_index(&self) -> Result<usize> {
        Ok(self.session()?.instructions.len() - 1)
    }

    /// Slot metadata recorded at attach for the given local slot.
    pub fn local_slot(&self, slot: u16) -> Result<Option<&SlotInfo>> {
        Ok(self.session()?.slots.get(&slot))
    }

    /// All local slots referenced by the sequence at attach time.
    pub fn local_slots(&self) -> Result<&BTreeMap<u16, SlotInfo>> {
        Ok(&self.session()?.slots)
    }

    /// Contents of the side buffer left by the last copy.
    pub fn buffer(&self) -> Result<&[Instruction]> {
        Ok(&self.session()?.buffer)
    }

    /// Pushes `current + steps` onto the cursor stack.
    pub fn advance(&mut self, steps: isize) -> Result<&mut Self> {
        let current = self.cursor()? as isize;
        let last = self.last_index()?;
        let next = current + steps;
        if next < 0 || next > last as isize {
            return Err(Error::OutOfRange { index: next, last });
        }
        self.session_mut()?.cursor.push(next as usize);
        Ok(self)
    }

    /// Pushes `current - steps` onto the cursor stack.
    pub fn retreat(&mut self, steps: isize) -> Result<&mut Self> {
        self.advance(-steps)
    }

    /// Pushes an absolute index onto the cursor stack.
    pub fn go_to(&mut self, index: usize) -> Result<&mut Self> {
        let last = self.last_index()?;
        if index > last {
            return Err(Error::OutOfRange {
                index: index as isize,
                last,
            });
        }
        self.session_mut()?.cursor.push(index);
        Ok(self)
    }

    /// Moves the cursor to index zero.
    pub fn rewind_to_first(&mut self) -> Result<&mut Self> {
        self.go_to(0)
    }

    /// Moves the cursor to the last index.
    pub fn advance_to_last(&mut self) -> Result<&mut Self> {
        let last = self.last_index()?;
        self.go_to(last)
    }

    /// Pops `count` entries, returning the cursor to a previous state.
    ///
    /// Navigation is typically nested (find an outer anchor, match within
    /// a narrower range, then come back); `rewind` undoes the inner
    /// navigation so a different edit can continue from the checkpoint.
    /// The bottom entry can never be popped, and the stack is left
    /// unchanged on failure.
    pub fn rewind(&mut self, count: usize) -> Result<&mut Self> {
        let session = self.session_mut()?;
        let depth = session.cursor.len();
        if count >= depth {
            return Err(Error::EmptyStack {
                requested: count,
                depth,
            });
        }
        session.cursor.truncate(depth - count);
        Ok(self)
    }

    pub(crate) fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(Error::NotAttached)
    }

    pub(crate) fn session_mut(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or(Error::NotAttached)
    }

    /// Validates and pushes a search result onto the cursor stack.
    pub(crate) fn push_cursor(&mut self, index: usize) -> Result<()> {
        let last = self.last_index()?;
        if index > last {
            return Err(Error::OutOfRange {
                index: index as isize,
                last,
            });
        }
        self.session_mut()?.cursor.push(index);
        Ok(())
    }

    /// Builds the `PatternNotFound` error for a failed search, rendering
    /// the diagnostic dump and exporting it if a dump directory was
    /// configured.
    pub(crate) fn pattern_miss(&self, pattern: &Pattern) -> Error {
        let Some(session) = self.session.as_ref() else {
            return Error::NotAttached;
        };
        let search = pattern
            .steps()
            .iter()
            .map(|step| step.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let dump = self.render_failure(session, &search);
        Error::PatternNotFound {
            pattern: pattern.to_string(),
            target: session.target.to_string(),
            dump: Some(dump),
        }
    }

    /// Builds the `LabelNotFound` error for a failed label search.
    pub(crate) fn label_miss(&self, label: Label) -> Error {
        let Some(session) = self.session.as_ref() else {
            return Error::NotAttached;
        };
        let dump = self.render_failure(session, &label.to_string());
        Error::LabelNotFound {
            label,
            target: session.target.to_string(),
            dump: Some(dump),
        }
    }

    fn render_failure(&self, session: &Session, search: &str) -> String {
        let applied = self
            .ledger
            .as_deref()
            .map(|ledger| ledger.applied_passes(&session.target))
            .unwrap_or_default();
        let rendered = dump::render_dump(search, &session.instructions, &applied);
        if let Some(dir) = &self.dump_dir {
            dump::export_dump(dir, &session.target, &rendered);
        }
        rendered
    }

    /// Rejects the zero-length pattern before any search or fused
    /// search-mutation runs.
    pub(crate) fn ensure_pattern(pattern: &Pattern) -> Result<()> {
        if pattern.is_empty() {
            return Err(Error::InvalidInput(
                "cannot search for a zero-length pattern".into(),
            ));
        }
        Ok(())
    }
}
