//! Mutation at the cursor: splicing, removal, range copies into the side
//! buffer, and label/opcode/operand rewriting.
//!
//! Every length-changing operation renormalizes the whole cursor stack
//! (see `Session::renormalize_insert`/`renormalize_remove`), so stacked
//! checkpoints keep naming the instructions they named before the edit.

use super::Editor;
use crate::instruction::{Instruction, Label, Opcode, Operand};
use crate::pattern::Pattern;
use crate::result::{Error, Result};

impl Editor {
    /// Splices `instructions` immediately before the cursor position.
    ///
    /// The cursor keeps tracking the instruction that sat at the
    /// insertion point, which lands it just past the inserted block.
    pub fn insert(&mut self, instructions: Vec<Instruction>) -> Result<&mut Self> {
        if instructions.is_empty() {
            return Err(Error::InvalidInput(
                "cannot insert an empty instruction list".into(),
            ));
        }
        let at = self.cursor()?;
        let count = instructions.len();
        let session = self.session_mut()?;
        session.instructions.splice(at..at, instructions);
        session.renormalize_insert(at, count);
        tracing::debug!("inserted {count} instructions at index {at}");
        Ok(self)
    }

    /// Like [`Editor::insert`], attaching `labels` to the first inserted
    /// instruction. Used when the insertion point is itself a branch
    /// target whose labels must land on the new head of the block.
    pub fn insert_with_labels(
        &mut self,
        labels: Vec<Label>,
        mut instructions: Vec<Instruction>,
    ) -> Result<&mut Self> {
        if instructions.is_empty() {
            return Err(Error::InvalidInput(
                "cannot insert an empty instruction list".into(),
            ));
        }
        instructions[0].labels.extend(labels);
        self.insert(instructions)
    }

    /// Adds `instructions` at the end of the sequence and moves the
    /// cursor to the start of the appended block.
    pub fn append(&mut self, instructions: Vec<Instruction>) -> Result<&mut Self> {
        if instructions.is_empty() {
            return Err(Error::InvalidInput(
                "cannot append an empty instruction list".into(),
            ));
        }
        let session = self.session_mut()?;
        let start = session.instructions.len();
        session.instructions.extend(instructions);
        session.cursor.push(start);
        Ok(self)
    }

    /// Like [`Editor::append`], attaching `labels` to the first appended
    /// instruction.
    pub fn append_with_labels(
        &mut self,
        labels: Vec<Label>,
        mut instructions: Vec<Instruction>,
    ) -> Result<&mut Self> {
        if instructions.is_empty() {
            return Err(Error::InvalidInput(
                "cannot append an empty instruction list".into(),
            ));
        }
        instructions[0].labels.extend(labels);
        self.append(instructions)
    }

    /// Overwrites the instruction at the cursor.
    ///
    /// With `preserve_labels` the replaced instruction's labels are
    /// carried onto the new one; without it the replacement's own labels
    /// stand, which is the only way labels are ever dropped.
    pub fn replace_at(
        &mut self,
        mut instruction: Instruction,
        preserve_labels: bool,
    ) -> Result<&mut Self> {
        let at = self.cursor()?;
        let session = self.session_mut()?;
        if preserve_labels {
            instruction.labels = session.instructions[at].labels.clone();
        }
        session.instructions[at] = instruction;
        Ok(self)
    }

    /// Deletes `count` instructions starting at the cursor.
    pub fn remove_at(&mut self, count: usize) -> Result<&mut Self> {
        let at = self.cursor()?;
        self.remove_range(at, count)
    }

    /// Deletes from the cursor up to and including the end of the next
    /// pattern match. The fused search-then-delete used to excise a run
    /// of original logic about to be replaced.
    pub fn remove_until(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let at = self.cursor()?;
        let found = pattern
            .find_forward(&self.session()?.instructions, at + 1)
            .ok_or_else(|| self.pattern_miss(pattern))?;
        let end = found + pattern.len() - 1;
        self.remove_range(at, end - at + 1)
    }

    fn remove_range(&mut self, at: usize, count: usize) -> Result<&mut Self> {
        let len = self.len()?;
        if count == 0 {
            return Err(Error::InvalidInput(
                "cannot remove zero instructions".into(),
            ));
        }
        if at + count > len {
            return Err(Error::OutOfRange {
                index: (at + count - 1) as isize,
                last: len - 1,
            });
        }
        if count == len {
            return Err(Error::InvalidInput(format!(
                "removing all {len} instructions would leave the sequence empty"
            )));
        }
        let session = self.session_mut()?;
        session.instructions.drain(at..at + count);
        session.renormalize_remove(at, count);
        tracing::debug!("removed {count} instructions at index {at}");
        Ok(self)
    }

    /// Copies `count` instructions starting at the cursor into the side
    /// buffer, without mutating the sequence. `strip_labels` clears the
    /// labels on the copies so the block can be re-inserted elsewhere
    /// without duplicating jump targets; `advance` pushes the cursor past
    /// the copied range.
    pub fn copy_range(
        &mut self,
        count: usize,
        strip_labels: bool,
        advance: bool,
    ) -> Result<&mut Self> {
        if count == 0 {
            return Err(Error::InvalidInput("cannot copy zero instructions".into()));
        }
        let at = self.cursor()?;
        let last = self.last_index()?;
        if at + count > last + 1 {
            return Err(Error::OutOfRange {
                index: (at + count - 1) as isize,
                last,
            });
        }
        if advance && at + count > last {
            return Err(Error::OutOfRange {
                index: (at + count) as isize,
                last,
            });
        }
        self.fill_buffer(at, count, strip_labels)?;
        if advance {
            self.push_cursor(at + count)?;
        }
        Ok(self)
    }

    /// Copies from the cursor up to and including the end of the next
    /// pattern match into the side buffer.
    pub fn copy_until(
        &mut self,
        pattern: &Pattern,
        strip_labels: bool,
        advance: bool,
    ) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let at = self.cursor()?;
        let found = pattern
            .find_forward(&self.session()?.instructions, at + 1)
            .ok_or_else(|| self.pattern_miss(pattern))?;
        let end = found + pattern.len() - 1;
        let last = self.last_index()?;
        if advance && end >= last {
            return Err(Error::OutOfRange {
                index: (end + 1) as isize,
                last,
            });
        }
        self.fill_buffer(at, end - at + 1, strip_labels)?;
        if advance {
            self.push_cursor(end + 1)?;
        }
        Ok(self)
    }

    fn fill_buffer(&mut self, at: usize, count: usize, strip_labels: bool) -> Result<()> {
        let session = self.session_mut()?;
        let mut copied = session.instructions[at..at + count].to_vec();
        if strip_labels {
            for ins in &mut copied {
                ins.labels.clear();
            }
        }
        session.buffer = copied;
        Ok(())
    }

    /// Splices a clone of the side buffer at the cursor.
    pub fn insert_buffer(&mut self) -> Result<&mut Self> {
        let buffered = self.session()?.buffer.clone();
        if buffered.is_empty() {
            return Err(Error::InvalidInput("the side buffer is empty".into()));
        }
        self.insert(buffered)
    }

    /// Splices a sub-range of the side buffer at the cursor.
    pub fn insert_buffer_slice(&mut self, start: usize, len: usize) -> Result<&mut Self> {
        let buffered = &self.session()?.buffer;
        if len == 0 || start + len > buffered.len() {
            return Err(Error::InvalidInput(format!(
                "buffer slice {start}..{} exceeds the {} buffered instructions",
                start + len,
                buffered.len()
            )));
        }
        let slice = buffered[start..start + len].to_vec();
        self.insert(slice)
    }

    /// Labels attached to the instruction at the cursor.
    pub fn labels(&self) -> Result<Vec<Label>> {
        Ok(self.at_cursor()?.labels.clone())
    }

    pub fn add_labels(&mut self, labels: &[Label]) -> Result<&mut Self> {
        self.at_cursor_mut()?.labels.extend_from_slice(labels);
        Ok(self)
    }

    pub fn set_labels(&mut self, labels: Vec<Label>) -> Result<&mut Self> {
        self.at_cursor_mut()?.labels = labels;
        Ok(self)
    }

    pub fn remove_labels(&mut self, labels: &[Label]) -> Result<&mut Self> {
        self.at_cursor_mut()?
            .labels
            .retain(|label| !labels.contains(label));
        Ok(self)
    }

    /// Clears and returns the labels at the cursor, typically so they can
    /// be re-attached to a replacement block.
    pub fn strip_labels(&mut self) -> Result<Vec<Label>> {
        Ok(std::mem::take(&mut self.at_cursor_mut()?.labels))
    }

    /// Opcode of the instruction at the cursor.
    pub fn opcode(&self) -> Result<Opcode> {
        Ok(self.at_cursor()?.op)
    }

    pub fn set_opcode(&mut self, op: Opcode) -> Result<&mut Self> {
        self.at_cursor_mut()?.op = op;
        Ok(self)
    }

    /// Operand of the instruction at the cursor, if any.
    pub fn operand(&self) -> Result<Option<Operand>> {
        Ok(self.at_cursor()?.operand.clone())
    }

    pub fn set_operand(&mut self, operand: Option<Operand>) -> Result<&mut Self> {
        self.at_cursor_mut()?.operand = operand;
        Ok(self)
    }

    fn at_cursor(&self) -> Result<&Instruction> {
        let at = self.cursor()?;
        Ok(&self.session()?.instructions[at])
    }

    fn at_cursor_mut(&mut self) -> Result<&mut Instruction> {
        let at = self.cursor()?;
        Ok(&mut self.session_mut()?.instructions[at])
    }
}
