//! Pattern and label search: the navigation half of the fluent API.
//!
//! Every operation moves the cursor to the start of the located match by
//! pushing onto the cursor stack, so a later `rewind` undoes the
//! navigation. Failed searches carry the full diagnostic dump; see
//! `Editor::pattern_miss`.

use super::Editor;
use crate::instruction::Label;
use crate::pattern::Pattern;
use crate::result::Result;

impl Editor {
    /// Moves the cursor to the first occurrence of `pattern`, scanning
    /// the whole sequence from index zero.
    pub fn find_first(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let found = pattern.find_forward(&self.session()?.instructions, 0);
        match found {
            Some(index) => {
                self.push_cursor(index)?;
                Ok(self)
            }
            None => Err(self.pattern_miss(pattern)),
        }
    }

    /// Moves the cursor to the last occurrence of `pattern`, scanning
    /// backward in place from the end of the sequence.
    pub fn find_last(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let session = self.session()?;
        let found = pattern.find_backward(&session.instructions, session.instructions.len());
        match found {
            Some(index) => {
                self.push_cursor(index)?;
                Ok(self)
            }
            None => Err(self.pattern_miss(pattern)),
        }
    }

    /// Moves the cursor to the next occurrence of `pattern` starting
    /// strictly after the current position.
    pub fn find_next(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let from = self.cursor()? + 1;
        let found = pattern.find_forward(&self.session()?.instructions, from);
        match found {
            Some(index) => {
                self.push_cursor(index)?;
                Ok(self)
            }
            None => Err(self.pattern_miss(pattern)),
        }
    }

    /// Moves the cursor to the previous occurrence of `pattern` starting
    /// strictly before the current position.
    pub fn find_previous(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        Self::ensure_pattern(pattern)?;
        let below = self.cursor()?;
        let found = pattern.find_backward(&self.session()?.instructions, below);
        match found {
            Some(index) => {
                self.push_cursor(index)?;
                Ok(self)
            }
            None => Err(self.pattern_miss(pattern)),
        }
    }

    /// Moves the cursor to the single instruction carrying `label`.
    ///
    /// With `from_current` set the scan starts strictly after the current
    /// position; otherwise it covers the whole sequence.
    pub fn find_label(&mut self, label: Label, from_current: bool) -> Result<&mut Self> {
        let from = if from_current { self.cursor()? + 1 } else { 0 };
        let session = self.session()?;
        let found = session
            .instructions
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, ins)| ins.labels.contains(&label))
            .map(|(index, _)| index);
        match found {
            Some(index) => {
                self.push_cursor(index)?;
                Ok(self)
            }
            None => Err(self.label_miss(label)),
        }
    }

    /// Alias for [`Editor::find_next`].
    pub fn advance_until(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        self.find_next(pattern)
    }

    /// Alias for [`Editor::find_previous`].
    pub fn retreat_until(&mut self, pattern: &Pattern) -> Result<&mut Self> {
        self.find_previous(pattern)
    }

    /// Applies `body` at every remaining occurrence of `pattern` after
    /// the current position, sweeping forward until no match is left.
    ///
    /// Running out of matches ends the sweep normally; an error from
    /// `body` aborts it. `body` must leave the cursor at or past each
    /// match for the sweep to make progress.
    pub fn for_each_match<F>(&mut self, pattern: &Pattern, mut body: F) -> Result<&mut Self>
    where
        F: FnMut(&mut Editor) -> Result<()>,
    {
        Self::ensure_pattern(pattern)?;
        loop {
            let from = self.cursor()? + 1;
            let found = pattern.find_forward(&self.session()?.instructions, from);
            match found {
                Some(index) => {
                    self.push_cursor(index)?;
                    body(self)?;
                }
                None => break,
            }
        }
        Ok(self)
    }
}
