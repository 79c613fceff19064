//! Structural pattern templates and contiguous-run matching over an
//! instruction slice.

use crate::instruction::{Instruction, Opcode, Operand};
use std::fmt;

/// One step of a pattern: an opcode to match exactly, and optionally an
/// operand that must also compare equal. An omitted operand is a
/// "don't care".
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub op: Opcode,
    pub operand: Option<Operand>,
}

impl Step {
    /// Opcode-only step; any operand on the candidate instruction matches.
    pub fn op(op: Opcode) -> Self {
        Self { op, operand: None }
    }

    /// Step requiring both opcode and operand to compare equal.
    pub fn with_operand(op: Opcode, operand: Operand) -> Self {
        Self {
            op,
            operand: Some(operand),
        }
    }

    fn matches(&self, candidate: &Instruction) -> bool {
        if self.op != candidate.op {
            return false;
        }
        match &self.operand {
            Some(operand) => candidate.operand.as_ref() == Some(operand),
            None => true,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {}", self.op, operand),
            None => write!(f, "{}", self.op),
        }
    }
}

/// Ordered template matched against a contiguous run of instructions.
/// Constructed ad hoc per search call; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern(Vec<Step>);

impl Pattern {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    /// Shorthand for an opcode-only pattern.
    pub fn of_ops(ops: &[Opcode]) -> Self {
        Self(ops.iter().copied().map(Step::op).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when the run starting at `at` matches every step.
    pub fn matches_at(&self, instructions: &[Instruction], at: usize) -> bool {
        if at + self.0.len() > instructions.len() {
            return false;
        }
        self.0
            .iter()
            .zip(&instructions[at..])
            .all(|(step, ins)| step.matches(ins))
    }

    /// Index of the first match whose start lies in `[from, len)`.
    pub fn find_forward(&self, instructions: &[Instruction], from: usize) -> Option<usize> {
        if self.0.is_empty() || from >= instructions.len() {
            return None;
        }
        (from..instructions.len()).find(|&at| self.matches_at(instructions, at))
    }

    /// Index of the last match whose start lies in `[0, below)`. Scans
    /// backward in place rather than reversing the sequence.
    pub fn find_backward(&self, instructions: &[Instruction], below: usize) -> Option<usize> {
        if self.0.is_empty() {
            return None;
        }
        let upper = below.min(instructions.len());
        (0..upper)
            .rev()
            .find(|&at| self.matches_at(instructions, at))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl From<Vec<Step>> for Pattern {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}
