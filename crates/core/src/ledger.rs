//! Record of rewrite passes applied per target method.
//!
//! Injected into the editor explicitly rather than read from ambient
//! global state, so search-failure diagnostics can name the other passes
//! that already reshaped a method without coupling the editor to any
//! particular patch framework.

use crate::instruction::TargetMethod;
use std::collections::HashMap;

/// Queryable record of previously-applied rewrite-pass names.
///
/// Only consumed on the search-failure path: when a pattern is missing,
/// the most common culprit is another pass having changed the shape the
/// current one expects, so the dump names every pass already applied to
/// the same target.
pub trait PatchLedger {
    /// Names of the passes already applied to `target`, in application
    /// order.
    fn applied_passes(&self, target: &TargetMethod) -> Vec<String>;
}

/// In-memory ledger keyed by target method.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    applied: HashMap<TargetMethod, Vec<String>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `pass` has been applied to `target`.
    pub fn record(&mut self, target: TargetMethod, pass: impl Into<String>) {
        self.applied.entry(target).or_default().push(pass.into());
    }
}

impl PatchLedger for InMemoryLedger {
    fn applied_passes(&self, target: &TargetMethod) -> Vec<String> {
        self.applied.get(target).cloned().unwrap_or_default()
    }
}
