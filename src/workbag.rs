//! The scheduler's queue of live configuration sets.

use crate::configuration::ConfigurationSet;

/// Growable, unordered collection of configuration sets with bulk
/// compaction.
#[derive(Debug, Default)]
pub struct Workbag {
    sets: Vec<ConfigurationSet>,
}

impl Workbag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, set: ConfigurationSet) {
        self.sets.push(set);
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn swap(&mut self, other: &mut Workbag) {
        std::mem::swap(&mut self.sets, &mut other.sets);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigurationSet> {
        self.sets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ConfigurationSet> {
        self.sets.iter_mut()
    }

    /// Move every surviving (non-invalid) set into `target`, leaving this
    /// bag empty. Used by the monitor's compaction pass.
    pub fn drain_valid_into(&mut self, target: &mut Workbag) {
        for set in self.sets.drain(..) {
            if !set.invalid() {
                target.push(set);
            }
        }
    }
}
