//! Record observers.

use crate::logger::{Level, Record};
use metalog_shared::{ErrorEnvelope, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// An observer fired for each emitted record whose level it declares.
///
/// Hooks run synchronously on the thread performing the emission. A failing
/// hook is reported and does not stop the record from being written.
pub trait Hook: Send + Sync {
    /// Levels this hook observes.
    fn levels(&self) -> &[Level];

    /// Observe a record.
    fn fire(&self, record: &Record) -> Result<()>;
}

/// Hook table keyed by level.
#[derive(Default, Clone)]
pub struct LevelHooks {
    by_level: BTreeMap<Level, Vec<Arc<dyn Hook>>>,
}

impl LevelHooks {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` under each of its declared levels.
    pub fn add(&mut self, hook: Arc<dyn Hook>) {
        for level in hook.levels() {
            self.by_level
                .entry(*level)
                .or_default()
                .push(Arc::clone(&hook));
        }
    }

    /// Hooks registered for `level`.
    #[must_use]
    pub fn for_level(&self, level: Level) -> &[Arc<dyn Hook>] {
        self.by_level.get(&level).map_or(&[], Vec::as_slice)
    }

    /// Total (hook, level) registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_level.values().map(Vec::len).sum()
    }

    /// Returns true when no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_level.values().all(Vec::is_empty)
    }

    /// Fire every hook registered for the record's level, collecting failures.
    pub fn fire(&self, record: &Record) -> Vec<ErrorEnvelope> {
        self.for_level(record.level)
            .iter()
            .filter_map(|hook| hook.fire(record).err())
            .collect()
    }
}

impl fmt::Debug for LevelHooks {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<Level, usize> = self
            .by_level
            .iter()
            .map(|(level, hooks)| (*level, hooks.len()))
            .collect();
        formatter
            .debug_struct("LevelHooks")
            .field("by_level", &counts)
            .finish()
    }
}
