//! Per-seeder counters.

/// What happened to one fixture record during an upsert-by-key seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No row had the natural key; a new one was inserted
    Inserted,
    /// A row existed with different attributes and was overwritten
    Updated,
    /// A row existed with identical attributes
    Unchanged,
}

/// Totals for one upsert-by-key seeder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Rows inserted
    pub inserted: usize,
    /// Rows overwritten
    pub updated: usize,
    /// Rows left as they were
    pub unchanged: usize,
    /// References that could not be resolved and were left out
    pub skipped: usize,
}

impl SeedSummary {
    /// Counts one record outcome
    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    /// Number of records that reached the store, whatever the outcome
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.inserted + self.updated + self.unchanged
    }
}
