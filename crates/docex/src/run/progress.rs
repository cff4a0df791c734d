use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryStatus {
    Pending,
    Processing,
    Completed,
    Error,
    /// Stopped by cancellation before the row stream ended.
    Cancelled,
}

impl CategoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryStatus::Pending => "pending",
            CategoryStatus::Processing => "processing",
            CategoryStatus::Completed => "completed",
            CategoryStatus::Error => "error",
            CategoryStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressCounter {
    pub category: Category,
    pub total_rows: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub duplicates: u64,
    pub current_file: Option<String>,
    pub status: CategoryStatus,
}

impl ProgressCounter {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            total_rows: 0,
            succeeded: 0,
            failed: 0,
            duplicates: 0,
            current_file: None,
            status: CategoryStatus::Pending,
        }
    }

    pub fn totals(&self) -> RunTotals {
        RunTotals {
            total_rows: self.total_rows,
            succeeded: self.succeeded,
            failed: self.failed,
            duplicates: self.duplicates,
        }
    }
}

/// Counts summed over categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub total_rows: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub duplicates: u64,
}

impl AddAssign for RunTotals {
    fn add_assign(&mut self, other: Self) {
        self.total_rows += other.total_rows;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.duplicates += other.duplicates;
    }
}

/// Per-category counters shared between the extraction threads and whoever
/// displays them.
///
/// Holds one counter per category for its whole lifetime; each counter is only
/// written by the processor running that category.
#[derive(Debug)]
pub struct ProgressBoard {
    counters: RwLock<Vec<ProgressCounter>>,
}

impl Default for ProgressBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBoard {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(Category::ALL.iter().copied().map(ProgressCounter::new).collect()),
        }
    }

    /// Puts every category back to pending with zero counts.
    pub fn reset(&self) {
        let mut counters = self.counters.write().unwrap_or_else(|p| p.into_inner());
        for counter in counters.iter_mut() {
            *counter = ProgressCounter::new(counter.category);
        }
    }

    pub fn update<F>(&self, category: Category, f: F)
    where
        F: FnOnce(&mut ProgressCounter),
    {
        let mut counters = self.counters.write().unwrap_or_else(|p| p.into_inner());
        f(&mut counters[category as usize]);
    }

    pub fn set_status(&self, category: Category, status: CategoryStatus) {
        self.update(category, |counter| counter.status = status);
    }

    pub fn get(&self, category: Category) -> ProgressCounter {
        self.counters.read().unwrap_or_else(|p| p.into_inner())[category as usize].clone()
    }

    pub fn snapshot(&self) -> Vec<ProgressCounter> {
        self.counters.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn totals(&self) -> RunTotals {
        let mut totals = RunTotals::default();
        for counter in self.counters.read().unwrap_or_else(|p| p.into_inner()).iter() {
            totals += counter.totals();
        }
        totals
    }
}
