//! The nine document categories and the shared per-category driver.
//!
//! Each category is plain data: a query, a root folder and a grouping
//! function. [`processor::CategoryProcessor`] runs any of them the same way.

pub mod definitions;
pub mod extract;
pub mod processor;

use crate::error::{DocexError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use definitions::{definition, CategoryDefinition, DEFINITIONS};
pub use extract::{extract_document, DocumentRecord, RowOutcome, SkipReason};
pub use processor::{CategoryOutcome, CategoryProcessor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Risk,
    Incident,
    Control,
    Action,
    Compliance,
    AuditRecommendation,
    AuditDetails,
    AuditFinding,
    Policy,
}

impl Category {
    /// Every category in run order.
    pub const ALL: [Category; 9] = [
        Category::Risk,
        Category::Incident,
        Category::Control,
        Category::Action,
        Category::Compliance,
        Category::AuditRecommendation,
        Category::AuditDetails,
        Category::AuditFinding,
        Category::Policy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Risk => "Risk",
            Category::Incident => "Incident",
            Category::Control => "Control",
            Category::Action => "Action",
            Category::Compliance => "Compliance",
            Category::AuditRecommendation => "AuditRecommendation",
            Category::AuditDetails => "AuditDetails",
            Category::AuditFinding => "AuditFinding",
            Category::Policy => "Policy",
        }
    }
}

impl FromStr for Category {
    type Err = DocexError;

    /// Case-insensitive, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DocexError::Config(format!("Unknown category: {}", s.trim())))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
