//! Report sections

use serde::{Deserialize, Serialize};
use std::fmt;

/// One analysis section of the report
///
/// The label is the only thing that differs between the section prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    EarningsDataAnalysis,
    FinancialDataAnalysis,
    BrainstormValues,
}

impl Section {
    /// Every section, in the order it is generated and shown
    pub const ALL: [Section; 3] = [
        Section::EarningsDataAnalysis,
        Section::FinancialDataAnalysis,
        Section::BrainstormValues,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::EarningsDataAnalysis => "Earnings Data Analysis",
            Section::FinancialDataAnalysis => "Financial Data Analysis",
            Section::BrainstormValues => "Brainstorm Values",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
