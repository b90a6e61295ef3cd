//! Financial statement tables
//!
//! A [`FinancialTable`] is a grid of line items (rows) by reporting period
//! (columns). Periods are ordered newest first, which is the order the
//! tables are displayed in. Missing values stay `None` rather than zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The three statements fetched for every ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

impl StatementKind {
    /// All kinds in display order
    pub const ALL: [StatementKind; 3] = [
        StatementKind::BalanceSheet,
        StatementKind::IncomeStatement,
        StatementKind::CashFlow,
    ];

    /// Heading shown above the table and chart
    pub fn title(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::CashFlow => "Cash Flow",
        }
    }

    /// Stable identifier used in HTML ids and logs
    pub fn slug(self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "balance-sheet",
            StatementKind::IncomeStatement => "income-statement",
            StatementKind::CashFlow => "cash-flow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One reported value of one line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub key: String,
    pub period: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(key: impl Into<String>, period: NaiveDate, value: f64) -> Self {
        Self {
            key: key.into(),
            period,
            value,
        }
    }
}

/// A row of a statement table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Provider key, e.g. `TotalAssets`
    pub key: String,
    /// Human readable label, e.g. `Total Assets`
    pub label: String,
    /// One value per period of the owning table
    pub values: Vec<Option<f64>>,
}

impl LineItem {
    /// Most recent reported value
    pub fn latest(&self) -> Option<f64> {
        self.values.iter().flatten().next().copied()
    }
}

/// A statement as a line-item by period grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTable {
    pub kind: StatementKind,
    /// Reporting periods, newest first
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<LineItem>,
}

impl FinancialTable {
    /// A table with no rows and no periods
    pub fn empty(kind: StatementKind) -> Self {
        Self {
            kind,
            periods: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Pivot observations into a table
    ///
    /// Rows follow `item_order` first; keys not in `item_order` are appended
    /// in alphabetical order. Line items without any observation are left
    /// out. If the same key and period are observed twice, the later
    /// observation wins.
    pub fn from_observations(
        kind: StatementKind,
        observations: &[Observation],
        item_order: &[&str],
    ) -> Self {
        let periods: Vec<NaiveDate> = observations
            .iter()
            .map(|o| o.period)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();

        let column: HashMap<NaiveDate, usize> =
            periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();

        let mut by_key: HashMap<&str, Vec<Option<f64>>> = HashMap::new();
        for obs in observations {
            let values = by_key
                .entry(obs.key.as_str())
                .or_insert_with(|| vec![None; periods.len()]);
            if let Some(&idx) = column.get(&obs.period) {
                values[idx] = Some(obs.value);
            }
        }

        let mut extra: Vec<&str> = by_key
            .keys()
            .copied()
            .filter(|k| !item_order.contains(k))
            .collect();
        extra.sort_unstable();

        let rows = item_order
            .iter()
            .copied()
            .chain(extra)
            .filter_map(|key| {
                by_key.remove(key).map(|values| LineItem {
                    key: key.to_string(),
                    label: display_name(key),
                    values,
                })
            })
            .collect();

        Self {
            kind,
            periods,
            rows,
        }
    }

    /// Whether the table has no data
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.periods.is_empty()
    }

    /// Most recent reporting period
    pub fn latest_period(&self) -> Option<NaiveDate> {
        self.periods.first().copied()
    }

    /// Look up a row by provider key
    pub fn row(&self, key: &str) -> Option<&LineItem> {
        self.rows.iter().find(|r| r.key == key)
    }
}

/// The three statements of one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatementSet {
    pub ticker: String,
    pub balance_sheet: FinancialTable,
    pub income_statement: FinancialTable,
    pub cash_flow: FinancialTable,
}

impl FinancialStatementSet {
    /// A set where every statement is empty
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            balance_sheet: FinancialTable::empty(StatementKind::BalanceSheet),
            income_statement: FinancialTable::empty(StatementKind::IncomeStatement),
            cash_flow: FinancialTable::empty(StatementKind::CashFlow),
        }
    }

    /// The statements in display order
    pub fn tables(&self) -> [&FinancialTable; 3] {
        [&self.balance_sheet, &self.income_statement, &self.cash_flow]
    }

    /// Statement of the given kind
    pub fn get(&self, kind: StatementKind) -> &FinancialTable {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
            StatementKind::CashFlow => &self.cash_flow,
        }
    }

    /// Whether all three statements are empty
    pub fn is_empty(&self) -> bool {
        self.tables().iter().all(|t| t.is_empty())
    }
}

/// Turn a CamelCase provider key into a label
///
/// Runs of capitals stay together, so `BasicEPS` becomes `Basic EPS` and
/// `EBITDA` stays `EBITDA`.
pub fn display_name(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.push(c);
    }

    out
}

/// Format an amount with thousands separators
///
/// Whole numbers print without decimals; anything else keeps two.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let negative = value < 0.0;
    let abs = value.abs();
    let rendered = if abs.fract() == 0.0 {
        format!("{abs:.0}")
    } else {
        format!("{abs:.2}")
    };

    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
