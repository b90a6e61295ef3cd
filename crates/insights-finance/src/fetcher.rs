//! Financial data fetching
//!
//! [`FinancialDataFetcher`] wraps a [`StatementProvider`] and turns every
//! provider outcome into either a complete statement set or a [`FetchError`].
//! Nothing is retried and nothing is cached between calls.

use crate::error::FetchError;
use crate::statements::FinancialStatementSet;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Source of the three financial statements for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatementProvider: Send + Sync {
    /// Retrieve balance sheet, income statement and cash flow
    async fn lookup(&self, ticker: &str) -> Result<FinancialStatementSet, FetchError>;
}

/// Fetches statement sets and classifies failures
#[derive(Clone)]
pub struct FinancialDataFetcher {
    provider: Arc<dyn StatementProvider>,
}

impl FinancialDataFetcher {
    pub fn new(provider: Arc<dyn StatementProvider>) -> Self {
        Self { provider }
    }

    /// Fetch all three statements for `ticker`
    ///
    /// Individual statements may be empty. A set where all three are empty
    /// means the provider knows nothing about the symbol and is reported as
    /// [`FetchError::UnknownSymbol`], as is an empty ticker, which never
    /// reaches the provider.
    #[instrument(skip(self))]
    pub async fn fetch(&self, ticker: &str) -> Result<FinancialStatementSet, FetchError> {
        if ticker.is_empty() {
            warn!("Blank ticker");
            return Err(FetchError::UnknownSymbol(String::new()));
        }

        let statements = match self.provider.lookup(ticker).await {
            Ok(statements) => statements,
            Err(err) => {
                warn!(error = %err, "Statement lookup failed");
                return Err(err);
            }
        };

        if statements.is_empty() {
            warn!("Provider returned no statements");
            return Err(FetchError::UnknownSymbol(ticker.to_string()));
        }

        info!(
            balance_sheet_rows = statements.balance_sheet.rows.len(),
            income_statement_rows = statements.income_statement.rows.len(),
            cash_flow_rows = statements.cash_flow.rows.len(),
            "Fetched financial statements"
        );
        Ok(statements)
    }
}

impl std::fmt::Debug for FinancialDataFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinancialDataFetcher").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::statements::{FinancialTable, Observation, StatementKind};
    use chrono::NaiveDate;

    /// A statement set with one row in each table
    pub(crate) fn sample_statements(ticker: &str) -> FinancialStatementSet {
        let period = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        let table = |kind, key: &str, value| {
            FinancialTable::from_observations(
                kind,
                &[Observation::new(key, period, value)],
                &[key],
            )
        };

        FinancialStatementSet {
            ticker: ticker.to_string(),
            balance_sheet: table(
                StatementKind::BalanceSheet,
                "TotalAssets",
                352_583_000_000.0,
            ),
            income_statement: table(
                StatementKind::IncomeStatement,
                "TotalRevenue",
                383_285_000_000.0,
            ),
            cash_flow: table(StatementKind::CashFlow, "FreeCashFlow", 99_584_000_000.0),
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .withf(|ticker| ticker == "AAPL")
            .times(1)
            .returning(|ticker| Ok(sample_statements(ticker)));

        let fetcher = FinancialDataFetcher::new(Arc::new(provider));
        let statements = fetcher.fetch("AAPL").await.unwrap();

        let kinds: Vec<StatementKind> = statements.tables().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StatementKind::BalanceSheet,
                StatementKind::IncomeStatement,
                StatementKind::CashFlow
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_ticker_is_unknown_symbol() {
        let mut provider = MockStatementProvider::new();
        provider.expect_lookup().times(0);

        let fetcher = FinancialDataFetcher::new(Arc::new(provider));
        let err = fetcher.fetch("").await.unwrap_err();
        assert_eq!(err, FetchError::UnknownSymbol(String::new()));
    }

    #[tokio::test]
    async fn test_provider_error_is_returned() {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .returning(|_| Err(FetchError::Network("connection reset".to_string())));

        let fetcher = FinancialDataFetcher::new(Arc::new(provider));
        let err = fetcher.fetch("AAPL").await.unwrap_err();
        assert_eq!(err, FetchError::Network("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_all_empty_is_unknown_symbol() {
        let mut provider = MockStatementProvider::new();
        provider
            .expect_lookup()
            .returning(|ticker| Ok(FinancialStatementSet::empty(ticker)));

        let fetcher = FinancialDataFetcher::new(Arc::new(provider));
        let err = fetcher.fetch("ZZZZ999").await.unwrap_err();
        assert_eq!(err, FetchError::UnknownSymbol("ZZZZ999".to_string()));
    }

    #[tokio::test]
    async fn test_partially_empty_set_is_success() {
        let mut provider = MockStatementProvider::new();
        provider.expect_lookup().returning(|ticker| {
            let mut set = sample_statements(ticker);
            set.cash_flow = FinancialTable::empty(StatementKind::CashFlow);
            Ok(set)
        });

        let fetcher = FinancialDataFetcher::new(Arc::new(provider));
        let statements = fetcher.fetch("MSFT").await.unwrap();
        assert!(statements.cash_flow.is_empty());
        assert!(!statements.balance_sheet.is_empty());
    }
}
