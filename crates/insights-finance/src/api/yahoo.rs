//! Yahoo Finance fundamentals client
//!
//! Statements come from the fundamentals time-series endpoint. Each line
//! item is requested as its own series (`annualTotalAssets`,
//! `quarterlyNetIncome`, ...), and every series in the response is tagged
//! with its key in `meta.type`.

use crate::config::{InsightsConfig, StatementFrequency};
use crate::error::{FetchError, InsightsError, Result};
use crate::fetcher::StatementProvider;
use crate::statements::{FinancialStatementSet, FinancialTable, Observation, StatementKind};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 2016-12-31, the earliest period the endpoint reliably serves
const PERIOD_START: i64 = 1_483_142_400;

/// Balance sheet line items in display order
pub const BALANCE_SHEET_ITEMS: &[&str] = &[
    "TotalAssets",
    "CurrentAssets",
    "CashAndCashEquivalents",
    "CashCashEquivalentsAndShortTermInvestments",
    "AccountsReceivable",
    "Inventory",
    "NetPPE",
    "Goodwill",
    "TotalLiabilitiesNetMinorityInterest",
    "CurrentLiabilities",
    "AccountsPayable",
    "LongTermDebt",
    "TotalDebt",
    "NetDebt",
    "StockholdersEquity",
    "RetainedEarnings",
    "WorkingCapital",
    "InvestedCapital",
    "TangibleBookValue",
    "OrdinarySharesNumber",
];

/// Income statement line items in display order
pub const INCOME_STATEMENT_ITEMS: &[&str] = &[
    "TotalRevenue",
    "CostOfRevenue",
    "GrossProfit",
    "ResearchAndDevelopment",
    "SellingGeneralAndAdministration",
    "OperatingExpense",
    "OperatingIncome",
    "InterestExpense",
    "PretaxIncome",
    "TaxProvision",
    "NetIncome",
    "NetIncomeCommonStockholders",
    "BasicEPS",
    "DilutedEPS",
    "BasicAverageShares",
    "DilutedAverageShares",
    "EBIT",
    "EBITDA",
    "NormalizedEBITDA",
];

/// Cash flow line items in display order
pub const CASH_FLOW_ITEMS: &[&str] = &[
    "OperatingCashFlow",
    "CapitalExpenditure",
    "FreeCashFlow",
    "InvestingCashFlow",
    "FinancingCashFlow",
    "DepreciationAndAmortization",
    "StockBasedCompensation",
    "ChangeInWorkingCapital",
    "RepurchaseOfCapitalStock",
    "CashDividendsPaid",
    "IssuanceOfDebt",
    "RepaymentOfDebt",
    "BeginningCashPosition",
    "EndCashPosition",
    "ChangesInCash",
];

/// Line items requested for a statement
pub fn line_items(kind: StatementKind) -> &'static [&'static str] {
    match kind {
        StatementKind::BalanceSheet => BALANCE_SHEET_ITEMS,
        StatementKind::IncomeStatement => INCOME_STATEMENT_ITEMS,
        StatementKind::CashFlow => CASH_FLOW_ITEMS,
    }
}

/// Statement provider backed by Yahoo Finance
#[derive(Debug, Clone)]
pub struct YahooStatementProvider {
    client: Client,
    base_url: Url,
    frequency: StatementFrequency,
}

impl YahooStatementProvider {
    /// Create a provider from the insight configuration
    pub fn new(config: &InsightsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.yahoo_base_url)?,
            frequency: config.frequency,
        })
    }

    /// Endpoint for `ticker`, with the symbol as one percent-encoded segment
    fn statement_url(&self, ticker: &str) -> Url {
        let mut url = self.base_url.clone();
        // `parse_base_url` rejects URLs that cannot take path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(ticker);
        }
        url
    }

    /// Fetch and parse one statement
    #[instrument(skip(self), fields(frequency = self.frequency.prefix()))]
    pub async fn statement(
        &self,
        ticker: &str,
        kind: StatementKind,
    ) -> std::result::Result<FinancialTable, FetchError> {
        let prefix = self.frequency.prefix();
        let types = line_items(kind)
            .iter()
            .map(|item| format!("{prefix}{item}"))
            .collect::<Vec<_>>()
            .join(",");
        let period1 = PERIOD_START.to_string();
        let period2 = Utc::now().timestamp().to_string();

        let response = self
            .client
            .get(self.statement_url(ticker))
            .query(&[
                ("symbol", ticker),
                ("type", types.as_str()),
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, ticker));
        }

        let body = response.text().await?;
        let table = parse_timeseries(kind, self.frequency, &body)?;
        debug!(
            rows = table.rows.len(),
            periods = table.periods.len(),
            "Parsed statement"
        );
        Ok(table)
    }
}

#[async_trait]
impl StatementProvider for YahooStatementProvider {
    async fn lookup(&self, ticker: &str) -> std::result::Result<FinancialStatementSet, FetchError> {
        let (balance_sheet, income_statement, cash_flow) = tokio::try_join!(
            self.statement(ticker, StatementKind::BalanceSheet),
            self.statement(ticker, StatementKind::IncomeStatement),
            self.statement(ticker, StatementKind::CashFlow),
        )?;

        Ok(FinancialStatementSet {
            ticker: ticker.to_string(),
            balance_sheet,
            income_statement,
            cash_flow,
        })
    }
}

/// Parse the configured endpoint, which must be able to take a symbol segment
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim())
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .ok_or_else(|| InsightsError::Config(format!("invalid yahoo_base_url: {raw}")))
}

fn classify_status(status: StatusCode, ticker: &str) -> FetchError {
    match status {
        StatusCode::NOT_FOUND => FetchError::UnknownSymbol(ticker.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            FetchError::Network("rate limited by provider (HTTP 429)".to_string())
        }
        other => FetchError::Network(format!("provider returned HTTP {}", other.as_u16())),
    }
}

#[derive(Debug, Deserialize)]
struct TimeseriesEnvelope {
    timeseries: TimeseriesBody,
}

#[derive(Debug, Deserialize)]
struct TimeseriesBody {
    #[serde(default)]
    result: Option<Vec<SeriesResult>>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SeriesResult {
    meta: SeriesMeta,
    #[serde(flatten)]
    series: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct SeriesMeta {
    #[serde(rename = "type", default)]
    kind: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DataPoint {
    as_of_date: String,
    #[serde(default)]
    reported_value: Option<ReportedValue>,
}

#[derive(Debug, Deserialize)]
struct ReportedValue {
    #[serde(default)]
    raw: Option<f64>,
}

/// Parse a time-series response body into a statement table
///
/// Series are matched by `meta.type`; entries that are `null` or carry no
/// value are skipped. A response without any data yields an empty table.
pub fn parse_timeseries(
    kind: StatementKind,
    frequency: StatementFrequency,
    body: &str,
) -> std::result::Result<FinancialTable, FetchError> {
    let envelope: TimeseriesEnvelope = serde_json::from_str(body)?;

    if let Some(err) = envelope.timeseries.error {
        if err.code.eq_ignore_ascii_case("not found") {
            return Err(FetchError::UnknownSymbol(err.description));
        }
        return Err(FetchError::Malformed(format!(
            "provider error {}: {}",
            err.code, err.description
        )));
    }

    let prefix = frequency.prefix();
    let mut observations = Vec::new();

    for result in envelope.timeseries.result.unwrap_or_default() {
        let Some(series_key) = result.meta.kind.first() else {
            continue;
        };
        let Some(item) = series_key.strip_prefix(prefix) else {
            continue;
        };
        let Some(raw_points) = result.series.get(series_key) else {
            continue;
        };

        let points: Vec<Option<DataPoint>> = serde_json::from_value(raw_points.clone())?;
        for point in points.into_iter().flatten() {
            let Some(value) = point.reported_value.and_then(|v| v.raw) else {
                continue;
            };
            match NaiveDate::parse_from_str(&point.as_of_date, "%Y-%m-%d") {
                Ok(period) => observations.push(Observation::new(item, period, value)),
                Err(e) => {
                    warn!(series = %series_key, date = %point.as_of_date, "Skipping bad date: {e}");
                }
            }
        }
    }

    Ok(FinancialTable::from_observations(
        kind,
        &observations,
        line_items(kind),
    ))
}
