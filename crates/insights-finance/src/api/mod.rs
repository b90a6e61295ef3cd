//! Clients for financial statement providers

pub mod yahoo;

pub use yahoo::{YahooStatementProvider, line_items, parse_timeseries};
