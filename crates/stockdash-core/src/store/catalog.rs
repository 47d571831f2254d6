//! Dataset allow-list: logical dataset names to safe table references.

use std::fmt;

use super::StoreError;

/// A ticker symbol that is safe to embed in a table name.
///
/// Only `[A-Za-z0-9_.-]` is accepted, 1..=32 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: &str) -> Result<Self, StoreError> {
        let valid = !symbol.is_empty()
            && symbol.len() <= 32
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
        if valid {
            Ok(Self(symbol.to_string()))
        } else {
            Err(StoreError::UnknownDataset(format!("invalid ticker {:?}", symbol)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Logical datasets the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dataset {
    Volatility,
    /// Index of tickers that have a per-ticker cumulative series.
    CumulativeIndex,
    CumulativeSeries(Ticker),
    SectorPerformance,
    StockYearlyReturns,
    CorrelationMatrix,
    MonthlyReturns,
    MonthlyTopGainers,
    MonthlyTopLosers,
}

impl Dataset {
    /// Per-ticker cumulative series for `symbol`.
    ///
    /// Validates the symbol's characters only; membership in the cumulative
    /// index is checked by the caller against loaded data.
    pub fn cumulative_series(symbol: &str) -> Result<Self, StoreError> {
        Ticker::new(symbol).map(Dataset::CumulativeSeries)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Volatility => f.write_str("volatility"),
            Dataset::CumulativeIndex => f.write_str("cumulative_index"),
            Dataset::CumulativeSeries(t) => write!(f, "cumulative_series({})", t.as_str()),
            Dataset::SectorPerformance => f.write_str("sector_performance"),
            Dataset::StockYearlyReturns => f.write_str("stock_yearly_returns"),
            Dataset::CorrelationMatrix => f.write_str("correlation_matrix"),
            Dataset::MonthlyReturns => f.write_str("monthly_returns"),
            Dataset::MonthlyTopGainers => f.write_str("monthly_top_gainers"),
            Dataset::MonthlyTopLosers => f.write_str("monthly_top_losers"),
        }
    }
}

/// Maps datasets to table names, optionally qualified by a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    schema: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualifies every table with `schema`. Empty names are ignored.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        let schema = schema.into();
        self.schema = if schema.is_empty() { None } else { Some(schema) };
        self
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unquoted table name for `dataset`.
    pub fn table_name(&self, dataset: &Dataset) -> String {
        match dataset {
            Dataset::Volatility => "top_10_volatility".to_string(),
            Dataset::CumulativeIndex => "top5_cumulative_return".to_string(),
            Dataset::CumulativeSeries(t) => format!("{}_cumulative", t.as_str()),
            Dataset::SectorPerformance => "sector_wise_performance".to_string(),
            Dataset::StockYearlyReturns => "stocks_yearly_returns".to_string(),
            Dataset::CorrelationMatrix => "stock_correlation_matrix".to_string(),
            Dataset::MonthlyReturns => "monthly_returns_all_stocks".to_string(),
            Dataset::MonthlyTopGainers => "monthly_top_5_gainers".to_string(),
            Dataset::MonthlyTopLosers => "monthly_top_5_losers".to_string(),
        }
    }

    /// Quoted, schema-qualified reference safe to place in SQL text.
    pub fn table_ref(&self, dataset: &Dataset) -> String {
        let table = quote_ident(&self.table_name(dataset));
        match &self.schema {
            Some(schema) => format!("{}.{}", quote_ident(schema), table),
            None => table,
        }
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Builds the full-table query for a table reference from [`Catalog::table_ref`].
pub(crate) fn build_select_all_query(table_ref: &str) -> String {
    format!("SELECT * FROM {}", table_ref)
}
