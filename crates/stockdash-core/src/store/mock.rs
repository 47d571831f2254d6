//! In-memory table source for tests and demo mode.
//!
//! `MockStore` keys tables by the catalog table name, so a fixture inserted
//! for `Dataset::CumulativeSeries("AAPL")` is served exactly as PostgreSQL
//! would serve `"AAPL_cumulative"`.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};

use super::{Catalog, Dataset, StoreError, TableSource};
use crate::table::{Table, Value};

/// In-memory table source.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    catalog: Catalog,
    tables: HashMap<String, Table>,
    loads: usize,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` as the contents of `dataset`.
    pub fn insert(&mut self, dataset: &Dataset, table: Table) {
        self.tables.insert(self.catalog.table_name(dataset), table);
    }

    /// Builder form of [`MockStore::insert`].
    pub fn with_table(mut self, dataset: &Dataset, table: Table) -> Self {
        self.insert(dataset, table);
        self
    }

    /// Number of successful and failed `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// A small, deterministic market: 12 tickers across 5 sectors, per-ticker
    /// cumulative series from 2017-07 to 2025-06, a correlation input table,
    /// and monthly movers for 2023.
    pub fn sample_market() -> Self {
        let mut store = Self::new();
        let mut rng = Lcg::new(0x5eed);

        store.insert(&Dataset::Volatility, sample_volatility(&mut rng));
        store.insert(
            &Dataset::CumulativeIndex,
            Table::from_rows(
                "top5_cumulative_return",
                &["ticker", "cumulative_return"],
                CUMULATIVE_TICKERS
                    .iter()
                    .map(|(t, r)| vec![(*t).into(), Value::Float(final_return(*r))])
                    .collect(),
            ),
        );
        for (ticker, monthly_rate) in CUMULATIVE_TICKERS {
            if let Ok(dataset) = Dataset::cumulative_series(ticker) {
                store.insert(&dataset, sample_series(ticker, *monthly_rate));
            }
        }

        let (sectors, stocks) = sample_sector_tables(&mut rng);
        store.insert(&Dataset::SectorPerformance, sectors);
        store.insert(&Dataset::StockYearlyReturns, stocks);
        store.insert(&Dataset::CorrelationMatrix, sample_price_matrix(&mut rng));

        let (monthly, gainers, losers) = sample_monthly_tables(&mut rng);
        store.insert(&Dataset::MonthlyReturns, monthly);
        store.insert(&Dataset::MonthlyTopGainers, gainers);
        store.insert(&Dataset::MonthlyTopLosers, losers);

        store
    }
}

impl TableSource for MockStore {
    fn load(&mut self, dataset: &Dataset) -> Result<Table, StoreError> {
        self.loads += 1;
        let name = self.catalog.table_name(dataset);
        self.tables
            .get(&name)
            .cloned()
            .ok_or_else(|| StoreError::QueryError(format!("relation \"{}\" does not exist", name)))
    }

    fn describe(&self) -> String {
        format!("mock({} tables)", self.tables.len())
    }
}

// ---------------------------------------------------------------------------
// Sample market fixtures
// ---------------------------------------------------------------------------

const TICKERS: [(&str, &str); 12] = [
    ("AAPL", "Technology"),
    ("MSFT", "Technology"),
    ("NVDA", "Technology"),
    ("AMD", "Technology"),
    ("JPM", "Finance"),
    ("GS", "Finance"),
    ("XOM", "Energy"),
    ("CVX", "Energy"),
    ("AMZN", "Consumer"),
    ("TSLA", "Consumer"),
    ("GOOGL", "Communication"),
    ("META", "Communication"),
];

/// Tickers with a cumulative series and their monthly growth rate.
const CUMULATIVE_TICKERS: &[(&str, f64)] = &[
    ("NVDA", 0.045),
    ("TSLA", 0.038),
    ("AMD", 0.031),
    ("AAPL", 0.022),
    ("MSFT", 0.020),
];

/// Linear congruential generator; enough for reproducible fixtures.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in [0, 1).
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi).
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn series_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 7, 3).unwrap_or_default()
}

const SERIES_MONTHS: u32 = 96;

fn final_return(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(SERIES_MONTHS as i32 - 1) - 1.0
}

fn sample_volatility(rng: &mut Lcg) -> Table {
    Table::from_rows(
        "top_10_volatility",
        &["ticker", "volatility"],
        TICKERS
            .iter()
            .map(|(t, _)| vec![(*t).into(), Value::Float(rng.range(0.01, 0.06))])
            .collect(),
    )
}

fn sample_series(ticker: &str, monthly_rate: f64) -> Table {
    let start = series_start();
    let rows = (0..SERIES_MONTHS)
        .filter_map(|m| {
            let date = start.checked_add_months(Months::new(m))?;
            let value = (1.0 + monthly_rate).powi(m as i32) - 1.0;
            Some(vec![ticker.into(), Value::Date(date), Value::Float(value)])
        })
        .collect();
    Table::from_rows(
        format!("{}_cumulative", ticker),
        &["ticker", "date", "cumulative_return"],
        rows,
    )
}

fn sample_sector_tables(rng: &mut Lcg) -> (Table, Table) {
    let stock_rows: Vec<(String, String, f64)> = TICKERS
        .iter()
        .map(|(t, s)| (t.to_string(), s.to_string(), rng.range(-15.0, 60.0)))
        .collect();

    let mut sector_names: Vec<&str> = TICKERS.iter().map(|(_, s)| *s).collect();
    sector_names.dedup();
    let sector_rows = sector_names
        .iter()
        .map(|sector| {
            let members: Vec<f64> = stock_rows
                .iter()
                .filter(|(_, s, _)| s.as_str() == *sector)
                .map(|(_, _, r)| *r)
                .collect();
            let mean = members.iter().sum::<f64>() / members.len().max(1) as f64;
            vec![(*sector).into(), Value::Float(mean)]
        })
        .collect();

    let stocks = Table::from_rows(
        "stocks_yearly_returns",
        &["symbol", "sector", "yearlyreturn"],
        stock_rows
            .into_iter()
            .map(|(t, s, r)| vec![t.into(), s.into(), Value::Float(r)])
            .collect(),
    );
    let sectors = Table::from_rows(
        "sector_wise_performance",
        &["sector", "yearlyreturn"],
        sector_rows,
    );
    (sectors, stocks)
}

/// Daily closes driven by one shared market factor plus noise, so the
/// correlation heatmap has structure.
fn sample_price_matrix(rng: &mut Lcg) -> Table {
    let mut columns = vec!["date"];
    columns.extend(TICKERS.iter().map(|(t, _)| *t));

    let betas: Vec<f64> = TICKERS.iter().map(|_| rng.range(0.2, 1.5)).collect();
    let mut prices: Vec<f64> = TICKERS.iter().map(|_| rng.range(50.0, 400.0)).collect();
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap_or_default();

    let rows = (0..120u64)
        .map(|day| {
            let market = rng.range(-0.02, 0.02);
            let mut row = vec![Value::Date(start + chrono::Days::new(day))];
            for (price, beta) in prices.iter_mut().zip(&betas) {
                *price *= 1.0 + beta * market + rng.range(-0.01, 0.01);
                row.push(Value::Float(*price));
            }
            row
        })
        .collect();
    Table::from_rows("stock_correlation_matrix", &columns, rows)
}

fn sample_monthly_tables(rng: &mut Lcg) -> (Table, Table, Table) {
    let mut monthly = Vec::new();
    let mut gainers = Vec::new();
    let mut losers = Vec::new();

    for month in 1..=12u32 {
        let Some(first) = NaiveDate::from_ymd_opt(2023, month, 1) else {
            continue;
        };
        let label = format!("{}-{:02}", first.year(), first.month());
        let mut returns: Vec<(&str, f64)> = TICKERS
            .iter()
            .map(|(t, _)| (*t, rng.range(-20.0, 25.0)))
            .collect();
        for (t, r) in &returns {
            monthly.push(vec![label.as_str().into(), (*t).into(), Value::Float(*r)]);
        }
        returns.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (t, r) in returns.iter().take(5) {
            gainers.push(vec![label.as_str().into(), (*t).into(), Value::Float(*r)]);
        }
        for (t, r) in returns.iter().rev().take(5) {
            losers.push(vec![label.as_str().into(), (*t).into(), Value::Float(*r)]);
        }
    }

    let columns = ["month", "symbol", "monthly_return"];
    (
        Table::from_rows("monthly_returns_all_stocks", &columns, monthly),
        Table::from_rows("monthly_top_5_gainers", &columns, gainers),
        Table::from_rows("monthly_top_5_losers", &columns, losers),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_is_a_query_error() {
        let mut store = MockStore::new();
        let err = store.load(&Dataset::Volatility).unwrap_err();
        assert_eq!(
            err,
            StoreError::QueryError("relation \"top_10_volatility\" does not exist".to_string())
        );
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn loads_are_idempotent() {
        let mut store = MockStore::sample_market();
        for dataset in [
            Dataset::Volatility,
            Dataset::SectorPerformance,
            Dataset::CorrelationMatrix,
            Dataset::MonthlyTopGainers,
        ] {
            let a = store.load(&dataset).unwrap();
            let b = store.load(&dataset).unwrap();
            assert_eq!(a, b, "{dataset}");
        }
    }

    #[test]
    fn sample_market_serves_every_dataset() {
        let mut store = MockStore::sample_market();
        let mut datasets = vec![
            Dataset::Volatility,
            Dataset::CumulativeIndex,
            Dataset::SectorPerformance,
            Dataset::StockYearlyReturns,
            Dataset::CorrelationMatrix,
            Dataset::MonthlyReturns,
            Dataset::MonthlyTopGainers,
            Dataset::MonthlyTopLosers,
        ];
        for (ticker, _) in CUMULATIVE_TICKERS {
            datasets.push(Dataset::cumulative_series(ticker).unwrap());
        }
        for dataset in &datasets {
            let table = store.load(dataset).unwrap();
            assert!(!table.is_empty(), "{dataset}");
        }
    }

    #[test]
    fn sample_movers_are_top_five_per_month() {
        let mut store = MockStore::sample_market();
        let gainers = store.load(&Dataset::MonthlyTopGainers).unwrap();
        let losers = store.load(&Dataset::MonthlyTopLosers).unwrap();
        assert_eq!(gainers.len(), 60);
        assert_eq!(losers.len(), 60);
    }

    #[test]
    fn sample_series_spans_the_date_slider() {
        let mut store = MockStore::sample_market();
        let series = store
            .load(&Dataset::cumulative_series("AAPL").unwrap())
            .unwrap();
        let idx = series.require_column("date").unwrap();
        let dates: Vec<NaiveDate> = series.column_values(idx).filter_map(Value::as_date).collect();
        assert!(dates[0] < NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert!(*dates.last().unwrap() > NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
