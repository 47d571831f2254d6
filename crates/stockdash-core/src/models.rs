//! Typed rows decoded from loaded tables.
//!
//! Each decoder requires its columns to exist (`ViewError::MissingColumn`)
//! and silently skips rows whose cells are null or of the wrong kind, the
//! way a plotting library drops NaN points.

use chrono::NaiveDate;

use crate::table::{Table, Value};
use crate::views::ViewError;

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityRow {
    pub ticker: String,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub cumulative_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorReturn {
    pub sector: String,
    pub yearly_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StockYearlyReturn {
    pub symbol: String,
    pub sector: String,
    pub yearly_return: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMover {
    pub month: String,
    pub symbol: String,
    pub monthly_return: f64,
}

/// Resolves `columns` and maps every row through `f`, dropping `None`s.
fn decode<T>(
    table: &Table,
    columns: &[&str],
    f: impl Fn(&[&Value]) -> Option<T>,
) -> Result<Vec<T>, ViewError> {
    let indices = columns
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<_>, _>>()?;
    let mut cells = Vec::with_capacity(indices.len());
    let mut out = Vec::with_capacity(table.len());
    for row in table.rows() {
        cells.clear();
        cells.extend(indices.iter().map(|&i| &row[i]));
        if let Some(item) = f(&cells) {
            out.push(item);
        }
    }
    Ok(out)
}

impl VolatilityRow {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ViewError> {
        decode(table, &["ticker", "volatility"], |c| {
            Some(Self {
                ticker: c[0].label()?,
                volatility: c[1].as_f64()?,
            })
        })
    }
}

impl CumulativePoint {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ViewError> {
        decode(table, &["date", "cumulative_return"], |c| {
            Some(Self {
                date: c[0].as_date()?,
                cumulative_return: c[1].as_f64()?,
            })
        })
    }
}

impl SectorReturn {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ViewError> {
        decode(table, &["sector", "yearlyreturn"], |c| {
            Some(Self {
                sector: c[0].label()?,
                yearly_return: c[1].as_f64()?,
            })
        })
    }
}

impl StockYearlyReturn {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ViewError> {
        decode(table, &["symbol", "sector", "yearlyreturn"], |c| {
            Some(Self {
                symbol: c[0].label()?,
                sector: c[1].label()?,
                yearly_return: c[2].as_f64()?,
            })
        })
    }
}

impl MonthlyMover {
    pub fn from_table(table: &Table) -> Result<Vec<Self>, ViewError> {
        decode(table, &["month", "symbol", "monthly_return"], |c| {
            Some(Self {
                month: c[0].label()?,
                symbol: c[1].label()?,
                monthly_return: c[2].as_f64()?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_skips_rows_with_null_or_non_numeric_cells() {
        let table = Table::from_rows(
            "top_10_volatility",
            &["ticker", "volatility"],
            vec![
                vec!["AAPL".into(), 0.3.into()],
                vec!["MSFT".into(), Value::Null],
                vec![Value::Null, 0.2.into()],
                vec!["TSLA".into(), "n/a".into()],
                vec!["NVDA".into(), "0.41".into()],
            ],
        );
        let rows = VolatilityRow::from_table(&table).unwrap();
        assert_eq!(
            rows,
            vec![
                VolatilityRow { ticker: "AAPL".into(), volatility: 0.3 },
                VolatilityRow { ticker: "NVDA".into(), volatility: 0.41 },
            ]
        );
    }

    #[test]
    fn decode_requires_columns() {
        let table = Table::from_rows("sector_wise_performance", &["sector"], vec![]);
        let err = SectorReturn::from_table(&table).unwrap_err();
        assert!(matches!(err, ViewError::MissingColumn { ref column, .. } if column == "yearlyreturn"));
    }

    #[test]
    fn month_labels_come_from_dates_or_text() {
        let table = Table::from_rows(
            "monthly_top_5_gainers",
            &["Month", "Symbol", "Monthly_Return"],
            vec![
                vec!["2023-06".into(), "A".into(), 12.0.into()],
                vec![
                    NaiveDate::from_ymd_opt(2023, 7, 1).unwrap().into(),
                    "B".into(),
                    9.0.into(),
                ],
            ],
        );
        let rows = MonthlyMover::from_table(&table).unwrap();
        assert_eq!(rows[0].month, "2023-06");
        assert_eq!(rows[1].month, "2023-07-01");
    }
}
