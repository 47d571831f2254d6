//! Cumulative return over time, one area chart per selected ticker.
//!
//! The ticker list comes from the cumulative index table; each ticker's
//! series lives in its own table. Charts are produced for every selected
//! ticker, in selection order.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::chart::{AreaChart, AreaPoint, Axis, Chart};
use crate::fmt::{format_date, parse_date};
use crate::models::CumulativePoint;
use crate::store::StoreError;
use crate::table::Table;

use super::{Control, ViewError, ViewKind, ViewPage, ViewParams, Widget};

/// Number of tickers selected by default.
pub const DEFAULT_SELECTION: usize = 2;

/// Date slider bounds.
pub fn range_bounds() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
    )
}

/// Resolved control state for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// All tickers offered by the multiselect.
    pub options: Vec<String>,
    /// Selected tickers, in selection order.
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolves the request against the cumulative index table.
///
/// Tickers not present in the index are rejected as unknown datasets, so a
/// per-ticker table name is only ever built from index data.
pub fn select(index: &Table, params: &ViewParams) -> Result<Selection, ViewError> {
    let options = index.distinct_labels("ticker")?;

    let tickers = match params.ticker_selection() {
        Some(requested) => {
            if let Some(unknown) = requested.iter().find(|t| !options.contains(t)) {
                return Err(StoreError::UnknownDataset(format!(
                    "no cumulative series for {:?}",
                    unknown
                ))
                .into());
            }
            requested
        }
        None => options.iter().take(DEFAULT_SELECTION).cloned().collect(),
    };

    let (min, max) = range_bounds();
    let start = parse_param_date("start", params.start.as_deref())?
        .unwrap_or(min)
        .clamp(min, max);
    let end = parse_param_date("end", params.end.as_deref())?
        .unwrap_or(max)
        .clamp(min, max);
    if start > end {
        return Err(ViewError::InvalidParams(format!(
            "start {} is after end {}",
            format_date(start),
            format_date(end)
        )));
    }

    Ok(Selection {
        options,
        tickers,
        start,
        end,
    })
}

fn parse_param_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ViewError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| ViewError::InvalidParams(format!("{} is not a date: {:?}", name, s))),
    }
}

/// Points within `[start, end]` (inclusive), sorted by date.
pub fn points_in_range(
    mut points: Vec<CumulativePoint>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CumulativePoint> {
    points.retain(|p| p.date >= start && p.date <= end);
    points.sort_by_key(|p| p.date);
    points
}

/// Renders the page from the selection and each selected ticker's series,
/// given in selection order.
pub fn render(
    selection: &Selection,
    series: &[(String, Arc<Table>)],
) -> Result<ViewPage, ViewError> {
    let (min, max) = range_bounds();
    let mut page = ViewPage::new(ViewKind::CumulativeReturn);
    page.controls.push(Control::MultiSelect {
        key: "tickers".to_string(),
        label: "Select Stocks".to_string(),
        options: selection.options.clone(),
        selected: selection.tickers.clone(),
    });
    page.controls.push(Control::DateRange {
        start_key: "start".to_string(),
        end_key: "end".to_string(),
        label: "Date Range".to_string(),
        min: format_date(min),
        max: format_date(max),
        start: format_date(selection.start),
        end: format_date(selection.end),
    });

    for (ticker, table) in series {
        let points = points_in_range(
            CumulativePoint::from_table(table)?,
            selection.start,
            selection.end,
        );
        page.widgets.push(Widget::Chart {
            chart: Chart::Area(AreaChart {
                title: format!("{} Cumulative Return", ticker),
                x_axis: Axis::titled("date"),
                y_axis: Axis::titled("cumulative_return"),
                points: points
                    .into_iter()
                    .map(|p| AreaPoint {
                        x: format_date(p.date),
                        y: p.cumulative_return,
                    })
                    .collect(),
            }),
        });
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn index() -> Table {
        Table::from_rows(
            "top5_cumulative_return",
            &["ticker", "date", "cumulative_return"],
            vec![
                vec!["AAPL".into(), d(2020, 1, 1).into(), 0.1.into()],
                vec!["AAPL".into(), d(2020, 2, 1).into(), 0.2.into()],
                vec!["MSFT".into(), d(2020, 1, 1).into(), 0.3.into()],
                vec!["NVDA".into(), d(2020, 1, 1).into(), 0.4.into()],
            ],
        )
    }

    fn series(ticker: &str) -> Arc<Table> {
        Arc::new(Table::from_rows(
            format!("{ticker}_cumulative"),
            &["date", "cumulative_return"],
            vec![
                vec!["2019-03-01".into(), 0.3.into()],
                vec![d(2017, 12, 31).into(), 0.0.into()],
                vec![d(2018, 1, 1).into(), 0.1.into()],
                vec![Value::Null, 0.9.into()],
                vec![d(2025, 1, 1).into(), 0.8.into()],
                vec![d(2025, 1, 2).into(), 0.85.into()],
            ],
        ))
    }

    fn params(tickers: Option<&str>, start: Option<&str>, end: Option<&str>) -> ViewParams {
        ViewParams {
            tickers: tickers.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_to_first_two_tickers_and_full_range() {
        let sel = select(&index(), &ViewParams::default()).unwrap();
        assert_eq!(sel.options, vec!["AAPL", "MSFT", "NVDA"]);
        assert_eq!(sel.tickers, vec!["AAPL", "MSFT"]);
        assert_eq!((sel.start, sel.end), range_bounds());
    }

    #[test]
    fn unknown_ticker_is_rejected_before_any_table_name_is_built() {
        let err = select(&index(), &params(Some("AAPL,x\"; DROP"), None, None)).unwrap_err();
        assert!(matches!(err, ViewError::Store(StoreError::UnknownDataset(_))));
    }

    #[test]
    fn dates_are_clamped_and_validated() {
        let sel = select(&index(), &params(None, Some("2010-01-01"), Some("2030-01-01"))).unwrap();
        assert_eq!((sel.start, sel.end), range_bounds());

        let err = select(&index(), &params(None, Some("2022-01-01"), Some("2020-01-01")));
        assert!(matches!(err, Err(ViewError::InvalidParams(_))));

        let err = select(&index(), &params(None, Some("yesterday"), None));
        assert!(matches!(err, Err(ViewError::InvalidParams(_))));
    }

    #[test]
    fn renders_one_chart_per_selected_ticker_in_order() {
        let sel = select(&index(), &params(Some("MSFT,AAPL"), None, None)).unwrap();
        let page = render(
            &sel,
            &[("MSFT".into(), series("MSFT")), ("AAPL".into(), series("AAPL"))],
        )
        .unwrap();
        let titles: Vec<&str> = page.charts().iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["MSFT Cumulative Return", "AAPL Cumulative Return"]);
    }

    #[test]
    fn points_are_filtered_inclusively_and_sorted() {
        let sel = select(&index(), &params(Some("AAPL"), None, None)).unwrap();
        let page = render(&sel, &[("AAPL".into(), series("AAPL"))]).unwrap();
        let Chart::Area(area) = page.charts()[0].clone() else {
            panic!("expected area chart");
        };
        let xs: Vec<&str> = area.points.iter().map(|p| p.x.as_str()).collect();
        assert_eq!(xs, vec!["2018-01-01", "2019-03-01", "2025-01-01"]);
    }

    #[test]
    fn empty_selection_renders_controls_only() {
        let sel = select(&index(), &params(Some(""), None, None)).unwrap();
        let page = render(&sel, &[]).unwrap();
        assert!(page.widgets.is_empty());
        assert_eq!(page.controls.len(), 2);
    }

    #[test]
    fn series_without_date_column_is_an_error() {
        let sel = select(&index(), &params(Some("AAPL"), None, None)).unwrap();
        let broken = Arc::new(Table::from_rows("AAPL_cumulative", &["value"], vec![]));
        let err = render(&sel, &[("AAPL".into(), broken)]).unwrap_err();
        assert!(matches!(err, ViewError::MissingColumn { .. }));
    }
}
