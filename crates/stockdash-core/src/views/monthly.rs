//! Monthly top gainers and losers, side by side.

use crate::chart::{Axis, Bar, BarChart, Chart, ColorEncoding, ColorScale, Layout, Orientation};
use crate::models::MonthlyMover;
use crate::table::Table;

use super::{Control, Panel, ViewError, ViewKind, ViewPage, ViewParams, Widget};

/// Maximum entries per list.
pub const TOP_N: usize = 5;

/// Distinct months of the monthly returns table, sorted by cell value
/// (numeric month numbers ascend numerically, `YYYY-MM` text lexically).
pub fn months(monthly_returns: &Table) -> Result<Vec<String>, ViewError> {
    monthly_returns.sorted_labels("month")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Gainers,
    Losers,
}

/// Movers of `month`, keeping the [`TOP_N`] largest gains (or deepest
/// losses), sorted ascending by return.
pub fn movers_for_month(
    mut rows: Vec<MonthlyMover>,
    month: &str,
    direction: Direction,
) -> Vec<MonthlyMover> {
    rows.retain(|r| r.month == month);
    match direction {
        Direction::Gainers => rows.sort_by(|a, b| b.monthly_return.total_cmp(&a.monthly_return)),
        Direction::Losers => rows.sort_by(|a, b| a.monthly_return.total_cmp(&b.monthly_return)),
    }
    rows.truncate(TOP_N);
    rows.sort_by(|a, b| a.monthly_return.total_cmp(&b.monthly_return));
    rows
}

pub fn render(
    monthly_returns: &Table,
    gainers: &Table,
    losers: &Table,
    params: &ViewParams,
) -> Result<ViewPage, ViewError> {
    let options = months(monthly_returns)?;
    let selected = match params.month.as_deref() {
        Some(m) if options.iter().any(|o| o == m) => Some(m.to_string()),
        Some(m) => {
            return Err(ViewError::InvalidParams(format!("unknown month {:?}", m)));
        }
        None => options.first().cloned(),
    };

    let mut page = ViewPage::new(ViewKind::MonthlyMovers);
    page.controls.push(Control::Select {
        key: "month".to_string(),
        label: "Select Month".to_string(),
        options,
        selected: selected.clone(),
    });
    let Some(month) = selected else {
        return Ok(page);
    };

    let top = movers_for_month(MonthlyMover::from_table(gainers)?, &month, Direction::Gainers);
    let bottom = movers_for_month(MonthlyMover::from_table(losers)?, &month, Direction::Losers);

    page.widgets.push(Widget::Columns {
        columns: vec![
            Panel {
                subheader: format!("{} - Top 5 Gainers", month),
                chart: Chart::Bar(movers_chart("Top 5 Monthly Gainers", top, ColorScale::greens())),
            },
            Panel {
                subheader: format!("{} - Top 5 Losers", month),
                chart: Chart::Bar(movers_chart("Top 5 Monthly Losers", bottom, ColorScale::reds())),
            },
        ],
    });
    Ok(page)
}

fn movers_chart(title: &str, rows: Vec<MonthlyMover>, scale: ColorScale) -> BarChart {
    BarChart {
        title: title.to_string(),
        orientation: Orientation::Horizontal,
        x_axis: Axis::titled("Return (%)"),
        y_axis: Axis::titled(""),
        bars: rows
            .into_iter()
            .map(|r| Bar {
                category: r.symbol,
                value: r.monthly_return,
                group: None,
            })
            .collect(),
        color: ColorEncoding::Continuous { scale },
        hover_format: None,
        value_labels: None,
        outline: None,
        layout: Layout::centered(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Dataset, MockStore, TableSource};

    fn movers(name: &str, rows: &[(&str, &str, f64)]) -> Table {
        Table::from_rows(
            name,
            &["month", "symbol", "monthly_return"],
            rows.iter()
                .map(|(m, s, r)| vec![(*m).into(), (*s).into(), (*r).into()])
                .collect(),
        )
    }

    fn scenario() -> (Table, Table, Table) {
        let all = movers(
            "monthly_returns_all_stocks",
            &[
                ("2023-07", "A", 1.0),
                ("2023-06", "A", 12.0),
                ("2023-06", "B", 9.0),
                ("2023-06", "C", -15.0),
                ("2023-06", "D", -7.0),
            ],
        );
        let gainers = movers(
            "monthly_top_5_gainers",
            &[("2023-06", "A", 12.0), ("2023-06", "B", 9.0), ("2023-07", "A", 1.0)],
        );
        let losers = movers(
            "monthly_top_5_losers",
            &[("2023-06", "C", -15.0), ("2023-06", "D", -7.0)],
        );
        (all, gainers, losers)
    }

    fn panels(page: &ViewPage) -> Vec<(String, Vec<String>)> {
        let Some(Widget::Columns { columns }) = page.widgets.first() else {
            panic!("expected columns widget");
        };
        columns
            .iter()
            .map(|p| {
                let Chart::Bar(bar) = &p.chart else {
                    panic!("expected bar chart");
                };
                (
                    p.subheader.clone(),
                    bar.bars.iter().map(|b| b.category.clone()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn june_scenario_lists_both_sides_ascending() {
        let (all, gainers, losers) = scenario();
        let params = ViewParams {
            month: Some("2023-06".into()),
            ..Default::default()
        };
        let page = render(&all, &gainers, &losers, &params).unwrap();
        assert_eq!(
            panels(&page),
            vec![
                ("2023-06 - Top 5 Gainers".to_string(), vec!["B".to_string(), "A".to_string()]),
                ("2023-06 - Top 5 Losers".to_string(), vec!["C".to_string(), "D".to_string()]),
            ]
        );
    }

    #[test]
    fn defaults_to_first_sorted_month() {
        let (all, gainers, losers) = scenario();
        let page = render(&all, &gainers, &losers, &ViewParams::default()).unwrap();
        assert!(matches!(
            &page.controls[0],
            Control::Select { options, selected: Some(m), .. }
                if options == &vec!["2023-06".to_string(), "2023-07".to_string()] && m == "2023-06"
        ));
    }

    #[test]
    fn numeric_months_sort_numerically() {
        let all = Table::from_rows(
            "monthly_returns_all_stocks",
            &["month", "symbol", "monthly_return"],
            [1i64, 2, 10, 11, 12, 3]
                .into_iter()
                .map(|m| vec![m.into(), "A".into(), 1.0.into()])
                .collect(),
        );
        assert_eq!(months(&all).unwrap(), vec!["1", "2", "3", "10", "11", "12"]);

        let gainers = Table::from_rows(
            "monthly_top_5_gainers",
            &["month", "symbol", "monthly_return"],
            vec![
                vec![10i64.into(), "B".into(), 4.0.into()],
                vec![1i64.into(), "A".into(), 2.0.into()],
            ],
        );
        let losers = movers("monthly_top_5_losers", &[]);
        let page = render(&all, &gainers, &losers, &ViewParams::default()).unwrap();
        assert!(matches!(
            &page.controls[0],
            Control::Select { selected: Some(m), .. } if m == "1"
        ));
        assert_eq!(panels(&page)[0].1, vec!["A".to_string()]);
    }

    #[test]
    fn unknown_month_is_rejected() {
        let (all, gainers, losers) = scenario();
        let params = ViewParams {
            month: Some("1999-01".into()),
            ..Default::default()
        };
        assert!(matches!(
            render(&all, &gainers, &losers, &params),
            Err(ViewError::InvalidParams(_))
        ));
    }

    #[test]
    fn lists_are_capped_at_five() {
        let rows: Vec<MonthlyMover> = (0..8)
            .map(|i| MonthlyMover {
                month: "2023-01".into(),
                symbol: format!("S{i}"),
                monthly_return: i as f64,
            })
            .collect();
        let top = movers_for_month(rows.clone(), "2023-01", Direction::Gainers);
        let symbols: Vec<&str> = top.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["S3", "S4", "S5", "S6", "S7"]);

        let bottom = movers_for_month(rows, "2023-01", Direction::Losers);
        let symbols: Vec<&str> = bottom.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["S0", "S1", "S2", "S3", "S4"]);
    }

    #[test]
    fn sample_market_months_have_disjoint_movers() {
        let mut store = MockStore::sample_market();
        let all = store.load(&Dataset::MonthlyReturns).unwrap();
        let gainers = store.load(&Dataset::MonthlyTopGainers).unwrap();
        let losers = store.load(&Dataset::MonthlyTopLosers).unwrap();
        for month in months(&all).unwrap() {
            let params = ViewParams {
                month: Some(month.clone()),
                ..Default::default()
            };
            let page = render(&all, &gainers, &losers, &params).unwrap();
            let lists = panels(&page);
            assert!(lists[0].1.len() <= TOP_N && lists[1].1.len() <= TOP_N);
            assert!(lists[0].1.iter().all(|s| !lists[1].1.contains(s)), "{month}");
        }
    }

    #[test]
    fn empty_months_render_the_select_only() {
        let empty = movers("monthly_returns_all_stocks", &[]);
        let page = render(&empty, &empty, &empty, &ViewParams::default()).unwrap();
        assert!(page.widgets.is_empty());
    }
}
