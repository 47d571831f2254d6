//! Top 10 most volatile stocks.

use std::collections::HashSet;

use crate::chart::{
    Axis, Bar, BarChart, Chart, ColorEncoding, ColorScale, Layout, Margin, Orientation, Outline,
};
use crate::models::VolatilityRow;
use crate::table::Table;

use super::{ViewError, ViewKind, ViewPage, Widget};

/// Number of bars shown.
pub const TOP_N: usize = 10;

/// Highest-volatility row per distinct ticker, descending, at most [`TOP_N`].
pub fn top_volatility(mut rows: Vec<VolatilityRow>) -> Vec<VolatilityRow> {
    rows.sort_by(|a, b| b.volatility.total_cmp(&a.volatility));
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|r| seen.insert(r.ticker.clone()))
        .take(TOP_N)
        .collect()
}

pub fn render(table: &Table) -> Result<ViewPage, ViewError> {
    let top = top_volatility(VolatilityRow::from_table(table)?);

    let chart = BarChart {
        title: "Top 10 Most Volatile Stocks".to_string(),
        orientation: Orientation::Vertical,
        x_axis: Axis::titled("Stock Ticker"),
        y_axis: Axis::titled("Volatility (Standard Deviation)"),
        bars: top
            .into_iter()
            .map(|r| Bar {
                category: r.ticker,
                value: r.volatility,
                group: None,
            })
            .collect(),
        color: ColorEncoding::Continuous {
            scale: ColorScale::or_rd(),
        },
        hover_format: Some(".2f".to_string()),
        value_labels: None,
        outline: Some(Outline {
            width: 1.5,
            color: "black".to_string(),
        }),
        layout: Layout {
            title_x: Some(0.5),
            plot_bgcolor: Some("#f9f9f9".to_string()),
            margin: Some(Margin {
                l: 40,
                r: 40,
                t: 60,
                b: 40,
            }),
        },
    };

    let mut page = ViewPage::new(ViewKind::Volatility);
    page.widgets.push(Widget::Chart {
        chart: Chart::Bar(chart),
    });
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;

    fn table(rows: &[(&str, f64)]) -> Table {
        Table::from_rows(
            "top_10_volatility",
            &["ticker", "volatility"],
            rows.iter()
                .map(|(t, v)| vec![(*t).into(), Value::Float(*v)])
                .collect(),
        )
    }

    fn bars(page: &ViewPage) -> Vec<(String, f64)> {
        match page.charts()[0] {
            Chart::Bar(b) => b.bars.iter().map(|b| (b.category.clone(), b.value)).collect(),
            other => panic!("expected bar chart, got {}", other.title()),
        }
    }

    #[test]
    fn keeps_top_ten_in_descending_order() {
        let rows: Vec<(String, f64)> = (0..15)
            .map(|i| (format!("T{i:02}"), i as f64 / 100.0))
            .collect();
        let refs: Vec<(&str, f64)> = rows.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        let page = render(&table(&refs)).unwrap();
        let bars = bars(&page);
        assert_eq!(bars.len(), 10);
        assert_eq!(bars[0].0, "T14");
        assert_eq!(bars[9].0, "T05");
        assert!(bars.windows(2).all(|w| w[0].1 > w[1].1));
    }

    #[test]
    fn fewer_tickers_than_ten_shows_all() {
        let page = render(&table(&[("A", 0.2), ("B", 0.5), ("C", 0.1)])).unwrap();
        let names: Vec<String> = bars(&page).into_iter().map(|b| b.0).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn duplicate_tickers_count_once() {
        let page = render(&table(&[("A", 0.2), ("A", 0.9), ("B", 0.5)])).unwrap();
        assert_eq!(
            bars(&page),
            vec![("A".to_string(), 0.9), ("B".to_string(), 0.5)]
        );
    }

    #[test]
    fn chart_carries_styling() {
        let page = render(&table(&[("A", 0.2)])).unwrap();
        let charts = page.charts();
        let Chart::Bar(chart) = charts[0] else {
            panic!("expected bar chart");
        };
        assert_eq!(chart.hover_format.as_deref(), Some(".2f"));
        assert_eq!(chart.x_axis.title, "Stock Ticker");
        assert_eq!(chart.layout.title_x, Some(0.5));
        assert!(matches!(&chart.color, ColorEncoding::Continuous { scale } if scale.name == "OrRd"));
    }

    #[test]
    fn empty_table_renders_empty_chart() {
        let page = render(&table(&[])).unwrap();
        assert!(bars(&page).is_empty());
    }
}
