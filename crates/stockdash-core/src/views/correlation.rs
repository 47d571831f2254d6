//! Pairwise Pearson correlation heatmap over price columns.

use crate::chart::{Chart, ColorScale, HeatmapChart};
use crate::table::Table;

use super::{Control, ViewError, ViewKind, ViewPage, ViewParams, Widget};

/// Number of tickers selected by default.
pub const DEFAULT_SELECTION: usize = 10;

/// Ticker columns: every column after the first (the first is the date).
pub fn ticker_columns(table: &Table) -> Vec<String> {
    table.columns().iter().skip(1).cloned().collect()
}

/// Pearson correlation over pairwise-complete observations.
///
/// `None` with fewer than two paired observations or zero variance on
/// either side.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = cov / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Symmetric correlation matrix of `columns`, diagonal fixed at 1.
pub fn correlation_matrix(
    table: &Table,
    columns: &[String],
) -> Result<Vec<Vec<Option<f64>>>, ViewError> {
    let series = columns
        .iter()
        .map(|c| {
            let idx = table.require_column(c)?;
            Ok(table.column_values(idx).map(|v| v.as_f64()).collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, ViewError>>()?;

    let n = series.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        matrix[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}

pub fn render(table: &Table, params: &ViewParams) -> Result<ViewPage, ViewError> {
    let options = ticker_columns(table);
    let selected = match params.ticker_selection() {
        Some(requested) => {
            if let Some(unknown) = requested.iter().find(|t| !options.contains(t)) {
                return Err(ViewError::InvalidParams(format!(
                    "{:?} is not a column of {}",
                    unknown,
                    table.name()
                )));
            }
            requested
        }
        None => options.iter().take(DEFAULT_SELECTION).cloned().collect(),
    };

    let mut page = ViewPage::new(ViewKind::StockCorrelation);
    page.controls.push(Control::MultiSelect {
        key: "tickers".to_string(),
        label: "Select Stocks to Compare".to_string(),
        options,
        selected: selected.clone(),
    });
    if selected.is_empty() {
        return Ok(page);
    }

    let values = correlation_matrix(table, &selected)?;
    page.widgets.push(Widget::Chart {
        chart: Chart::Heatmap(HeatmapChart {
            title: "Stock Price Correlation Heatmap".to_string(),
            labels: selected,
            values,
            annotation_format: ".2f".to_string(),
            scale: ColorScale::coolwarm(),
            zmin: -1.0,
            zmax: 1.0,
        }),
    });
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Dataset, MockStore, TableSource};
    use crate::table::Value;

    fn prices() -> Table {
        Table::from_rows(
            "stock_correlation_matrix",
            &["date", "AAA", "BBB", "CCC", "FLAT"],
            vec![
                vec!["2024-01-01".into(), 1.0.into(), 2.0.into(), 9.0.into(), 5.0.into()],
                vec!["2024-01-02".into(), 2.0.into(), 4.0.into(), 7.0.into(), 5.0.into()],
                vec!["2024-01-03".into(), 3.0.into(), 6.0.into(), Value::Null, 5.0.into()],
                vec!["2024-01-04".into(), 4.0.into(), 8.0.into(), 1.0.into(), 5.0.into()],
            ],
        )
    }

    fn heatmap(page: &ViewPage) -> HeatmapChart {
        match page.charts()[0] {
            Chart::Heatmap(h) => h.clone(),
            other => panic!("expected heatmap, got {}", other.title()),
        }
    }

    #[test]
    fn pearson_handles_perfect_and_degenerate_inputs() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let up = [Some(2.0), Some(4.0), Some(6.0)];
        let down = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&x, &[Some(5.0), Some(5.0), Some(5.0)]), None);
        assert_eq!(pearson(&x, &[Some(1.0), None, None]), None);
    }

    #[test]
    fn pairwise_complete_observations_skip_missing_cells() {
        let m = correlation_matrix(&prices(), &["AAA".into(), "CCC".into()]).unwrap();
        // Rows 1, 2 and 4 pair up; CCC falls as AAA rises.
        assert!(m[0][1].unwrap() < -0.9);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let mut store = MockStore::sample_market();
        let table = store.load(&Dataset::CorrelationMatrix).unwrap();
        let columns = ticker_columns(&table);
        let m = correlation_matrix(&table, &columns).unwrap();
        for i in 0..columns.len() {
            assert_eq!(m[i][i], Some(1.0));
            for j in 0..columns.len() {
                assert_eq!(m[i][j], m[j][i]);
                if let Some(r) = m[i][j] {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn defaults_to_first_ten_columns_after_the_first() {
        let mut store = MockStore::sample_market();
        let table = store.load(&Dataset::CorrelationMatrix).unwrap();
        let page = render(&table, &ViewParams::default()).unwrap();
        let h = heatmap(&page);
        assert_eq!(h.labels, ticker_columns(&table)[..10].to_vec());
        assert_eq!((h.zmin, h.zmax), (-1.0, 1.0));
        assert_eq!(h.scale.name, "coolwarm");
    }

    #[test]
    fn zero_variance_column_is_null_off_the_diagonal() {
        let params = ViewParams {
            tickers: Some("AAA,FLAT".into()),
            ..Default::default()
        };
        let h = heatmap(&render(&prices(), &params).unwrap());
        assert_eq!(h.values, vec![vec![Some(1.0), None], vec![None, Some(1.0)]]);
    }

    #[test]
    fn empty_selection_renders_nothing() {
        let params = ViewParams {
            tickers: Some(String::new()),
            ..Default::default()
        };
        let page = render(&prices(), &params).unwrap();
        assert!(page.widgets.is_empty());
        assert_eq!(page.controls.len(), 1);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let params = ViewParams {
            tickers: Some("AAA,date".into()),
            ..Default::default()
        };
        assert!(matches!(
            render(&prices(), &params),
            Err(ViewError::InvalidParams(_))
        ));
    }
}
