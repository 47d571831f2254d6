//! Sector performance: sector share pie and per-stock yearly return bars.

use crate::chart::{
    Axis, Bar, BarChart, Chart, ColorEncoding, Layout, Orientation, Palette, PieChart, PieSlice,
    ValueLabels,
};
use crate::fmt::round2;
use crate::models::{SectorReturn, StockYearlyReturn};
use crate::table::Table;

use super::{Control, ViewError, ViewKind, ViewPage, ViewParams, Widget};

/// Pull applied to every pie slice.
pub const SLICE_PULL: f64 = 0.05;

pub const EMPTY_RANGE_WARNING: &str = "No sectors found within the selected yearly return range.";

/// Slider bounds: data min and max rounded to 2 decimals. `None` for no data.
pub fn slider_bounds(sectors: &[SectorReturn]) -> Option<(f64, f64)> {
    let mut values = sectors.iter().map(|s| s.yearly_return);
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    Some((round2(min), round2(max)))
}

/// Sectors with `low <= yearly_return <= high`, sorted descending.
pub fn filter_sectors(sectors: &[SectorReturn], low: f64, high: f64) -> Vec<SectorReturn> {
    let mut out: Vec<SectorReturn> = sectors
        .iter()
        .filter(|s| s.yearly_return >= low && s.yearly_return <= high)
        .cloned()
        .collect();
    sort_descending(&mut out);
    out
}

fn sort_descending(sectors: &mut [SectorReturn]) {
    sectors.sort_by(|a, b| b.yearly_return.total_cmp(&a.yearly_return));
}

pub fn render(
    sector_table: &Table,
    stock_table: &Table,
    params: &ViewParams,
) -> Result<ViewPage, ViewError> {
    let sectors = SectorReturn::from_table(sector_table)?;
    let show_all = params.show_all.unwrap_or(true);

    let mut page = ViewPage::new(ViewKind::SectorReturn);
    page.controls.push(Control::Checkbox {
        key: "show_all".to_string(),
        label: "Show All Sectors".to_string(),
        checked: show_all,
    });

    let filtered = if show_all {
        let mut all = sectors;
        sort_descending(&mut all);
        all
    } else {
        match slider_bounds(&sectors) {
            Some((min, max)) => {
                let low = params.min_return.unwrap_or(min).clamp(min, max);
                let high = params.max_return.unwrap_or(max).clamp(min, max);
                if low > high {
                    return Err(ViewError::InvalidParams(format!(
                        "min_return {} is above max_return {}",
                        low, high
                    )));
                }
                page.controls.push(Control::NumberRange {
                    low_key: "min_return".to_string(),
                    high_key: "max_return".to_string(),
                    label: "Filter by Yearly Return".to_string(),
                    min,
                    max,
                    low,
                    high,
                });
                filter_sectors(&sectors, low, high)
            }
            None => Vec::new(),
        }
    };

    if filtered.is_empty() {
        page.widgets.push(Widget::Warning {
            message: EMPTY_RANGE_WARNING.to_string(),
        });
        return Ok(page);
    }

    page.widgets.push(Widget::Chart {
        chart: Chart::Pie(sector_pie(&filtered)),
    });
    page.widgets.push(Widget::Subheader {
        text: "Stock-wise Yearly Return (Bar Chart)".to_string(),
    });
    page.widgets.push(Widget::Chart {
        chart: Chart::Bar(stock_bars(StockYearlyReturn::from_table(stock_table)?)),
    });
    Ok(page)
}

fn sector_pie(sectors: &[SectorReturn]) -> PieChart {
    PieChart {
        title: "Sector-wise Return Distribution".to_string(),
        slices: sectors
            .iter()
            .map(|s| PieSlice {
                label: s.sector.clone(),
                value: s.yearly_return,
                pull: SLICE_PULL,
            })
            .collect(),
        text_info: "percent+label".to_string(),
        palette: Palette::pastel(),
    }
}

fn stock_bars(mut stocks: Vec<StockYearlyReturn>) -> BarChart {
    stocks.sort_by(|a, b| b.yearly_return.total_cmp(&a.yearly_return));
    BarChart {
        title: "Stock-wise Yearly Returns".to_string(),
        orientation: Orientation::Vertical,
        x_axis: Axis {
            title: "symbol".to_string(),
            tick_angle: Some(-45),
        },
        y_axis: Axis::titled("yearlyreturn"),
        bars: stocks
            .into_iter()
            .map(|s| Bar {
                category: s.symbol,
                value: s.yearly_return,
                group: Some(s.sector),
            })
            .collect(),
        color: ColorEncoding::Categorical {
            palette: Palette::set3(),
        },
        hover_format: None,
        value_labels: Some(ValueLabels {
            format: ".2f".to_string(),
            position: "outside".to_string(),
        }),
        outline: None,
        layout: Layout::default(),
    }
}
