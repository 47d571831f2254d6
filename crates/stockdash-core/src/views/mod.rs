//! The five dashboard views.
//!
//! Each view is a pure function from loaded tables and request parameters to
//! a [`ViewPage`]: the page title, the controls the user can adjust (with
//! their options and current values), and the widgets to draw. Loading is
//! done by [`crate::Session`], which knows which tables each view needs.

pub mod correlation;
pub mod cumulative;
pub mod monthly;
pub mod sector;
pub mod volatility;

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::store::StoreError;

/// Title shown above the view selector.
pub const SIDEBAR_TITLE: &str = "Stock Market Dashboard";

/// Label of the view selector.
pub const SIDEBAR_LABEL: &str = "Select Analysis";

// ============================================================
// Errors
// ============================================================

/// Error type for rendering a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Loading a table failed.
    Store(StoreError),
    /// A loaded table lacks a required column.
    MissingColumn { table: String, column: String },
    /// A control value is malformed or out of range.
    InvalidParams(String),
}

impl std::fmt::Display for ViewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::Store(e) => write!(f, "{}", e),
            ViewError::MissingColumn { table, column } => {
                write!(f, "table {} has no column {}", table, column)
            }
            ViewError::InvalidParams(msg) => write!(f, "invalid parameters: {}", msg),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ViewError {
    fn from(e: StoreError) -> Self {
        ViewError::Store(e)
    }
}

// ============================================================
// View selection
// ============================================================

/// One of the five fixed views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Volatility,
    CumulativeReturn,
    SectorReturn,
    StockCorrelation,
    MonthlyMovers,
}

impl ViewKind {
    /// All views in sidebar order.
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Volatility,
        ViewKind::CumulativeReturn,
        ViewKind::SectorReturn,
        ViewKind::StockCorrelation,
        ViewKind::MonthlyMovers,
    ];

    /// URL-safe key.
    pub fn key(self) -> &'static str {
        match self {
            ViewKind::Volatility => "volatility",
            ViewKind::CumulativeReturn => "cumulative-return",
            ViewKind::SectorReturn => "sector-return",
            ViewKind::StockCorrelation => "stock-correlation",
            ViewKind::MonthlyMovers => "monthly-movers",
        }
    }

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Volatility => "Volatility",
            ViewKind::CumulativeReturn => "Cumulative Return",
            ViewKind::SectorReturn => "Sector Return",
            ViewKind::StockCorrelation => "Stock Correlation",
            ViewKind::MonthlyMovers => "Monthly Gainers & Losers",
        }
    }

    /// Page heading.
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Volatility => "Top 10 Most Volatile Stocks",
            ViewKind::CumulativeReturn => "Cumulative Returns",
            ViewKind::SectorReturn => "Sector Performance",
            ViewKind::StockCorrelation => "Stock Price Correlation Heatmap",
            ViewKind::MonthlyMovers => "Monthly Top 5 Gainers and Losers",
        }
    }

    /// Accepts either the key or the sidebar label. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.key() == s || v.label() == s)
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ViewInfo {
    pub key: String,
    pub label: String,
}

/// Sidebar entries in order.
pub fn view_list() -> Vec<ViewInfo> {
    ViewKind::ALL
        .into_iter()
        .map(|v| ViewInfo {
            key: v.key().to_string(),
            label: v.label().to_string(),
        })
        .collect()
}

// ============================================================
// Request parameters
// ============================================================

/// Control values sent with a view request. Every field is optional; absent
/// fields take the view's default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "api", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "api", into_params(parameter_in = Query))]
pub struct ViewParams {
    /// Comma-separated tickers (cumulative return, correlation).
    /// Present but empty means "none selected".
    pub tickers: Option<String>,
    /// Range start, `YYYY-MM-DD` (cumulative return).
    pub start: Option<String>,
    /// Range end, `YYYY-MM-DD` (cumulative return).
    pub end: Option<String>,
    /// Show every sector instead of a return range (sector return).
    pub show_all: Option<bool>,
    /// Lower yearly return bound (sector return).
    pub min_return: Option<f64>,
    /// Upper yearly return bound (sector return).
    pub max_return: Option<f64>,
    /// Selected month (monthly gainers & losers).
    pub month: Option<String>,
}

impl ViewParams {
    /// Explicit ticker selection, deduplicated in order. `None` when the
    /// request did not carry one.
    pub fn ticker_selection(&self) -> Option<Vec<String>> {
        self.tickers.as_ref().map(|raw| {
            let mut out: Vec<String> = Vec::new();
            for t in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                if !out.iter().any(|s| s == t) {
                    out.push(t.to_string());
                }
            }
            out
        })
    }
}

// ============================================================
// Page model
// ============================================================

/// Everything the client needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ViewPage {
    /// View key.
    pub view: String,
    pub title: String,
    /// Controls in display order, carrying their current values.
    pub controls: Vec<Control>,
    /// Widgets in display order.
    pub widgets: Vec<Widget>,
}

impl ViewPage {
    pub(crate) fn new(kind: ViewKind) -> Self {
        Self {
            view: kind.key().to_string(),
            title: kind.title().to_string(),
            controls: Vec::new(),
            widgets: Vec::new(),
        }
    }

    /// Charts in display order, including those inside columns.
    pub fn charts(&self) -> Vec<&Chart> {
        let mut out = Vec::new();
        for w in &self.widgets {
            match w {
                Widget::Chart { chart } => out.push(chart),
                Widget::Columns { columns } => out.extend(columns.iter().map(|p| &p.chart)),
                Widget::Subheader { .. } | Widget::Warning { .. } => {}
            }
        }
        out
    }
}

/// A block of page content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Chart { chart: Chart },
    Subheader { text: String },
    /// Soft, user-visible empty state.
    Warning { message: String },
    /// Side-by-side panels.
    Columns { columns: Vec<Panel> },
}

/// One column of a side-by-side layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Panel {
    pub subheader: String,
    pub chart: Chart,
}

/// A user control. `key` fields name the request parameter the control sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    MultiSelect {
        key: String,
        label: String,
        options: Vec<String>,
        selected: Vec<String>,
    },
    DateRange {
        start_key: String,
        end_key: String,
        label: String,
        min: String,
        max: String,
        start: String,
        end: String,
    },
    NumberRange {
        low_key: String,
        high_key: String,
        label: String,
        min: f64,
        max: f64,
        low: f64,
        high: f64,
    },
    Checkbox {
        key: String,
        label: String,
        checked: bool,
    },
    Select {
        key: String,
        label: String,
        options: Vec<String>,
        selected: Option<String>,
    },
}
