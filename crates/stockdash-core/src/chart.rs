//! Chart specifications.
//!
//! Views emit these declarative specs; the frontend maps them onto its
//! plotting library. Color scales and palettes are sent as explicit color
//! stops so the client needs no knowledge of their names.

use serde::Serialize;

/// One chart widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar(BarChart),
    Area(AreaChart),
    Pie(PieChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Bar(c) => &c.title,
            Chart::Area(c) => &c.title,
            Chart::Pie(c) => &c.title,
            Chart::Heatmap(c) => &c.title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Categories on x, values on y.
    Vertical,
    /// Categories on y, values on x.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Axis {
    pub title: String,
    /// Tick label rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<i32>,
}

impl Axis {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tick_angle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Layout {
    /// Horizontal title position, 0..1 (0.5 = centered).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
}

impl Layout {
    pub fn centered() -> Self {
        Self {
            title_x: Some(0.5),
            ..Self::default()
        }
    }
}

// ============================================================
// Colors
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ColorStop {
    /// Position in 0..1.
    pub at: f64,
    pub color: String,
}

/// Continuous color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ColorScale {
    pub name: String,
    pub stops: Vec<ColorStop>,
}

impl ColorScale {
    fn from_colors(name: &str, colors: &[&str]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        Self {
            name: name.to_string(),
            stops: colors
                .iter()
                .enumerate()
                .map(|(i, c)| ColorStop {
                    at: i as f64 / last,
                    color: c.to_string(),
                })
                .collect(),
        }
    }

    /// Sequential orange-red (ColorBrewer OrRd).
    pub fn or_rd() -> Self {
        Self::from_colors(
            "OrRd",
            &[
                "#fff7ec", "#fee8c8", "#fdd49e", "#fdbb84", "#fc8d59", "#ef6548", "#d7301f",
                "#b30000", "#7f0000",
            ],
        )
    }

    /// Sequential greens (ColorBrewer Greens).
    pub fn greens() -> Self {
        Self::from_colors(
            "Greens",
            &[
                "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45",
                "#006d2c", "#00441b",
            ],
        )
    }

    /// Sequential reds (ColorBrewer Reds).
    pub fn reds() -> Self {
        Self::from_colors(
            "Reds",
            &[
                "#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d",
                "#a50f15", "#67000d",
            ],
        )
    }

    /// Diverging blue-white-red (Moreland coolwarm).
    pub fn coolwarm() -> Self {
        Self::from_colors(
            "coolwarm",
            &["#3b4cc0", "#8db0fe", "#dddddd", "#f49a7b", "#b40426"],
        )
    }
}

/// Categorical palette; colors are assigned to groups in order of first
/// appearance, cycling when groups outnumber colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Palette {
    pub name: String,
    pub colors: Vec<String>,
}

impl Palette {
    fn from_colors(name: &str, colors: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn pastel() -> Self {
        Self::from_colors(
            "Pastel",
            &[
                "#66c5cc", "#f6cf71", "#f89c74", "#dcb0f2", "#87c55f", "#9eb9f3", "#fe88b1",
                "#c9db74", "#8be0a4", "#b497e7", "#b3b3b3",
            ],
        )
    }

    pub fn set3() -> Self {
        Self::from_colors(
            "Set3",
            &[
                "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69",
                "#fccde5", "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
            ],
        )
    }
}

/// How bar colors are chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorEncoding {
    /// Color follows the bar value.
    Continuous { scale: ColorScale },
    /// Color follows the bar's `group`.
    Categorical { palette: Palette },
}

// ============================================================
// Bar
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Bar {
    pub category: String,
    pub value: f64,
    /// Group used by categorical coloring (e.g. sector).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct ValueLabels {
    /// d3-style number format, e.g. ".2f".
    pub format: String,
    /// "outside", "inside" or "auto".
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct Outline {
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct BarChart {
    pub title: String,
    pub orientation: Orientation,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Bars in draw order.
    pub bars: Vec<Bar>,
    pub color: ColorEncoding,
    /// d3-style format for the value in hover labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_labels: Option<ValueLabels>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    pub layout: Layout,
}

// ============================================================
// Area
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct AreaPoint {
    /// Date, `YYYY-MM-DD`.
    pub x: String,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct AreaChart {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    /// Points sorted by `x`.
    pub points: Vec<AreaPoint>,
}

// ============================================================
// Pie
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Fraction of the slice radius to pull the slice out by.
    pub pull: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
    /// Slice annotation, e.g. "percent+label".
    pub text_info: String,
    pub palette: Palette,
}

// ============================================================
// Heatmap
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "api", derive(utoipa::ToSchema))]
pub struct HeatmapChart {
    pub title: String,
    /// Row and column labels (square matrix).
    pub labels: Vec<String>,
    /// `values[row][col]`; `null` where undefined.
    pub values: Vec<Vec<Option<f64>>>,
    /// d3-style format for cell annotations.
    pub annotation_format: String,
    pub scale: ColorScale,
    pub zmin: f64,
    pub zmax: f64,
}
