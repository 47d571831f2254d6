//! OpenAPI documentation definition.

use stockdash_core::chart::{
    AreaChart, AreaPoint, Axis, Bar, BarChart, Chart, ColorEncoding, ColorScale, ColorStop,
    HeatmapChart, Layout, Margin, Orientation, Outline, Palette, PieChart, PieSlice, ValueLabels,
};
use stockdash_core::views::{Control, Panel, ViewInfo, Widget};
use stockdash_core::ViewPage;
use utoipa::OpenApi;

use crate::error::ErrorBody;
use crate::handlers::AppInfo;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::handle_health,
        crate::handlers::handle_info,
        crate::handlers::handle_views,
        crate::handlers::handle_view,
    ),
    components(schemas(
        AppInfo,
        ErrorBody,
        ViewInfo,
        ViewPage,
        Widget,
        Panel,
        Control,
        Chart,
        BarChart,
        AreaChart,
        PieChart,
        HeatmapChart,
        Axis,
        Layout,
        Margin,
        Orientation,
        Bar,
        ValueLabels,
        Outline,
        AreaPoint,
        PieSlice,
        ColorScale,
        ColorStop,
        ColorEncoding,
        Palette,
    )),
    info(
        title = "stockdash API",
        version = "1.0",
        description = "Stock market dashboard: five analysis views rendered as chart specifications"
    )
)]
pub(crate) struct ApiDoc;
