//! Effects - side effects declared by the reducer

use crate::geo::Coordinate;
use crate::state::{ChartSeries, RequestId};

/// Side effects applied by the dashboard controller, in emission order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Move the map's selection marker
    PlaceMarker { coordinate: Coordinate },
    /// Fetch a forecast, resolving with `request`
    FetchWeather {
        request: RequestId,
        coordinate: Coordinate,
    },
    /// Replace the projection chart
    RenderChart { series: ChartSeries },
    /// Drop the projection chart
    ClearChart,
}
