use tracing::{debug, warn};

use crate::domain::chart::model::wire::{ChartEntry, ChartsResponse};
use crate::domain::chart::model::ChartRenderableData;

const X_AXIS_KEY: &str = "xAxis";

/// Flattens a charts response into one row list per submitted query.
///
/// Entry `i` belongs to query `i`. When the response carries fewer charts
/// than queries, the missing tail is filled with empty lists; surplus charts
/// are kept, so the result is longer than the query list. Neither case is an
/// error; both are logged.
pub fn flatten_charts(
    response: ChartsResponse,
    expected: usize,
) -> Vec<Vec<ChartRenderableData>> {
    let received = response.charts.len();
    if received != expected {
        warn!(
            "Charts response length mismatch: {} queries submitted, {} charts returned",
            expected, received
        );
    }

    let mut rows: Vec<Vec<ChartRenderableData>> =
        response.charts.into_iter().map(flatten_chart).collect();

    if rows.len() < expected {
        rows.resize_with(expected, Vec::new);
    }

    rows
}

/// Each chart normally holds a single column; any extra columns are appended
/// in order. A series keyed `xAxis` would collide with the bucket label once
/// flattened, so it is dropped.
fn flatten_chart(entry: ChartEntry) -> Vec<ChartRenderableData> {
    entry
        .chart
        .into_iter()
        .flat_map(|c| c.column)
        .map(|sample| {
            let mut values = sample.values;
            if values.remove(X_AXIS_KEY).is_some() {
                debug!("Dropped series keyed {:?} at bucket {}", X_AXIS_KEY, sample.x_axis);
            }
            ChartRenderableData {
                x_axis: sample.x_axis,
                values,
            }
        })
        .collect()
}
