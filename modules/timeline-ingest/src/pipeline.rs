use timeline_common::{ChartLayout, IngestResult};
use tracing::info;

use crate::artifacts::Artifacts;
use crate::bucket::{bucket_by_month, date_range};
use crate::catalog::build_catalog;
use crate::ingester::RecordIngester;
use crate::layout::layout_chart;
use crate::source::TabularSource;

/// Fetch → normalize → catalog → bucket → layout.
///
/// Nothing is written here; the caller persists the returned artifacts only
/// when the whole run succeeded.
pub async fn run(ingester: &RecordIngester, source: &dyn TabularSource) -> IngestResult<Artifacts> {
    let events = ingester.ingest(source).await?;
    let filters = build_catalog(&events)?;

    let (events, chart) = match date_range(&events) {
        Some((start, end)) => {
            let buckets = bucket_by_month(&events, start, end);
            info!(%start, %end, months = buckets.len(), "Bucketed events by month");
            layout_chart(buckets)
        }
        None => (events, ChartLayout::default()),
    };

    info!(
        events = events.len(),
        columns = chart.columns,
        rows = chart.rows,
        ticks = chart.ticks.len(),
        "Chart layout complete"
    );

    Ok(Artifacts {
        events,
        filters,
        chart,
    })
}
