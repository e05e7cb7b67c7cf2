use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::chart::metadata::{service_chart_metadata, ServiceChartMetadata};
use crate::domain::chart::model::ChartQuery;
use crate::domain::chart::service::time_window::TimePeriod;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("No chart metadata for service {0:?}")]
    UnknownService(String),
}

/// One query per query set of `service`, in the order the metadata declares
/// them. All queries share the same window.
pub fn build_chart_queries(
    tenant_id: Uuid,
    time_period: TimePeriod,
    service: &str,
) -> Result<Vec<ChartQuery>, ChartError> {
    build_chart_queries_at(tenant_id, time_period, service, Utc::now())
}

pub fn build_chart_queries_at(
    tenant_id: Uuid,
    time_period: TimePeriod,
    service: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ChartQuery>, ChartError> {
    let meta = service_chart_metadata(service)
        .ok_or_else(|| ChartError::UnknownService(service.to_string()))?;

    Ok(build_from_metadata(meta, tenant_id, time_period, now))
}

pub fn build_from_metadata(
    meta: &ServiceChartMetadata,
    tenant_id: Uuid,
    time_period: TimePeriod,
    now: DateTime<Utc>,
) -> Vec<ChartQuery> {
    meta.query_sets()
        .map(|qs| {
            let mut query = ChartQuery::new(qs.event_types.to_vec());
            query.set_target(tenant_id, meta.service);
            query.set_time_period_at(time_period, now);
            query
        })
        .collect()
}
