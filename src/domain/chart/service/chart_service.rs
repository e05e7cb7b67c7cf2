use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::client::counters_client::CountersApi;
use crate::domain::chart::metadata::{
    chart_label, service_chart_metadata, ServiceChartMetadata, SERVICE_CHARTS,
};
use crate::domain::chart::model::{
    ChartQuery, ChartRenderableData, ChartView, CountMetric, CountQuery, QuerySet, ServiceCharts,
};
use crate::domain::chart::service::query_builder::{build_from_metadata, ChartError};
use crate::domain::chart::service::time_window::{resolve_time_window_at, TimePeriod};

#[derive(Clone)]
pub struct ChartService {
    api: Arc<dyn CountersApi>,
}

impl ChartService {
    pub fn new(api: Arc<dyn CountersApi>) -> Self {
        Self { api }
    }

    /// Every charted service with its full chart layout.
    pub fn list_services(&self) -> &'static [ServiceChartMetadata] {
        SERVICE_CHARTS
    }

    pub fn chart_queries(
        &self,
        tenant_id: Uuid,
        service: &str,
        time_period: TimePeriod,
    ) -> Result<Vec<ChartQuery>> {
        let meta = lookup(service)?;
        Ok(build_from_metadata(meta, tenant_id, time_period, Utc::now()))
    }

    /// Builds, fetches and labels every chart of `service` in one round trip.
    pub async fn service_charts(
        &self,
        tenant_id: Uuid,
        service: &str,
        time_period: TimePeriod,
    ) -> Result<ServiceCharts> {
        self.service_charts_at(tenant_id, service, time_period, Utc::now())
            .await
    }

    pub async fn service_charts_at(
        &self,
        tenant_id: Uuid,
        service: &str,
        time_period: TimePeriod,
        now: DateTime<Utc>,
    ) -> Result<ServiceCharts> {
        let meta = lookup(service)?;
        let queries = build_from_metadata(meta, tenant_id, time_period, now);

        for (i, q) in queries.iter().enumerate() {
            if let Err(e) = q.validate() {
                warn!("Chart query {} for {} may be rejected: {}", i, service, e);
            }
        }

        let rows = self.api.fetch_chart_data(tenant_id, &queries).await?;
        info!(
            "Fetched {} chart series for tenant {} service {} ({})",
            rows.len(),
            tenant_id,
            service,
            time_period.as_str()
        );

        let window = resolve_time_window_at(time_period, now);
        Ok(ServiceCharts {
            tenant_id,
            service: meta.service.to_string(),
            time_period,
            start: window.start,
            end: window.end,
            period: window.period,
            charts: assemble_service_charts(meta, rows),
        })
    }

    pub async fn query_counts(&self, tenant_id: Uuid, mut query: CountQuery) -> Result<Vec<CountMetric>> {
        lookup(&query.service)?;
        query.tenant_id = tenant_id;
        Ok(self.api.query_counts(tenant_id, &query).await?)
    }
}

fn lookup(service: &str) -> Result<&'static ServiceChartMetadata, ChartError> {
    service_chart_metadata(service).ok_or_else(|| ChartError::UnknownService(service.to_string()))
}

/// Pairs row list `i` with query set `i` of `meta`, walking charts in order.
/// Query sets without a matching row list get no data; surplus row lists
/// are dropped with a warning.
pub fn assemble_service_charts(
    meta: &ServiceChartMetadata,
    rows: Vec<Vec<ChartRenderableData>>,
) -> Vec<ChartView> {
    let expected = meta.query_set_count();
    if rows.len() > expected {
        warn!(
            "Dropping {} unmatched chart series for service {}",
            rows.len() - expected,
            meta.service
        );
    }

    let mut rows = rows.into_iter();
    meta.charts
        .iter()
        .map(|chart| {
            let query_sets: Vec<QuerySet> = chart
                .query_sets
                .iter()
                .map(|qs| QuerySet {
                    label: qs.name.to_string(),
                    data: rows.next().unwrap_or_default(),
                })
                .collect();

            let labels = series_labels(&query_sets);
            ChartView {
                title: chart.title.to_string(),
                div_id: chart.div_id.to_string(),
                query_sets,
                labels,
            }
        })
        .collect()
}

fn series_labels(query_sets: &[QuerySet]) -> BTreeMap<String, String> {
    query_sets
        .iter()
        .flat_map(|qs| qs.data.iter())
        .flat_map(|row| row.values.keys())
        .map(|key| {
            let label = chart_label(key).unwrap_or(key.as_str());
            (key.clone(), label.to_string())
        })
        .collect()
}
