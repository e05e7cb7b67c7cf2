use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::chart_dto::{ChartRangeQuery, CountQueryRequest};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::domain::chart::metadata::{ServiceChartMetadata, CHART_LABELS};
use crate::domain::chart::model::{ChartQuery, CountMetric, ServiceCharts};
use crate::errors::AppError;

pub struct ChartController;

impl ChartController {
    pub async fn list_services(
        State(state): State<AppState>,
    ) -> Result<Json<ApiResponse<&'static [ServiceChartMetadata]>>, AppError> {
        to_json(Ok(state.chart_service.list_services()))
    }

    pub async fn list_labels() -> Result<Json<ApiResponse<Vec<(&'static str, &'static str)>>>, AppError> {
        to_json(Ok(CHART_LABELS.to_vec()))
    }

    pub async fn get_chart_queries(
        State(state): State<AppState>,
        Path((tenant_id, service)): Path<(Uuid, String)>,
        Query(q): Query<ChartRangeQuery>,
    ) -> Result<Json<ApiResponse<Vec<ChartQuery>>>, AppError> {
        to_json(
            state
                .chart_service
                .chart_queries(tenant_id, &service, q.time_period()),
        )
    }

    pub async fn get_service_charts(
        State(state): State<AppState>,
        Path((tenant_id, service)): Path<(Uuid, String)>,
        Query(q): Query<ChartRangeQuery>,
    ) -> Result<Json<ApiResponse<ServiceCharts>>, AppError> {
        to_json(
            state
                .chart_service
                .service_charts(tenant_id, &service, q.time_period())
                .await,
        )
    }

    pub async fn post_counts(
        State(state): State<AppState>,
        Path(tenant_id): Path<Uuid>,
        Json(req): Json<CountQueryRequest>,
    ) -> Result<Json<ApiResponse<Vec<CountMetric>>>, AppError> {
        let result = match req.validate() {
            Ok(()) => {
                state
                    .chart_service
                    .query_counts(tenant_id, req.into_count_query(tenant_id))
                    .await
            }
            Err(e) => Err(e.into()),
        };

        to_json(result)
    }
}
