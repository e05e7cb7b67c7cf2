use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::client::counters_error::CountersClientError;
use crate::core::client::error_message::extract_error_message;
use crate::domain::chart::model::wire::ChartsResponse;
use crate::domain::chart::model::{ChartQuery, ChartRenderableData, CountMetric, CountQuery};
use crate::domain::chart::service::chart_flatten::flatten_charts;

/// Tenant-scoped counters endpoints of the console API.
#[async_trait]
pub trait CountersApi: Send + Sync {
    /// Submits every query of one refresh in a single request. Result `i`
    /// belongs to query `i`.
    async fn fetch_chart_data(
        &self,
        tenant_id: Uuid,
        queries: &[ChartQuery],
    ) -> Result<Vec<Vec<ChartRenderableData>>, CountersClientError>;

    async fn query_counts(
        &self,
        tenant_id: Uuid,
        query: &CountQuery,
    ) -> Result<Vec<CountMetric>, CountersClientError>;
}

#[derive(Clone)]
pub struct CountersClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl CountersClient {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CountersClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CountersClientError::Build)?;

        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn charts_url(&self, tenant_id: Uuid) -> String {
        format!("{}/api/tenants/{}/counters/charts", self.base_url, tenant_id)
    }

    pub fn count_query_url(&self, tenant_id: Uuid) -> String {
        format!("{}/api/tenants/{}/counters/query", self.base_url, tenant_id)
    }

    /// POSTs `body` as JSON and returns the body of a 2xx response.
    async fn post_json<B>(&self, url: &str, body: &B) -> Result<String, CountersClientError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = serde_json::to_string(body)
            .unwrap_or_else(|_| "<failed-to-serialize-body>".to_string());

        let mut req = self.client.post(url).json(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| CountersClientError::Transport {
            url: url.to_string(),
            payload: payload.clone(),
            source: e,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = extract_error_message(&text);
            warn!("Counters API {} returned {}: {}", url, status, message);
            return Err(CountersClientError::Http { status, message });
        }

        resp.text().await.map_err(|e| CountersClientError::Transport {
            url: url.to_string(),
            payload,
            source: e,
        })
    }
}

#[async_trait]
impl CountersApi for CountersClient {
    async fn fetch_chart_data(
        &self,
        tenant_id: Uuid,
        queries: &[ChartQuery],
    ) -> Result<Vec<Vec<ChartRenderableData>>, CountersClientError> {
        let url = self.charts_url(tenant_id);
        info!("Fetching {} chart queries for tenant {}", queries.len(), tenant_id);

        let text = self.post_json(&url, queries).await?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| CountersClientError::InvalidResponse(format!("body is not JSON: {}", e)))?;
        if value.get("charts").is_none() {
            return Err(CountersClientError::InvalidResponse(
                "missing `charts` field".to_string(),
            ));
        }

        let response: ChartsResponse = serde_json::from_value(value)
            .map_err(|e| CountersClientError::InvalidResponse(e.to_string()))?;
        debug!("Received {} charts for tenant {}", response.charts.len(), tenant_id);

        Ok(flatten_charts(response, queries.len()))
    }

    async fn query_counts(
        &self,
        tenant_id: Uuid,
        query: &CountQuery,
    ) -> Result<Vec<CountMetric>, CountersClientError> {
        let url = self.count_query_url(tenant_id);
        info!("Querying counts for tenant {} service {}", tenant_id, query.service);

        let text = self.post_json(&url, query).await?;

        serde_json::from_str(&text).map_err(|e| CountersClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    use crate::domain::chart::service::query_builder::build_chart_queries;
    use crate::domain::chart::service::time_window::TimePeriod;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> CountersClient {
        CountersClient::new(base_url, Some("test-token".into()), Duration::from_secs(5)).unwrap()
    }

    /// Answers each query with two buckets keyed by its first event code.
    async fn echo_charts(Json(queries): Json<Vec<Value>>) -> Json<Value> {
        let charts: Vec<Value> = queries
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let code = q["event_codes"][0].to_string();
                let mut first = serde_json::Map::new();
                first.insert(code.clone(), json!(i));
                let mut second = serde_json::Map::new();
                second.insert(code, json!(i + 10));
                json!({"chart": [{"column": [
                    {"xAxis": "0", "values": first},
                    {"xAxis": "1", "values": second}
                ]}]})
            })
            .collect();
        Json(json!({ "charts": charts }))
    }

    #[tokio::test]
    async fn test_fetch_chart_data_posts_all_queries_once() {
        let seen: Arc<Mutex<Vec<(Uuid, usize)>>> = Arc::default();
        let seen_in_handler = seen.clone();
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/charts",
            post(move |Path(tenant_id): Path<Uuid>, body: Json<Vec<Value>>| {
                let seen = seen_in_handler.clone();
                async move {
                    seen.lock().unwrap().push((tenant_id, body.0.len()));
                    echo_charts(body).await
                }
            }),
        );
        let base = spawn_stub(router).await;

        let tenant = Uuid::new_v4();
        let queries = build_chart_queries(tenant, TimePeriod::Day, "authz").unwrap();
        let rows = client(&base).fetch_chart_data(tenant, &queries).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(tenant, queries.len())]);
        assert_eq!(rows.len(), queries.len());
        for (i, (rows, query)) in rows.iter().zip(&queries).enumerate() {
            let key = query.event_types[0].to_string();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].x_axis, "0");
            assert_eq!(rows[0].values[&key], i as i64);
            assert_eq!(rows[1].values[&key], i as i64 + 10);
        }
    }

    #[tokio::test]
    async fn test_http_error_carries_status_and_nested_message() {
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/charts",
            post(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"error": {"error": "forbidden"}})),
                )
                    .into_response()
            }),
        );
        let base = spawn_stub(router).await;

        let queries = vec![ChartQuery::new(vec![200])];
        let err = client(&base)
            .fetch_chart_data(Uuid::nil(), &queries)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
        match err {
            CountersClientError::Http { message, .. } => assert_eq!(message, "forbidden"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_charts_is_invalid_response() {
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/charts",
            post(|| async { Json(json!({"data": []})) }),
        );
        let base = spawn_stub(router).await;

        let err = client(&base)
            .fetch_chart_data(Uuid::nil(), &[ChartQuery::new(vec![1])])
            .await
            .unwrap_err();
        assert!(matches!(err, CountersClientError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_charts_is_not_an_error() {
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/charts",
            post(|| async { Json(json!({"charts": []})) }),
        );
        let base = spawn_stub(router).await;

        let queries = vec![
            ChartQuery::new(vec![1]),
            ChartQuery::new(vec![2]),
            ChartQuery::new(vec![3]),
        ];
        let rows = client(&base).fetch_chart_data(Uuid::nil(), &queries).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn test_null_charts_is_not_an_error() {
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/charts",
            post(|| async { Json(json!({"charts": null})) }),
        );
        let base = spawn_stub(router).await;

        let queries = vec![
            ChartQuery::new(vec![1]),
            ChartQuery::new(vec![2]),
            ChartQuery::new(vec![3]),
        ];
        let rows = client(&base).fetch_chart_data(Uuid::nil(), &queries).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn test_transport_error_includes_payload() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr))
            .fetch_chart_data(Uuid::nil(), &[ChartQuery::new(vec![4242])])
            .await
            .unwrap_err();

        match err {
            CountersClientError::Transport { payload, .. } => assert!(payload.contains("4242")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_query_counts() {
        let router = Router::new().route(
            "/api/tenants/{tenant_id}/counters/query",
            post(|Json(q): Json<Value>| async move {
                assert_eq!(q["service"], "idp");
                Json(json!([
                    {"event_name": "accessor.call", "count": 7},
                    {"event_name": "accessor.error", "event_type": "error", "count": 1}
                ]))
            }),
        );
        let base = spawn_stub(router).await;

        let now = chrono::Utc::now();
        let query = CountQuery {
            tenant_id: Uuid::nil(),
            service: "idp".into(),
            object_ids: vec![Uuid::new_v4()],
            start: now - chrono::Duration::hours(1),
            end: now,
            event_suffix_filter: Some(vec!["call".into()]),
        };
        let metrics = client(&base).query_counts(Uuid::nil(), &query).await.unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].event_name, "accessor.call");
        assert_eq!(metrics[0].count, 7);
        assert_eq!(metrics[1].event_type.as_deref(), Some("error"));
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let c = CountersClient::with_client(Client::new(), "http://console.local/", None);
        let tenant = Uuid::nil();
        assert_eq!(
            c.charts_url(tenant),
            format!("http://console.local/api/tenants/{}/counters/charts", tenant)
        );
        assert_eq!(
            c.count_query_url(tenant),
            format!("http://console.local/api/tenants/{}/counters/query", tenant)
        );
    }
}
