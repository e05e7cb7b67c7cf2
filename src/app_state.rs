use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::core::client::counters_client::{CountersApi, CountersClient};
use crate::domain::chart::service::chart_service::ChartService;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: Arc<ChartService>,
}

pub fn build_app_state(config: &AppConfig) -> Result<AppState> {
    let client = CountersClient::new(
        &config.counters_base_url,
        config.counters_token.clone(),
        config.request_timeout,
    )?;

    Ok(app_state_with_api(Arc::new(client)))
}

pub fn app_state_with_api(api: Arc<dyn CountersApi>) -> AppState {
    AppState {
        chart_service: Arc::new(ChartService::new(api)),
    }
}
