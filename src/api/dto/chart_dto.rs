use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::chart::model::CountQuery;
use crate::domain::chart::service::time_window::TimePeriod;

/// `?period=minutes|hour|day|week`; anything else resolves to `hour`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartRangeQuery {
    pub period: Option<String>,
}

impl ChartRangeQuery {
    pub fn time_period(&self) -> TimePeriod {
        self.period
            .as_deref()
            .map(TimePeriod::parse_or_default)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_count_window"))]
pub struct CountQueryRequest {
    #[validate(length(min = 1))]
    pub service: String,
    #[serde(default)]
    pub object_ids: Vec<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub event_suffix_filter: Option<Vec<String>>,
}

fn validate_count_window(req: &CountQueryRequest) -> Result<(), ValidationError> {
    if req.end <= req.start {
        return Err(ValidationError::new("end_before_start"));
    }
    Ok(())
}

impl CountQueryRequest {
    pub fn into_count_query(self, tenant_id: Uuid) -> CountQuery {
        CountQuery {
            tenant_id,
            service: self.service,
            object_ids: self.object_ids,
            start: self.start,
            end: self.end,
            event_suffix_filter: self.event_suffix_filter,
        }
    }
}
