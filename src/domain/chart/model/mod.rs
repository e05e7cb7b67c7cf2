//! Chart request units, count queries and the flattened view-model.

pub mod wire;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::chart::metadata::is_known_service;
use crate::domain::chart::service::time_window::{
    resolve_time_window, resolve_time_window_at, TimePeriod, TimeWindow,
};

const MAX_EVENT_CODES: usize = 100;
const MAX_BUCKETS: i64 = 60;
const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// One request unit sent to the counters charts endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartQuery {
    pub tenant_id: Uuid,
    pub service: String,
    #[serde(rename = "event_codes")]
    pub event_types: Vec<i32>,
    #[serde(with = "crate::core::util::iso_time")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::core::util::iso_time")]
    pub end: DateTime<Utc>,
    /// Bucket width in nanoseconds.
    pub period: i64,
}

/// Subset of the wire shape that survives decoding; the window is recomputed.
#[derive(Deserialize)]
struct ChartQueryJson {
    #[serde(default)]
    tenant_id: Uuid,
    #[serde(default)]
    service: String,
    #[serde(default)]
    event_codes: Vec<i32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryValidationError {
    #[error("invalid service type specified: {0:?}")]
    InvalidService(String),

    #[error("too few event types for counter read - {0}")]
    TooFewEventTypes(usize),

    #[error("too many event types for counter read - {0}")]
    TooManyEventTypes(usize),

    #[error("period is too small for counter read - {0}ns")]
    PeriodTooSmall(i64),

    #[error("end time has to be greater than start time")]
    WindowNotOrdered,

    #[error("too many time periods specified for counter read - {0}")]
    TooManyBuckets(i64),
}

impl ChartQuery {
    /// New query over `event_types` with a nil tenant, no service and the
    /// default (`hour`) window.
    pub fn new(event_types: Vec<i32>) -> Self {
        let window = resolve_time_window(TimePeriod::default());
        Self {
            tenant_id: Uuid::nil(),
            service: String::new(),
            event_types,
            start: window.start,
            end: window.end,
            period: window.period,
        }
    }

    pub fn set_target(&mut self, tenant_id: Uuid, service: impl Into<String>) {
        self.tenant_id = tenant_id;
        self.service = service.into();
    }

    pub fn set_time_period(&mut self, period: TimePeriod) {
        self.apply_window(resolve_time_window(period));
    }

    pub fn set_time_period_at(&mut self, period: TimePeriod, now: DateTime<Utc>) {
        self.apply_window(resolve_time_window_at(period, now));
    }

    fn apply_window(&mut self, window: TimeWindow) {
        self.start = window.start;
        self.end = window.end;
        self.period = window.period;
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes tenant, service and event codes. `start`, `end` and `period`
    /// are not read back; they are recomputed for the default window.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let decoded: ChartQueryJson = serde_json::from_str(raw)?;
        let mut query = ChartQuery::new(decoded.event_codes);
        query.set_target(decoded.tenant_id, decoded.service);
        Ok(query)
    }

    /// Number of buckets the window spans, rounding a partial bucket up.
    pub fn bucket_count(&self) -> i64 {
        if self.period <= 0 {
            return 0;
        }
        let span = (self.end - self.start)
            .num_nanoseconds()
            .unwrap_or(i64::MAX);
        let full = span / self.period;
        if span % self.period == 0 {
            full
        } else {
            full + 1
        }
    }

    /// Same checks the aggregation backend applies before answering.
    pub fn validate(&self) -> Result<(), QueryValidationError> {
        if !is_known_service(&self.service) {
            return Err(QueryValidationError::InvalidService(self.service.clone()));
        }
        if self.event_types.is_empty() {
            return Err(QueryValidationError::TooFewEventTypes(0));
        }
        if self.event_types.len() > MAX_EVENT_CODES {
            return Err(QueryValidationError::TooManyEventTypes(self.event_types.len()));
        }
        if self.period < NANOS_PER_SECOND {
            return Err(QueryValidationError::PeriodTooSmall(self.period));
        }
        if self.end <= self.start {
            return Err(QueryValidationError::WindowNotOrdered);
        }
        let buckets = self.bucket_count();
        if buckets > MAX_BUCKETS {
            return Err(QueryValidationError::TooManyBuckets(buckets));
        }
        Ok(())
    }
}

/// Body of the non-chart count endpoint.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountQuery {
    pub tenant_id: Uuid,
    pub service: String,
    #[serde(default)]
    pub object_ids: Vec<Uuid>,
    #[serde(with = "crate::core::util::iso_time")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::core::util::iso_time")]
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub event_suffix_filter: Option<Vec<String>>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountMetric {
    #[serde(default)]
    pub object_id: Option<Uuid>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub count: i64,
}

/// One flattened bucket: the x-axis label plus a value per series key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartRenderableData {
    #[serde(rename = "xAxis")]
    pub x_axis: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySet {
    pub label: String,
    pub data: Vec<ChartRenderableData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub div_id: String,
    pub query_sets: Vec<QuerySet>,
    /// Human labels for the series keys present in `query_sets`.
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCharts {
    pub tenant_id: Uuid,
    pub service: String,
    pub time_period: TimePeriod,
    #[serde(with = "crate::core::util::iso_time")]
    pub start: DateTime<Utc>,
    #[serde(with = "crate::core::util::iso_time")]
    pub end: DateTime<Utc>,
    pub period: i64,
    pub charts: Vec<ChartView>,
}
