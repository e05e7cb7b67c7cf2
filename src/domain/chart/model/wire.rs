//! Response shape of the counters charts endpoint.
//!
//! `{ "charts": [ { "chart": [ { "column": [ { "xAxis": "0", "values": {..} } ] } ] } ] }`
//!
//! The producer sends `null` for any list or map it never filled, so those
//! decode as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSample {
    #[serde(rename = "xAxis")]
    pub x_axis: String,
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub values: BTreeMap<String, i64>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartColumn {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub column: Vec<ChartSample>,
}

#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub chart: Vec<ChartColumn>,
}

/// `charts` must be present, but `"charts": null` means no data.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartsResponse {
    #[serde_as(as = "DefaultOnNull")]
    pub charts: Vec<ChartEntry>,
}
