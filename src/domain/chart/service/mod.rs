//! Window resolution, query building, response flattening and chart assembly.

pub mod chart_flatten;
pub mod chart_service;
pub mod query_builder;
pub mod time_window;
