pub mod metadata;
pub mod model;
pub mod service;
