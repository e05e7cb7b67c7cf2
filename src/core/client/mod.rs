pub mod counters_client;
pub mod counters_error;
pub mod error_message;
