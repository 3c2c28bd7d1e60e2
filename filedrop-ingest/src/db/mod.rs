//! Database access for filedrop-ingest
//!
//! Pool creation and table bootstrap live in `filedrop_common::db`; the
//! modules here hold the queries this service runs against the shared
//! database.

pub mod scheduler_log;
pub mod users;
