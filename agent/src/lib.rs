//! EVSE Agent Library
//!
//! Polls an OpenEVSE charging station over its local HTTP API, reports its
//! status as StatsD gauges and controls charging overrides and current limits.

pub mod app;
pub mod errors;
pub mod evse;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod telemetry;
pub mod utils;
pub mod workers;
