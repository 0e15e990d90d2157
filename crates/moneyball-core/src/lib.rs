// Library root: data loading, position schemas, weighted scoring, ranking and
// the chart view models consumed by the dashboard front end.

pub mod config;
pub mod data;
pub mod radar;
pub mod ranking;
pub mod scatter;
pub mod schema;
pub mod scoring;
pub mod session;
