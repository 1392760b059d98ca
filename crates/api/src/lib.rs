//! HTTP surface: bearer-token adapters, REST routes and the query endpoint.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod workers;
