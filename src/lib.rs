pub mod buttondown_client;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod settings;
pub mod startup;
pub mod telemetry;
pub mod utils;
