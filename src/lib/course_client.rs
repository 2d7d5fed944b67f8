pub mod backend;
pub mod error;
pub mod intents;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod run_tool;
pub mod store;
pub mod tasks;
pub mod views;
