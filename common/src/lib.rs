// Schedule resolution core shared by the resolver CLI

pub mod cache;
pub mod config;
pub mod directory;
pub mod errors;
pub mod models;
pub mod schedule;
pub mod telemetry;
