pub mod api;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
