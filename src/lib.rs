pub mod alert_engine;
pub mod api;
pub mod arguments;
pub mod config;
pub mod db;
pub mod discovery;
pub mod errors;
pub mod filter;
pub mod global;
pub mod logger;
pub mod notifications;
pub mod poller;
