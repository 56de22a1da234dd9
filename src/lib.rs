pub mod api;
pub mod conf;
pub mod core;
pub mod history;
pub mod loader;
pub mod query;
pub mod service;
pub mod table;

#[cfg(feature = "testutil")]
pub mod testutil;
