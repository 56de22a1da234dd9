mod config;
mod history;
mod loader;
mod query;
mod server;

pub use config::Config;
pub use history::HistoryConfig;
pub use loader::LoaderConfig;
pub use query::{QueryConfig, TableNaming};
pub use server::ServerConfig;
