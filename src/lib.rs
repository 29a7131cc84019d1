pub mod cli;
pub mod config;
pub mod query;
pub mod run;
pub mod server;
pub mod store;
pub mod tools;
pub mod types;

pub use cli::CliOptions;
pub use config::Config;
pub use server::LogScopeServer;
pub use store::LogsFilterStore;
