pub mod fetch_logs;
pub mod filters;
pub mod manager;
pub mod reset_logs;
pub mod show_logs;

pub use manager::ToolManager;
