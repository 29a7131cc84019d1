mod file_watcher;
mod handler;
mod logscope_server;

pub use logscope_server::LogScopeServer;
