#![recursion_limit = "256"]
pub mod config;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;
pub mod transport;

pub use server::McpServer;

pub const SERVER_NAME: &str = "postgsail-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
