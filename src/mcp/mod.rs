/// MCP protocol implementation
///
/// JSON-RPC over stdio, exposing the nutrition operations as MCP tools.

pub mod protocol;
pub mod server;

pub use server::McpServer;
