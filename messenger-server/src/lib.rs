//! Messenger WebSocket Server Library
//!
//! Request/response front for the message store. Exposed as a library so
//! integration tests can run the server in-process.

mod config;
mod connection;
mod logging;
mod messages;
mod state;

pub use config::ServerConfig;
pub use connection::{handle_connection, handle_message, serve};
pub use logging::init_logging;
pub use messages::{ClientMessage, ErrorKind, ServerMessage};
pub use state::ServerState;
