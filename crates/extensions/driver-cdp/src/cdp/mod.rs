//! Chrome DevTools Protocol (CDP) client.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol. Only the domains the prototype driver needs are wrapped.

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
