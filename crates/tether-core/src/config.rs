//! Centralized configuration for Tether.
//!
//! Wire limits and paging defaults shared by the client, the peer loop and
//! the CLI.

use std::time::Duration;

/// Local IPC transport configuration.
pub struct IpcConfig;

impl IpcConfig {
    pub const JSONRPC_VERSION: &'static str = "2.0";
    pub const DEFAULT_ADDR: &'static str = "127.0.0.1:7431";
    pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024; // 16MB
    pub const MAX_CONNECTIONS: usize = 32;
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
}

/// Paginated listing defaults.
pub struct PageConfig;

impl PageConfig {
    pub const MAX_LIMIT: u8 = 100;
    pub const DEFAULT_LIMIT: u8 = 10;
}
