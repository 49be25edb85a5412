//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::outbound::security::JwtSettings;

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) jwt: JwtSettings,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, jwt: JwtSettings) -> Self {
        Self { bind_addr, jwt }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
