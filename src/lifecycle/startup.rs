//! Startup reporting.
//!
//! Logs where the server can be reached, including the LAN address other
//! devices should use.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};
use std::path::Path;

/// Primary outbound IPv4 address of this machine, or loopback.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_network_ip() -> IpAddr {
    UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect("8.8.8.8:80")?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Log the startup banner for a bound listener.
///
/// A missing asset root was already reported by discovery, so only a found
/// root is mentioned here.
pub fn announce(local_addr: SocketAddr, static_root: Option<&Path>) {
    let port = local_addr.port();
    let network_ip = local_network_ip();

    tracing::info!(port, "Portal server listening");
    tracing::info!("Local:   http://localhost:{}", port);
    tracing::info!("Network: http://{}:{} (share this URL)", network_ip, port);

    if let Some(root) = static_root {
        tracing::info!(root = %root.display(), "Serving static files");
    }
}
