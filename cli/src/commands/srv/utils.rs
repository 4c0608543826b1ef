//! # Server Utilities
//!
//! File: cli/src/commands/srv/utils.rs
//! Author: Christi Mahu
//!
//! Helpers for the `srv` startup banner.
//!
use std::net::{IpAddr, UdpSocket};
use tracing::{debug, info};

/// # Get Local IP (`get_local_ip`)
///
/// Best-effort guess of this machine's address on the local network, for
/// printing a URL other devices can open. Falls back to `"localhost"`.
///
/// A UDP socket is "connected" to a public address; no packet is sent, but
/// the OS picks the outbound interface, whose address is then read back.
pub fn get_local_ip() -> String {
    match outbound_ip() {
        Some(ip) => {
            info!("Found local IP: {}", ip);
            ip.to_string()
        }
        None => {
            debug!("Could not detect local network IP, falling back to 'localhost'");
            "localhost".to_string()
        }
    }
}

fn outbound_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_loopback() && !ip.is_unspecified()).then_some(ip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ip_is_never_empty() {
        let ip = get_local_ip();
        assert!(!ip.is_empty());
        assert!(ip == "localhost" || ip.parse::<IpAddr>().is_ok());
    }
}
