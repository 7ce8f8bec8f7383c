//! Endpoint address parsing.
//!
//! Endpoints are written `host[:port]`; when no port is given the
//! protocol's fixed default port applies.

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

use crate::error::WireError;

/// Default TCP port for the `Hasher` capability.
pub const DEFAULT_PORT: u16 = 5923;

/// Parses a `host[:port]` endpoint into a socket address.
///
/// Bare IP addresses and portless hostnames get [`DEFAULT_PORT`].
/// Hostnames are resolved via the system resolver; the first resolved
/// address wins.
pub fn parse_addr(addr: &str) -> Result<SocketAddr, WireError> {
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }
    if let Ok(sock) = addr.parse::<SocketAddr>() {
        return Ok(sock);
    }

    let candidate = match addr.rsplit_once(':') {
        Some((_, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            addr.to_string()
        }
        _ => format!("{addr}:{DEFAULT_PORT}"),
    };

    candidate
        .to_socket_addrs()
        .map_err(|e| WireError::BadAddress(format!("{addr}: {e}")))?
        .next()
        .ok_or_else(|| WireError::BadAddress(addr.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ip_gets_default_port() {
        let addr = parse_addr("127.0.0.1").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn explicit_port_is_kept() {
        let addr = parse_addr("127.0.0.1:8080").unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn ipv6_literal_gets_default_port() {
        let addr = parse_addr("::1").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn hostname_with_port_resolves() {
        let addr = parse_addr("localhost:4242").unwrap();
        assert_eq!(addr.port(), 4242);
    }

    #[test]
    fn hostname_without_port_gets_default() {
        let addr = parse_addr("localhost").unwrap();
        assert_eq!(addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn unresolvable_host_is_rejected() {
        assert!(matches!(
            parse_addr("definitely-not-a-real-host.invalid"),
            Err(WireError::BadAddress(_))
        ));
    }
}
