//! Client identity extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the identity a request is rate limited under.
///
/// Without a proxy the peer socket address is authoritative. Behind a trusted
/// reverse proxy the first `X-Forwarded-For` entry wins, then `X-Real-IP`,
/// then the peer address.
///
/// Returns `None` when no source yields an address.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<IpAddr> {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip);
    }

    peer.map(|addr| addr.ip())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("192.0.2.10:5000".parse().unwrap())
    }

    #[test]
    fn test_peer_address_used_by_default() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));

        let ip = client_ip(&headers, peer(), false);
        assert_eq!(ip, Some("192.0.2.10".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let ip = client_ip(&headers, peer(), true);
        assert_eq!(ip, Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));

        let ip = client_ip(&headers, peer(), true);
        assert_eq!(ip, Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("unknown"));

        let ip = client_ip(&headers, peer(), true);
        assert_eq!(ip, Some("192.0.2.10".parse().unwrap()));
    }

    #[test]
    fn test_no_source() {
        assert_eq!(client_ip(&HeaderMap::new(), None, true), None);
    }
}
