use std::net::{IpAddr, SocketAddr};

use axum::{extract::ConnectInfo, http::request::Parts};
use http::{HeaderMap, header};

const FALLBACK_IP: &str = "::1";

/// Requester address: first `X-Forwarded-For` entry, else the peer, else loopback.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    match (forwarded, peer) {
        (Some(value), _) => strip_port(value),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => FALLBACK_IP.to_string(),
    }
}

pub fn client_ip_from_parts(parts: &Parts) -> String {
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    resolve_client_ip(&parts.headers, peer)
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn strip_port(value: &str) -> String {
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return addr.ip().to_string();
    }

    if value.parse::<IpAddr>().is_ok() {
        return value.to_string();
    }

    match value.split_once(':') {
        Some((host, port)) if !port.contains(':') => host.to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn first_forwarded_entry_wins() {
        let peer: SocketAddr = "10.0.0.1:4000".parse().unwrap();
        let ip = resolve_client_ip(&forwarded("203.0.113.7, 10.0.0.2"), Some(peer));
        assert_eq!(ip, "203.0.113.7");
    }

    #[test]
    fn port_is_stripped() {
        assert_eq!(resolve_client_ip(&forwarded("203.0.113.7:5555"), None), "203.0.113.7");
        assert_eq!(resolve_client_ip(&forwarded("[2001:db8::1]:443"), None), "2001:db8::1");
    }

    #[test]
    fn bare_ipv6_is_kept_whole() {
        assert_eq!(resolve_client_ip(&forwarded("2001:db8::1"), None), "2001:db8::1");
    }

    #[test]
    fn falls_back_to_peer_then_loopback() {
        let peer: SocketAddr = "192.0.2.10:1234".parse().unwrap();
        assert_eq!(resolve_client_ip(&HeaderMap::new(), Some(peer)), "192.0.2.10");
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), "::1");
    }
}
