//! Client address resolution.
//!
//! Proxy headers win over the socket address: the first entry of
//! `X-Forwarded-For`, then `X-Real-IP`, then the peer from
//! [`ConnectInfo`]. The result is stored as a [`ClientIp`] extension.

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;

/// Resolved client address, available to handlers as `Extension<ClientIp>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

const UNKNOWN: &str = "unknown";

pub fn extract_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

pub async fn resolve_client_ip(mut request: Request, next: Next) -> Response {
    let ip = extract_ip_from_headers(request.headers())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    request.extensions_mut().insert(ClientIp(ip));
    next.run(request).await
}
