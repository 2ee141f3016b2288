//! Cross-cutting HTTP middleware.
//!
//! [`crate::server::create_router`] wires all of these in a fixed order;
//! they are public so services with custom routers can reuse them.

pub mod client_ip;
pub mod cors;
pub mod panic;
pub mod request_id;
pub mod security;

pub use client_ip::{ClientIp, extract_ip_from_headers, resolve_client_ip};
pub use cors::{cors_layer_from_env, create_cors_layer};
pub use panic::handle_panic;
pub use request_id::{REQUEST_ID_HEADER, make_request_span};
pub use security::security_headers;
