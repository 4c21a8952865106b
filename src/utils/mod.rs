pub mod best_effort;
pub mod client_ip;
pub mod cookies;
pub mod extractors;
pub mod jwt;
pub mod pkce;
