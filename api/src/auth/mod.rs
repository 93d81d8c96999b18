//! Authentication for admin endpoints

pub mod admin_token;

pub use admin_token::admin_auth_middleware;
