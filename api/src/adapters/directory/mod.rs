//! User directory adapter
//!
//! Resolves mention tokens against the platform's user directory over HTTP.

pub mod client;

pub use client::HttpUserDirectory;
