//! instant-on-presence - Aruba Instant On device presence scanner
//!
//! Polls the Instant On cloud API for the clients connected to one site,
//! caches the last good list and exposes it to a home-automation host.

pub mod api;
pub mod config;
pub mod error;
pub mod instant_on;
pub mod presence;
pub mod scanner;

pub use instant_on::{ClientSummaryApi, InstantOnClient};
pub use scanner::DeviceScanner;
