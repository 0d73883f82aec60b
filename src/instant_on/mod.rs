//! Aruba Instant On cloud API integration module
//!
//! - `client`: Low-level API client (token management, HTTP requests)
//! - `models`: Response payloads consumed by the scanner

pub mod client;
pub mod models;

use async_trait::async_trait;

use crate::error::ApiError;

pub use client::InstantOnClient;
pub use models::{ClientSummary, ClientSummaryEntry};

/// Source of a site's client list.
///
/// The scanner only depends on this seam, so it can be driven by the real
/// cloud client or by an in-memory double.
#[async_trait]
pub trait ClientSummaryApi: Send + Sync {
    /// GET `/sites/{site_id}/clientSummary`
    async fn client_summary(&self, site_id: &str) -> Result<ClientSummary, ApiError>;
}
