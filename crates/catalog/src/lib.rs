//! Offer Fetch collaborator: the client side of the offers catalog REST
//! service, plus an in-memory stand-in used by tests and offline chat.
//!
//! The seam is deliberately infallible: a catalog that is down, slow, or
//! returning garbage degrades to an empty result set, which the decision
//! layer interprets as "ask the user to adjust criteria". The failure itself
//! is recorded as a diagnostic only.

pub mod http;
pub mod memory;

use async_trait::async_trait;
use offerly_core::{Criteria, Offer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetches offers matching all supplied filters (AND semantics). Never
    /// fails: transport or status problems yield an empty sequence.
    async fn fetch(&self, criteria: &Criteria) -> Vec<Offer>;
}

pub use http::HttpCatalogClient;
pub use memory::{sample_offers, InMemoryCatalog};
