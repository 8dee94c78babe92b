//! Video search integrations

mod candidate;
mod youtube;

pub use candidate::*;
pub use youtube::*;

use crate::error::Result;

/// Generic video search trait
#[async_trait::async_trait]
pub trait VideoSearch: Send + Sync {
    /// Search for videos, returning candidates in the platform's own order
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchCandidate>>;
    fn name(&self) -> &str;
}
