use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One course's title/description unit as extracted from a subject page.
/// Produced by a `CatalogSource`; never mutated downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEntry {
    /// Title line, e.g. "MATH 220. Calculus. 3 or 4 hours."
    pub title: String,
    /// Free-text description block, possibly containing labeled sections
    pub description: String,
    /// Page-level subject heading, e.g. "Mathematics (MATH)"
    pub section_title: String,
    /// Subject page the entry was extracted from
    pub source_url: String,
    /// Position of the course block on its page
    pub block_index: usize,
}

/// Core trait that all catalog page sources must implement
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Unique identifier for this catalog source
    fn source_name(&self) -> &'static str;

    /// Fetch all raw course entries from this source
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>>;
}
