use sedori_core::SearchResult;

use crate::{ApiError, BackendClient};

/// Anything that can turn a keyword into Yahoo Auctions listings.
#[async_trait::async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ApiError>;
}

#[async_trait::async_trait]
impl Searcher for BackendClient {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ApiError> {
        self.search_yahoo(keyword).await
    }
}
