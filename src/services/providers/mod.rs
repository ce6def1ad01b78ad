//! Recommendation sources for the voice adapter
//!
//! The voice adapter only needs "titles similar to this one". It can get them
//! from the model loaded in this process or from a remote `/recommend` endpoint;
//! both sit behind [`RecommendationSource`].

use crate::error::AppResult;

pub mod http;
pub mod local;

pub use http::HttpSource;
pub use local::LocalSource;

/// Something that can answer "what is similar to this item"
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Returns recommended titles, most similar first.
    ///
    /// An unknown item is `AppError::NotFound`; anything else is a failure the
    /// caller should not expose verbatim.
    async fn recommend(&self, item_name: &str) -> AppResult<Vec<String>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
