use std::sync::Arc;

use crate::{
    error::AppResult,
    model::Model,
    services::{providers::RecommendationSource, recommendations::RecommendationEngine},
};

/// Answers from the model loaded in this process
#[derive(Clone)]
pub struct LocalSource {
    model: Arc<Model>,
    engine: RecommendationEngine,
}

impl LocalSource {
    pub fn new(model: Arc<Model>, engine: RecommendationEngine) -> Self {
        Self { model, engine }
    }
}

#[async_trait::async_trait]
impl RecommendationSource for LocalSource {
    async fn recommend(&self, item_name: &str) -> AppResult<Vec<String>> {
        let recommendations = self.engine.recommend(&self.model, item_name, None)?;
        Ok(recommendations.into_iter().map(|r| r.title).collect())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::Item};

    fn source() -> LocalSource {
        let items = vec![
            Item::new(1, "Heat (1995)", "Action|Crime|Thriller"),
            Item::new(2, "GoldenEye (1995)", "Action|Adventure|Thriller"),
            Item::new(3, "Balto (1995)", "Adventure|Animation|Children"),
        ];
        let model = Arc::new(Model::build(&items).unwrap());
        LocalSource::new(model, RecommendationEngine::new(1, 10))
    }

    #[tokio::test]
    async fn test_local_source_returns_titles() {
        let titles = source().recommend("Heat (1995)").await.unwrap();
        assert_eq!(titles, vec!["GoldenEye (1995)"]);
    }

    #[tokio::test]
    async fn test_local_source_unknown_is_not_found() {
        let result = source().recommend("Casino (1995)").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
