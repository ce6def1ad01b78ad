//! Content-based similarity model: vocabulary, similarity matrix and identifier
//! index, always built, saved and loaded together.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::Item;

pub mod artifact;
pub mod index;
pub mod similarity;
pub mod vectorizer;

pub use index::IdentifierIndex;
pub use similarity::SimilarityMatrix;
pub use vectorizer::{FeatureVector, Vectorizer};

/// Error types for building and loading models
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Cannot build a model from an empty corpus")]
    EmptyCorpus,

    #[error("Duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One immutable model version
#[derive(Debug, Clone)]
pub struct Model {
    pub vocabulary: Vec<String>,
    pub matrix: SimilarityMatrix,
    pub index: IdentifierIndex,
    pub built_at: DateTime<Utc>,
}

impl Model {
    /// Runs the full offline build over a catalog in catalog order.
    ///
    /// Titles are indexed trimmed, matching how queries are trimmed.
    pub fn build(items: &[Item]) -> Result<Self, ModelError> {
        let texts: Vec<&str> = items.iter().map(|item| item.attribute_text.as_str()).collect();
        let (vectorizer, vectors) = Vectorizer::build(&texts)?;
        let titles = items.iter().map(|item| item.title.trim().to_string()).collect();
        let index = IdentifierIndex::new(titles)?;
        let matrix = SimilarityMatrix::build(&vectors);

        let zero_vectors = vectors.iter().filter(|v| v.is_zero()).count();
        tracing::info!(
            items = items.len(),
            vocabulary = vectorizer.vocabulary().len(),
            zero_vectors,
            "Built similarity model"
        );

        Ok(Self {
            vocabulary: vectorizer.vocabulary().to_vec(),
            matrix,
            index,
            built_at: Utc::now(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        artifact::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        artifact::save(self, path)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
