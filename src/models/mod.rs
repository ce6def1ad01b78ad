use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::ModelError;

/// A catalog record: one movie and the text its features are built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: u64,
    /// Display title, also the identifier clients query by
    pub title: String,
    /// Free-form attribute text, e.g. a pipe-separated genre list
    pub attribute_text: String,
}

impl Item {
    pub fn new(id: u64, title: impl Into<String>, attribute_text: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            attribute_text: attribute_text.into(),
        }
    }
}

// ============================================================================
// MovieLens catalog (movieId,title,genres)
// ============================================================================

/// Raw row of a MovieLens `movies.csv`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub movie_id: u64,
    pub title: String,
    pub genres: String,
}

impl From<MovieRecord> for Item {
    fn from(record: MovieRecord) -> Self {
        Item {
            id: record.movie_id,
            title: record.title.trim().to_string(),
            attribute_text: record.genres.trim().to_string(),
        }
    }
}

/// Reads a catalog CSV in file order
pub fn read_catalog(path: &Path) -> Result<Vec<Item>, ModelError> {
    read_catalog_from(csv::Reader::from_path(path)?)
}

pub fn read_catalog_from<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Item>, ModelError> {
    reader
        .deserialize::<MovieRecord>()
        .map(|row| row.map(Item::from).map_err(ModelError::from))
        .collect()
}

/// Drops later items whose trimmed title was already seen, keeping catalog order
pub fn dedupe_titles(items: Vec<Item>) -> Vec<Item> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let first = seen.insert(item.title.trim().to_string());
            if !first {
                tracing::warn!(id = item.id, title = %item.title, "Dropping duplicate title");
            }
            first
        })
        .collect()
}

// ============================================================================
// Serving wire types
// ============================================================================

/// Successful `/recommend` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    #[serde(alias = "recommended_movies")]
    pub recommended_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<f32>>,
}

/// Metadata about the loaded model version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub items: usize,
    pub vocabulary_size: usize,
    pub built_at: chrono::DateTime<chrono::Utc>,
    pub format_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "movieId,title,genres\n\
        1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy\n\
        2,\"  American President, The (1995) \",Comedy|Drama|Romance \n\
        3,Heat (1995),(no genres listed)\n";

    #[test]
    fn test_read_catalog_parses_movielens_rows() {
        let items = read_catalog_from(csv::Reader::from_reader(CATALOG.as_bytes())).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].id, 2);
        assert_eq!(items[1].title, "American President, The (1995)");
        assert_eq!(items[1].attribute_text, "Comedy|Drama|Romance");
    }

    #[test]
    fn test_read_catalog_rejects_bad_id() {
        let bad = "movieId,title,genres\nabc,Heat (1995),Action\n";
        let result = read_catalog_from(csv::Reader::from_reader(bad.as_bytes()));
        assert!(matches!(result, Err(ModelError::Catalog(_))));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let items = vec![
            Item::new(1, "Emma (1996)", "Comedy"),
            Item::new(2, "Heat (1995)", "Action"),
            Item::new(3, "Emma (1996) ", "Romance"),
        ];
        let deduped = dedupe_titles(items);
        let ids: Vec<u64> = deduped.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_response_omits_scores_by_default() {
        let response = RecommendationResponse {
            recommended_items: vec!["Heat (1995)".to_string()],
            scores: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"recommended_items":["Heat (1995)"]}"#);
    }
}
