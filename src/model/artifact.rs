use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{IdentifierIndex, Model, ModelError, SimilarityMatrix};

/// Current on-disk artifact layout
pub const FORMAT_VERSION: u32 = 1;

/// Persisted form of a [`Model`]: identifiers, vocabulary and matrix as one document
#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    built_at: DateTime<Utc>,
    dimension: usize,
    identifiers: Vec<String>,
    vocabulary: Vec<String>,
    /// Row-major N×N similarity values
    matrix: Vec<f32>,
}

/// Writes the model to `path` through a uniquely named sibling temp file +
/// rename. The temp file is removed if any step fails.
pub fn save(model: &Model, path: &Path) -> Result<(), ModelError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let artifact = ModelArtifact {
        format_version: FORMAT_VERSION,
        built_at: model.built_at,
        dimension: model.matrix.dimension(),
        identifiers: model.index.identifiers().to_vec(),
        vocabulary: model.vocabulary.clone(),
        matrix: model.matrix.values().to_vec(),
    };

    let tmp_path = temp_path_for(path);
    if let Err(e) = write_then_rename(&artifact, &tmp_path, path) {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            tracing::debug!(path = %tmp_path.display(), error = %cleanup, "Temp artifact not removed");
        }
        return Err(e);
    }

    tracing::info!(
        path = %path.display(),
        items = artifact.dimension,
        "Saved model artifact"
    );

    Ok(())
}

fn write_then_rename(artifact: &ModelArtifact, tmp_path: &Path, path: &Path) -> Result<(), ModelError> {
    let mut writer = BufWriter::new(File::create(tmp_path)?);
    serde_json::to_writer(&mut writer, artifact).map_err(|e| ModelError::Io(e.into()))?;
    writer.flush()?;
    drop(writer);
    fs::rename(tmp_path, path)?;
    Ok(())
}

/// `.model.json.<uuid>.tmp` next to `path`, so concurrent builds never share a temp file
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    path.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()))
}

/// Reads and validates an artifact. Any inconsistency is a load error; nothing
/// partially loaded is ever returned.
pub fn load(path: &Path) -> Result<Model, ModelError> {
    let file = File::open(path)
        .map_err(|e| ModelError::ModelLoad(format!("{}: {}", path.display(), e)))?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ModelError::ModelLoad(format!("{}: invalid artifact: {}", path.display(), e)))?;

    let model = validate(artifact)?;

    tracing::info!(
        path = %path.display(),
        items = model.index.len(),
        vocabulary = model.vocabulary.len(),
        built_at = %model.built_at,
        "Loaded model artifact"
    );

    Ok(model)
}

fn validate(artifact: ModelArtifact) -> Result<Model, ModelError> {
    if artifact.format_version != FORMAT_VERSION {
        return Err(ModelError::ModelLoad(format!(
            "unsupported format version {} (expected {})",
            artifact.format_version, FORMAT_VERSION
        )));
    }

    let n = artifact.dimension;
    if artifact.identifiers.len() != n {
        return Err(ModelError::ModelLoad(format!(
            "identifier count {} does not match matrix dimension {}",
            artifact.identifiers.len(),
            n
        )));
    }

    if artifact.matrix.iter().any(|s| !s.is_finite() || !(0.0..=1.0).contains(s)) {
        return Err(ModelError::ModelLoad(
            "similarity values must lie in [0, 1]".to_string(),
        ));
    }

    let matrix = SimilarityMatrix::from_raw(n, artifact.matrix).ok_or_else(|| {
        ModelError::ModelLoad(format!("matrix is not {}x{}", n, n))
    })?;

    for i in 0..n {
        for j in (i + 1)..n {
            if matrix.get(i, j) != matrix.get(j, i) {
                return Err(ModelError::ModelLoad(format!(
                    "matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }
    }

    let index = IdentifierIndex::new(artifact.identifiers).map_err(|e| {
        ModelError::ModelLoad(e.to_string())
    })?;

    Ok(Model {
        vocabulary: artifact.vocabulary,
        matrix,
        index,
        built_at: artifact.built_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("cinesim-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    fn sample_model() -> Model {
        let items = vec![
            Item::new(1, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy"),
            Item::new(2, "Jumanji (1995)", "Adventure|Children|Fantasy"),
            Item::new(3, "Heat (1995)", "Action|Crime|Thriller"),
        ];
        Model::build(&items).unwrap()
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn write_raw(path: &Path, value: serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, value.to_string()).unwrap();
    }

    #[test]
    fn test_save_then_load_keeps_rows_and_scores() {
        let model = sample_model();
        let path = temp_path("model.json");

        save(&model, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.index, model.index);
        assert_eq!(loaded.matrix, model.matrix);
        assert_eq!(loaded.vocabulary, model.vocabulary);
        assert_eq!(dir_entries(path.parent().unwrap()), vec!["model.json"]);
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let path = temp_path("model.json");
        // A non-empty directory at the target makes the final rename fail
        fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(save(&sample_model(), &path).is_err());
        assert_eq!(dir_entries(path.parent().unwrap()), vec!["model.json"]);
    }

    #[test]
    fn test_temp_paths_are_unique_siblings() {
        let path = Path::new("/srv/models/model.json");
        let first = temp_path_for(path);
        let second = temp_path_for(path);

        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
        assert!(first.file_name().unwrap().to_string_lossy().starts_with(".model.json."));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let result = load(&temp_path("absent.json"));
        assert!(matches!(result, Err(ModelError::ModelLoad(_))));
    }

    #[test]
    fn test_dimension_mismatch_is_load_error() {
        let path = temp_path("mismatch.json");
        write_raw(
            &path,
            serde_json::json!({
                "format_version": 1,
                "built_at": "2024-01-01T00:00:00Z",
                "dimension": 2,
                "identifiers": ["A", "B", "C"],
                "vocabulary": [],
                "matrix": [1.0, 0.0, 0.0, 1.0]
            }),
        );

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("identifier count 3"));
    }

    #[test]
    fn test_short_matrix_is_load_error() {
        let path = temp_path("short.json");
        write_raw(
            &path,
            serde_json::json!({
                "format_version": 1,
                "built_at": "2024-01-01T00:00:00Z",
                "dimension": 2,
                "identifiers": ["A", "B"],
                "vocabulary": [],
                "matrix": [1.0, 0.0, 0.0]
            }),
        );

        assert!(matches!(load(&path), Err(ModelError::ModelLoad(_))));
    }

    #[test]
    fn test_asymmetric_matrix_is_load_error() {
        let path = temp_path("asymmetric.json");
        write_raw(
            &path,
            serde_json::json!({
                "format_version": 1,
                "built_at": "2024-01-01T00:00:00Z",
                "dimension": 2,
                "identifiers": ["A", "B"],
                "vocabulary": [],
                "matrix": [1.0, 0.5, 0.25, 1.0]
            }),
        );

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("not symmetric"));
    }

    #[test]
    fn test_unknown_format_version_is_load_error() {
        let path = temp_path("future.json");
        write_raw(
            &path,
            serde_json::json!({
                "format_version": 99,
                "built_at": "2024-01-01T00:00:00Z",
                "dimension": 1,
                "identifiers": ["A"],
                "vocabulary": [],
                "matrix": [1.0]
            }),
        );

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 99"));
    }
}
