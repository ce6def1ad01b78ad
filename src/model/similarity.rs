use super::vectorizer::FeatureVector;

/// Dense, symmetric N×N cosine-similarity matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Computes pairwise cosine similarity for every vector pair.
    ///
    /// Only the upper triangle is computed; the lower triangle is a copy, so
    /// `S[i][j] == S[j][i]` holds exactly. Pairs involving a zero vector score 0,
    /// the diagonal is 1 for every non-zero vector. The result is bit-identical
    /// for identical input order.
    pub fn build(vectors: &[FeatureVector]) -> Self {
        let n = vectors.len();
        let unit: Vec<Option<Vec<(usize, f64)>>> = vectors.iter().map(normalize).collect();
        let mut values = vec![0.0f32; n * n];

        for i in 0..n {
            let Some(left) = &unit[i] else { continue };
            values[i * n + i] = 1.0;

            for j in (i + 1)..n {
                let Some(right) = &unit[j] else { continue };
                let score = sparse_dot(left, right).clamp(0.0, 1.0) as f32;
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        tracing::debug!(dimension = n, "Built similarity matrix");

        Self {
            dimension: n,
            values,
        }
    }

    /// Wraps raw row-major values; `values.len()` must equal `dimension²`
    pub(crate) fn from_raw(dimension: usize, values: Vec<f32>) -> Option<Self> {
        (dimension.checked_mul(dimension) == Some(values.len())).then_some(Self { dimension, values })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.values[row * self.dimension + col]
    }

    pub fn row(&self, row: usize) -> &[f32] {
        let start = row * self.dimension;
        &self.values[start..start + self.dimension]
    }

    pub(crate) fn values(&self) -> &[f32] {
        &self.values
    }
}

fn normalize(vector: &FeatureVector) -> Option<Vec<(usize, f64)>> {
    let norm = vector.norm();
    if norm == 0.0 {
        return None;
    }
    Some(
        vector
            .entries
            .iter()
            .map(|&(idx, weight)| (idx, weight / norm))
            .collect(),
    )
}

/// Merge-join dot product of two index-sorted sparse vectors
fn sparse_dot(left: &[(usize, f64)], right: &[(usize, f64)]) -> f64 {
    let (mut a, mut b) = (0, 0);
    let mut sum = 0.0;
    while a < left.len() && b < right.len() {
        match left[a].0.cmp(&right[b].0) {
            std::cmp::Ordering::Less => a += 1,
            std::cmp::Ordering::Greater => b += 1,
            std::cmp::Ordering::Equal => {
                sum += left[a].1 * right[b].1;
                a += 1;
                b += 1;
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vectorizer::Vectorizer;

    fn matrix_for(corpus: &[&str]) -> SimilarityMatrix {
        let (_, vectors) = Vectorizer::build(corpus).unwrap();
        SimilarityMatrix::build(&vectors)
    }

    #[test]
    fn test_identical_text_scores_one() {
        let matrix = matrix_for(&["Action|Comedy", "Action|Comedy", "Drama"]);
        assert_eq!(matrix.get(0, 1), 1.0);
        assert_eq!(matrix.get(0, 2), 0.0);
    }

    #[test]
    fn test_zero_vector_row_is_all_zero() {
        let matrix = matrix_for(&["the", "Action", "Action|Drama"]);
        assert!(matrix.row(0).iter().all(|&s| s == 0.0));
        assert_eq!(matrix.get(1, 0), 0.0);
        assert_eq!(matrix.get(1, 1), 1.0);
    }

    #[test]
    fn test_partial_overlap_is_between_zero_and_one() {
        let matrix = matrix_for(&["Action|Comedy", "Action", "Comedy", "Documentary"]);
        let score = matrix.get(0, 1);
        assert!(score > 0.0 && score < 1.0);
        assert_eq!(matrix.get(0, 1), matrix.get(0, 2));
        assert_eq!(matrix.get(0, 3), 0.0);
    }

    #[test]
    fn test_from_raw_checks_dimension() {
        assert!(SimilarityMatrix::from_raw(2, vec![1.0, 0.0, 0.0, 1.0]).is_some());
        assert!(SimilarityMatrix::from_raw(2, vec![1.0, 0.0, 0.0]).is_none());
    }

    #[test]
    fn test_sparse_dot_skips_disjoint_terms() {
        let left = vec![(0, 1.0), (2, 2.0)];
        let right = vec![(1, 5.0), (2, 3.0), (4, 1.0)];
        assert_eq!(sparse_dot(&left, &right), 6.0);
    }
}
