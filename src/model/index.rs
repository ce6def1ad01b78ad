use std::collections::HashMap;

use super::ModelError;

/// Bijective mapping between external identifiers (titles) and matrix rows
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierIndex {
    identifiers: Vec<String>,
    rows: HashMap<String, usize>,
}

impl IdentifierIndex {
    /// Builds the index in row order. Identifiers must be unique.
    pub fn new(identifiers: Vec<String>) -> Result<Self, ModelError> {
        let mut rows = HashMap::with_capacity(identifiers.len());
        for (row, identifier) in identifiers.iter().enumerate() {
            if rows.insert(identifier.clone(), row).is_some() {
                return Err(ModelError::DuplicateIdentifier(identifier.clone()));
            }
        }
        Ok(Self { identifiers, rows })
    }

    pub fn row_of(&self, identifier: &str) -> Option<usize> {
        self.rows.get(identifier).copied()
    }

    pub fn identifier(&self, row: usize) -> Option<&str> {
        self.identifiers.get(row).map(String::as_str)
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_input_order() {
        let index = IdentifierIndex::new(vec!["Heat (1995)".into(), "Up (2009)".into()]).unwrap();
        assert_eq!(index.row_of("Up (2009)"), Some(1));
        assert_eq!(index.identifier(0), Some("Heat (1995)"));
        assert_eq!(index.row_of("Jaws (1975)"), None);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let index = IdentifierIndex::new(vec!["Heat (1995)".into()]).unwrap();
        assert_eq!(index.row_of("heat (1995)"), None);
    }

    #[test]
    fn test_duplicate_identifier_is_rejected() {
        let result = IdentifierIndex::new(vec!["Emma (1996)".into(), "Emma (1996)".into()]);
        assert!(matches!(result, Err(ModelError::DuplicateIdentifier(t)) if t == "Emma (1996)"));
    }
}
