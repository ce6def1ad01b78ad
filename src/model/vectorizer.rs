use std::collections::{BTreeSet, HashMap};

use super::ModelError;

/// English stop words removed before building the vocabulary
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together", "too",
    "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up", "upon",
    "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever",
    "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose", "why",
    "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Sparse TF-IDF vector: `(term_index, weight)` pairs sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    pub entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|&(_, w)| w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Weight for a term index, zero when the term is absent
    pub fn weight(&self, term: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term, |&(idx, _)| idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}

/// Frozen vocabulary plus per-term IDF weights
#[derive(Debug, Clone, PartialEq)]
pub struct Vectorizer {
    terms: Vec<String>,
    positions: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Fits the vocabulary over `corpus` and returns it with one vector per document.
    ///
    /// Vocabulary is sorted lexically so identical input always yields identical
    /// term positions. IDF uses smoothing: `ln((1 + N) / (1 + df)) + 1`.
    pub fn build<S: AsRef<str>>(corpus: &[S]) -> Result<(Self, Vec<FeatureVector>), ModelError> {
        if corpus.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = corpus.iter().map(|doc| tokenize(doc.as_ref())).collect();

        let terms: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let positions: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        let mut doc_freq = vec![0usize; terms.len()];
        for tokens in &tokenized {
            let unique: BTreeSet<usize> = tokens.iter().map(|t| positions[t.as_str()]).collect();
            for idx in unique {
                doc_freq[idx] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectorizer = Self {
            terms,
            positions,
            idf,
        };
        let vectors = tokenized
            .iter()
            .map(|tokens| vectorizer.weigh(tokens))
            .collect();

        tracing::debug!(
            documents = corpus.len(),
            vocabulary = vectorizer.terms.len(),
            "Fitted TF-IDF vocabulary"
        );

        Ok((vectorizer, vectors))
    }

    /// Projects new text onto the frozen vocabulary; unknown terms are ignored
    pub fn transform(&self, text: &str) -> FeatureVector {
        self.weigh(&tokenize(text))
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.positions.get(term).map(|&idx| self.idf[idx])
    }

    fn weigh(&self, tokens: &[String]) -> FeatureVector {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(&idx) = self.positions.get(token.as_str()) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf as f64 * self.idf[idx]))
            .collect();
        entries.sort_unstable_by_key(|&(idx, _)| idx);

        FeatureVector { entries }
    }
}

/// Lowercases, splits on non-alphanumeric chars, drops single chars and stop words
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
