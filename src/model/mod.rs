//! In-memory embedding model: vocabulary tokens mapped to dense vectors of
//! one fixed dimensionality, with cosine-similarity lookups.

pub mod trainer;

use std::collections::HashMap;

use anyhow::bail;

#[derive(Debug)]
pub struct EmbeddingModel {
    dims: usize,
    tokens: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingModel {
    /// Assemble a model from (token, vector) entries. Rejects duplicate
    /// tokens and vectors whose length disagrees with `dims` — a model is
    /// either fully consistent or not constructed at all.
    pub fn from_entries(dims: usize, entries: Vec<(String, Vec<f32>)>) -> anyhow::Result<Self> {
        let mut tokens = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len());

        for (token, vector) in entries {
            if vector.len() != dims {
                bail!("token '{token}' has {} components, expected {dims}", vector.len());
            }
            if index.insert(token.clone(), tokens.len()).is_some() {
                bail!("duplicate token '{token}'");
            }
            tokens.push(token);
            vectors.push(vector);
        }

        Ok(Self { dims, tokens, index, vectors })
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn vector(&self, token: &str) -> Option<&[f32]> {
        self.index.get(token).map(|&i| self.vectors[i].as_slice())
    }

    /// Vocabulary-order iteration, used for artifact serialization.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.tokens
            .iter()
            .zip(self.vectors.iter())
            .map(|(t, v)| (t.as_str(), v.as_slice()))
    }

    /// Cosine similarity between two vocabulary tokens, `None` if either is
    /// out of vocabulary.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        Some(cosine(self.vector(a)?, self.vector(b)?))
    }

    /// The `count` nearest vocabulary tokens to `token` by cosine similarity,
    /// most similar first, excluding the query token itself. Linear scan over
    /// the vocabulary.
    pub fn nearest(&self, token: &str, count: usize) -> Vec<(String, f32)> {
        let Some(query) = self.vector(token) else {
            return Vec::new();
        };

        let mut scored: Vec<(String, f32)> = self
            .iter()
            .filter(|(t, _)| *t != token)
            .map(|(t, v)| (t.to_string(), cosine(query, v)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(count);
        scored
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> EmbeddingModel {
        EmbeddingModel::from_entries(
            2,
            vec![
                ("east".to_string(), vec![1.0, 0.0]),
                ("northeast".to_string(), vec![1.0, 1.0]),
                ("north".to_string(), vec![0.0, 1.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_and_len() {
        let m = model();
        assert_eq!(m.len(), 3);
        assert_eq!(m.dims(), 2);
        assert!(m.contains("east"));
        assert!(!m.contains("west"));
        assert_eq!(m.vector("north"), Some([0.0, 1.0].as_slice()));
    }

    #[test]
    fn test_rejects_duplicate_tokens() {
        let err = EmbeddingModel::from_entries(
            1,
            vec![("a".to_string(), vec![0.1]), ("a".to_string(), vec![0.2])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let err =
            EmbeddingModel::from_entries(3, vec![("a".to_string(), vec![0.1, 0.2])]).unwrap_err();
        assert!(err.to_string().contains("expected 3"));
    }

    #[test]
    fn test_similarity_is_cosine() {
        let m = model();
        assert!((m.similarity("east", "east").unwrap() - 1.0).abs() < 1e-6);
        assert!(m.similarity("east", "north").unwrap().abs() < 1e-6);
        assert_eq!(m.similarity("east", "west"), None);
    }

    #[test]
    fn test_nearest_orders_by_similarity_and_excludes_query() {
        let m = model();
        let near = m.nearest("east", 2);
        assert_eq!(near.len(), 2);
        assert_eq!(near[0].0, "northeast");
        assert_eq!(near[1].0, "north");

        assert!(m.nearest("west", 3).is_empty());
    }
}
