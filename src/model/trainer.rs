//! Skip-gram negative-sampling trainer.
//!
//! Single-threaded on purpose: with a fixed seed and fixed input order the
//! whole fit is reproducible run to run, which the cache-vs-retrain design
//! relies on for sanity checking. Directory corpora must be concatenated into
//! one sentence stream *before* calling [`train`]; vocabulary and weights are
//! computed over the merged stream, never per file.

use std::collections::HashMap;

use anyhow::ensure;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::training;
use crate::error::PipelineError;
use crate::model::EmbeddingModel;

/// Immutable training parameters, validated at construction. One instance
/// per corpus pipeline.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub min_word_frequency: usize,
    pub iterations: usize,
    pub dims: usize,
    pub seed: u64,
    pub window: usize,
}

impl TrainingConfig {
    pub fn new(
        min_word_frequency: usize,
        iterations: usize,
        dims: usize,
        seed: u64,
        window: usize,
    ) -> anyhow::Result<Self> {
        ensure!(iterations >= 1, "iterations must be >= 1, got {iterations}");
        ensure!(dims >= 1, "dims must be >= 1, got {dims}");
        ensure!(window >= 1, "window must be >= 1, got {window}");
        Ok(Self { min_word_frequency, iterations, dims, seed, window })
    }
}

/// Fit an embedding model over the given sentence stream.
///
/// Tokens occurring strictly fewer than `min_word_frequency` times across the
/// whole stream are excluded from the vocabulary. Fails with `EmptyCorpus`
/// when nothing survives the filter.
pub fn train(
    sentences: impl IntoIterator<Item = Vec<String>>,
    config: &TrainingConfig,
) -> Result<EmbeddingModel, PipelineError> {
    let sentences: Vec<Vec<String>> = sentences.into_iter().collect();

    // Vocabulary pass: count, filter, order by (frequency desc, token asc)
    // so vocabulary indices are deterministic.
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for sentence in &sentences {
        for token in sentence {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut vocab: Vec<(&str, usize)> = counts
        .iter()
        .map(|(&token, &count)| (token, count))
        .filter(|&(_, count)| count >= config.min_word_frequency)
        .collect();
    vocab.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if vocab.is_empty() {
        return Err(PipelineError::EmptyCorpus {
            min_word_frequency: config.min_word_frequency,
        });
    }

    let index: HashMap<&str, usize> =
        vocab.iter().enumerate().map(|(i, &(token, _))| (token, i)).collect();

    // Map sentences to vocabulary ids, dropping filtered tokens.
    let encoded: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| s.iter().filter_map(|t| index.get(t.as_str()).copied()).collect())
        .collect();
    let total_tokens: usize = encoded.iter().map(|s| s.len()).sum();

    log::debug!(
        "training: vocab={}, tokens={}, dims={}, iterations={}",
        vocab.len(),
        total_tokens,
        config.dims,
        config.iterations
    );

    let negatives = NegativeTable::new(&vocab);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let dims = config.dims;

    // syn0 = input vectors (the model output), syn1 = output weights.
    let mut syn0: Vec<Vec<f32>> = (0..vocab.len())
        .map(|_| (0..dims).map(|_| (rng.gen::<f32>() - 0.5) / dims as f32).collect())
        .collect();
    let mut syn1: Vec<Vec<f32>> = vec![vec![0.0; dims]; vocab.len()];

    let schedule_total = (config.iterations * total_tokens).max(1) as f32;
    let mut processed = 0usize;

    for _ in 0..config.iterations {
        for sentence in &encoded {
            for (pos, &center) in sentence.iter().enumerate() {
                processed += 1;
                let alpha = (training::LEARNING_RATE
                    * (1.0 - processed as f32 / schedule_total))
                    .max(training::MIN_LEARNING_RATE);

                // Dynamic window shrink, as in the classic implementation.
                let span = config.window - rng.gen_range(0..config.window);
                let lo = pos.saturating_sub(span);
                let hi = (pos + span).min(sentence.len() - 1);

                for ctx_pos in lo..=hi {
                    if ctx_pos == pos {
                        continue;
                    }
                    let positive = sentence[ctx_pos];

                    let mut err = vec![0.0f32; dims];
                    let center_vec = &syn0[center];
                    for k in 0..=training::NEGATIVE_SAMPLES {
                        let (target, label) = if k == 0 {
                            (positive, 1.0f32)
                        } else {
                            let sampled = negatives.sample(&mut rng);
                            if sampled == positive {
                                continue;
                            }
                            (sampled, 0.0f32)
                        };

                        let out = &mut syn1[target];
                        let mut dot = 0.0f32;
                        for d in 0..dims {
                            dot += center_vec[d] * out[d];
                        }
                        let gradient = (label - sigmoid(dot)) * alpha;
                        for d in 0..dims {
                            err[d] += gradient * out[d];
                            out[d] += gradient * center_vec[d];
                        }
                    }

                    let center_vec = &mut syn0[center];
                    for d in 0..dims {
                        center_vec[d] += err[d];
                    }
                }
            }
        }
    }

    let tokens: Vec<String> = vocab.iter().map(|&(token, _)| token.to_string()).collect();
    let index: HashMap<String, usize> =
        tokens.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();

    Ok(EmbeddingModel { dims, tokens, index, vectors: syn0 })
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Unigram^0.75 sampling table, cumulative form.
struct NegativeTable {
    cumulative: Vec<f64>,
    total: f64,
}

impl NegativeTable {
    fn new(vocab: &[(&str, usize)]) -> Self {
        let mut cumulative = Vec::with_capacity(vocab.len());
        let mut total = 0.0f64;
        for &(_, count) in vocab {
            total += (count as f64).powf(training::UNIGRAM_POWER);
            cumulative.push(total);
        }
        Self { cumulative, total }
    }

    fn sample(&self, rng: &mut StdRng) -> usize {
        let x = rng.gen::<f64>() * self.total;
        self.cumulative
            .partition_point(|&c| c <= x)
            .min(self.cumulative.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<Vec<String>> {
        text.lines()
            .map(|l| l.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn config(min_freq: usize) -> TrainingConfig {
        TrainingConfig::new(min_freq, 2, 16, 42, 5).unwrap()
    }

    #[test]
    fn test_config_rejects_zero_parameters() {
        assert!(TrainingConfig::new(5, 0, 16, 42, 5).is_err());
        assert!(TrainingConfig::new(5, 2, 0, 42, 5).is_err());
        assert!(TrainingConfig::new(5, 2, 16, 42, 0).is_err());
        // min_word_frequency of zero is valid: nothing gets filtered.
        assert!(TrainingConfig::new(0, 1, 1, 0, 1).is_ok());
    }

    #[test]
    fn test_min_frequency_filter() {
        let text = "cat dog cat dog cat\ncat dog bird\n";
        let model = train(sentences(text), &config(2)).unwrap();
        assert!(model.contains("cat"));
        assert!(model.contains("dog"));
        assert!(!model.contains("bird"));
    }

    #[test]
    fn test_empty_corpus_when_everything_filtered() {
        let err = train(sentences("lonely\n"), &config(5)).unwrap_err();
        match err {
            PipelineError::EmptyCorpus { min_word_frequency } => {
                assert_eq!(min_word_frequency, 5)
            }
            other => panic!("expected EmptyCorpus, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_empty_corpus() {
        let err = train(Vec::<Vec<String>>::new(), &config(0)).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyCorpus { .. }));
    }

    #[test]
    fn test_training_is_deterministic() {
        let text = "the quick brown fox jumps over the lazy dog\n\
                    the slow brown dog naps under the quick fox\n";
        let cfg = config(1);
        let a = train(sentences(text), &cfg).unwrap();
        let b = train(sentences(text), &cfg).unwrap();

        assert_eq!(a.len(), b.len());
        for (token, vector) in a.iter() {
            assert_eq!(Some(vector), b.vector(token), "vector mismatch for '{token}'");
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let text = "alpha beta gamma alpha beta gamma alpha beta\n";
        let a = train(sentences(text), &TrainingConfig::new(1, 2, 16, 1, 5).unwrap()).unwrap();
        let b = train(sentences(text), &TrainingConfig::new(1, 2, 16, 2, 5).unwrap()).unwrap();
        assert_ne!(a.vector("alpha"), b.vector("alpha"));
    }

    #[test]
    fn test_model_dimensionality_matches_config() {
        let model = train(sentences("a b a b a b\n"), &config(1)).unwrap();
        assert_eq!(model.dims(), 16);
        assert_eq!(model.vector("a").unwrap().len(), 16);
    }
}
