//! Per-corpus orchestration: consult the artifact store first, and on a miss
//! drive load → tokenize → train → persist.
//!
//! Each pipeline owns its corpus, config, and store handle and runs once per
//! process invocation. There is no retry anywhere: a failed corpus is
//! reported and must be re-invoked externally. Pipelines share no mutable
//! state and write disjoint artifact paths, so nothing here prevents running
//! them concurrently, even though `main` runs them sequentially.

use crate::corpus::loader::LineIter;
use crate::corpus::tokenizer::tokenize_line;
use crate::corpus::{Corpus, CorpusPolicy, CorpusSource};
use crate::error::PipelineError;
use crate::model::trainer::{self, TrainingConfig};
use crate::model::EmbeddingModel;
use crate::store::ArtifactStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelOrigin {
    CacheHit,
    Trained,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub model: EmbeddingModel,
    pub origin: ModelOrigin,
    /// Persistence failure does not invalidate a successfully trained model:
    /// the model is returned alongside the error instead of being dropped.
    pub persist_error: Option<PipelineError>,
}

pub struct CorpusPipeline {
    corpus: Corpus,
    config: TrainingConfig,
    store: ArtifactStore,
}

impl CorpusPipeline {
    pub fn new(corpus: Corpus, config: TrainingConfig, store: ArtifactStore) -> Self {
        Self { corpus, config, store }
    }

    pub fn corpus_name(&self) -> &'static str {
        self.corpus.name
    }

    pub fn run(&self) -> Result<PipelineOutcome, PipelineError> {
        log::info!("pipeline '{}' starting ({:?})", self.corpus.name, self.corpus.policy);

        match self.corpus.policy {
            // A pre-trained binary is a permanent cache hit; there is no
            // training step to fall back to.
            CorpusPolicy::PretrainedBinary => {
                let CorpusSource::PretrainedBinary(path) = &self.corpus.source else {
                    return Err(PipelineError::source_unavailable(
                        self.corpus.name,
                        std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "pretrained policy requires a pretrained binary source",
                        ),
                    ));
                };
                let model = self.store.load_pretrained(path)?;
                Ok(PipelineOutcome { model, origin: ModelOrigin::CacheHit, persist_error: None })
            }

            CorpusPolicy::TrainAndCache => {
                if let Some(model) = self.store.try_load(self.corpus.name)? {
                    log::info!("pipeline '{}': cache hit", self.corpus.name);
                    return Ok(PipelineOutcome {
                        model,
                        origin: ModelOrigin::CacheHit,
                        persist_error: None,
                    });
                }

                let model = self.train_fresh()?;
                let persist_error = match self.store.save(self.corpus.name, &model) {
                    Ok(()) => None,
                    Err(e) => {
                        log::error!("pipeline '{}': persist failed: {e}", self.corpus.name);
                        Some(e)
                    }
                };
                Ok(PipelineOutcome { model, origin: ModelOrigin::Trained, persist_error })
            }

            // Caching disabled for this corpus: never consult the store,
            // never write to it.
            CorpusPolicy::RetrainAlways => {
                let model = self.train_fresh()?;
                Ok(PipelineOutcome { model, origin: ModelOrigin::Trained, persist_error: None })
            }
        }
    }

    fn train_fresh(&self) -> Result<EmbeddingModel, PipelineError> {
        let sentences = self.load_sentences()?;
        log::info!(
            "pipeline '{}': {} sentences loaded, training...",
            self.corpus.name,
            sentences.len()
        );
        trainer::train(sentences, &self.config)
    }

    /// Ingest and tokenize the corpus source. Directory sources are merged
    /// into one sentence stream here, before any vocabulary work.
    fn load_sentences(&self) -> Result<Vec<Vec<String>>, PipelineError> {
        let (lines, source_path) = match &self.corpus.source {
            CorpusSource::File(path) => (LineIter::from_file(path)?, path),
            CorpusSource::Directory(path) => (LineIter::from_dir(path)?, path),
            CorpusSource::PretrainedBinary(path) => {
                // Unreachable through the policy table; kept as a hard error
                // rather than a silent empty corpus.
                return Err(PipelineError::source_unavailable(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "pretrained binary sources are not tokenizable",
                    ),
                ));
            }
        };

        let mut sentences = Vec::new();
        for line in lines {
            let line = line.map_err(|e| PipelineError::source_unavailable(source_path, e))?;
            let tokens = tokenize_line(&line);
            if !tokens.is_empty() {
                sentences.push(tokens);
            }
        }
        Ok(sentences)
    }
}
