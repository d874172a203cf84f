//! Corpus identity, source descriptors, and the per-corpus caching policy.

pub mod loader;
pub mod tokenizer;

use std::path::PathBuf;

/// Where a corpus's raw material lives.
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// One text file, one sentence per line.
    File(PathBuf),
    /// Every file in a directory, concatenated in sorted file-name order.
    Directory(PathBuf),
    /// A pre-trained binary vector file. Never tokenized or trained on;
    /// the artifact store reads it directly as a permanent cache hit.
    PretrainedBinary(PathBuf),
}

/// Explicit caching policy, one row per corpus. The load-vs-train branch is
/// configuration, not code buried in a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusPolicy {
    /// Read the pre-trained binary; no training step exists at all.
    PretrainedBinary,
    /// Consult the text artifact first; on miss, train and persist.
    TrainAndCache,
    /// Caching disabled: always retrain, never persist.
    RetrainAlways,
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub name: &'static str,
    pub source: CorpusSource,
    pub policy: CorpusPolicy,
}

impl Corpus {
    pub fn new(name: &'static str, source: CorpusSource, policy: CorpusPolicy) -> Self {
        Self { name, source, policy }
    }

    pub fn cache_enabled(&self) -> bool {
        !matches!(self.policy, CorpusPolicy::RetrainAlways)
    }
}
