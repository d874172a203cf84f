//! Error taxonomy for the corpus pipelines.
//!
//! All variants are fatal to their owning pipeline; nothing here is retried.
//! The orchestrator in `main` reports them per corpus without letting one
//! corpus block the others.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Corpus input path missing or unreadable.
    #[error("corpus source unavailable at {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No token survives minimum-frequency filtering; no model is produced
    /// and no artifact is written.
    #[error("corpus yields no vocabulary with min_word_frequency={min_word_frequency}")]
    EmptyCorpus { min_word_frequency: usize },

    /// Artifact destination not writable. The trained model is still valid
    /// in memory; only persistence failed.
    #[error("failed to persist artifact at {path:?}: {source}")]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact file exists but cannot be parsed. Distinct from a cache
    /// miss: silently retraining over a corrupt file would mask data loss.
    #[error("malformed artifact at {path:?}: {detail}")]
    MalformedArtifact { path: PathBuf, detail: String },
}

impl PipelineError {
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable { path: path.into(), source }
    }

    pub fn persist_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PersistFailure { path: path.into(), source }
    }

    pub fn malformed_artifact(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MalformedArtifact { path: path.into(), detail: detail.into() }
    }

    /// Short kind name for the end-of-run report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => "SourceUnavailable",
            Self::EmptyCorpus { .. } => "EmptyCorpus",
            Self::PersistFailure { .. } => "PersistFailure",
            Self::MalformedArtifact { .. } => "MalformedArtifact",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = PipelineError::EmptyCorpus { min_word_frequency: 5 };
        assert!(err.to_string().contains("min_word_frequency=5"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = PipelineError::source_unavailable("corpa/voynich/manuscript.evt", io);
        assert!(err.to_string().contains("corpa/voynich"));
        assert_eq!(err.kind(), "SourceUnavailable");
    }
}
