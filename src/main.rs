use std::path::{Path, PathBuf};

use anyhow::bail;

use voynich_vectors::config;
use voynich_vectors::corpus::{Corpus, CorpusPolicy, CorpusSource};
use voynich_vectors::logging;
use voynich_vectors::model::trainer::TrainingConfig;
use voynich_vectors::model::EmbeddingModel;
use voynich_vectors::pipeline::{CorpusPipeline, ModelOrigin};
use voynich_vectors::store::ArtifactStore;

fn main() {
    if let Err(e) = real_main() {
        // Keep stderr noisy; logs also go to file.
        eprintln!("[voynich-vectors] fatal error: {e:?}");
        log::error!("Fatal error: {:?}", e);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    logging::init_logging()?;

    let root = corpa_root();
    log::info!("corpus root: {}", root.display());

    let pipelines = build_pipelines(&root)?;

    // Run sequentially, but let one corpus fail without blocking the others.
    let mut failures = 0usize;
    for pipeline in &pipelines {
        let name = pipeline.corpus_name();
        match pipeline.run() {
            Ok(outcome) => {
                let origin = match outcome.origin {
                    ModelOrigin::CacheHit => "cache hit",
                    ModelOrigin::Trained => "trained",
                };
                log::info!(
                    "corpus '{}': OK ({origin}, {} tokens, {} dims)",
                    name,
                    outcome.model.len(),
                    outcome.model.dims()
                );
                if let Some(e) = outcome.persist_error {
                    log::warn!("corpus '{}': model usable but not persisted ({})", name, e.kind());
                    failures += 1;
                }
                log_probe_neighbors(name, &outcome.model);
            }
            Err(e) => {
                log::error!("corpus '{}': FAILED ({}): {e}", name, e.kind());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} corpora did not complete cleanly", pipelines.len());
    }
    Ok(())
}

fn corpa_root() -> PathBuf {
    std::env::var(config::paths::CORPA_ROOT_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::paths::CORPA_ROOT))
}

/// The per-corpus policy table. The English train-and-cache alternate mode
/// exists and is exercised by tests; the default run reads the pre-trained
/// binary and skips training entirely.
fn build_pipelines(root: &Path) -> anyhow::Result<Vec<CorpusPipeline>> {
    use config::{corpora, paths, training};

    let voynich = CorpusPipeline::new(
        Corpus::new(
            corpora::VOYNICH,
            CorpusSource::File(root.join(paths::VOYNICH_MANUSCRIPT_REL)),
            CorpusPolicy::TrainAndCache,
        ),
        TrainingConfig::new(
            training::MIN_WORD_FREQUENCY,
            training::VOYNICH_ITERATIONS,
            training::VOYNICH_DIMS,
            training::SEED,
            training::WINDOW,
        )?,
        ArtifactStore::new(root),
    );

    let english = CorpusPipeline::new(
        Corpus::new(
            corpora::ENGLISH,
            CorpusSource::PretrainedBinary(root.join(paths::ENGLISH_PRETRAINED_REL)),
            CorpusPolicy::PretrainedBinary,
        ),
        TrainingConfig::new(
            training::MIN_WORD_FREQUENCY,
            training::ENGLISH_ITERATIONS,
            training::ENGLISH_DIMS,
            training::SEED,
            training::WINDOW,
        )?,
        ArtifactStore::new(root),
    );

    let spanish = CorpusPipeline::new(
        Corpus::new(
            corpora::SPANISH,
            CorpusSource::Directory(root.join(paths::SPANISH_DIR_REL)),
            CorpusPolicy::RetrainAlways,
        ),
        TrainingConfig::new(
            training::MIN_WORD_FREQUENCY,
            training::SPANISH_ITERATIONS,
            training::SPANISH_DIMS,
            training::SEED,
            training::WINDOW,
        )?,
        ArtifactStore::new(root),
    );

    Ok(vec![voynich, english, spanish])
}

/// Log the nearest neighbors of a probe token as a quick sanity signal on
/// the freshly acquired model.
fn log_probe_neighbors(corpus_name: &str, model: &EmbeddingModel) {
    let probe = match corpus_name {
        config::corpora::VOYNICH => config::report::VOYNICH_PROBE,
        config::corpora::ENGLISH => config::report::ENGLISH_PROBE,
        _ => return,
    };
    if !model.contains(probe) {
        log::debug!("probe token '{probe}' not in '{corpus_name}' vocabulary");
        return;
    }
    let neighbors: Vec<String> = model
        .nearest(probe, config::report::NEAREST_COUNT)
        .into_iter()
        .map(|(token, score)| format!("{token} ({score:.3})"))
        .collect();
    log::info!("'{corpus_name}' nearest to '{probe}': [{}]", neighbors.join(", "));
}
