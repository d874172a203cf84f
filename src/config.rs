// IMPORTANT:
// Keep ALL numeric values and path conventions centralized here (repo rule:
// no hardcoded numeric values scattered around).

pub mod logging {
    pub const LOG_DIR_REL: &str = "logs";
    pub const LOG_FILE_NAME: &str = "voynich_vectors";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod paths {
    /// Default corpus root, relative to the working directory.
    /// Overridable via the `VOYNICH_CORPA_ROOT` environment variable
    /// (used by the integration tests).
    pub const CORPA_ROOT: &str = "corpa";
    pub const CORPA_ROOT_ENV: &str = "VOYNICH_CORPA_ROOT";

    /// Artifact file name convention: one per corpus, under `<root>/<corpus>/`.
    pub const ARTIFACT_FILE_NAME: &str = "vectors.w2v";

    pub const VOYNICH_MANUSCRIPT_REL: &str = "voynich/manuscript.evt";
    pub const ENGLISH_PRETRAINED_REL: &str = "english/GoogleNews-vectors-negative300.bin";
    pub const ENGLISH_SENTENCES_REL: &str = "english/raw_sentences.txt";
    pub const SPANISH_DIR_REL: &str = "spanish";
}

pub mod corpora {
    pub const VOYNICH: &str = "voynich";
    pub const ENGLISH: &str = "english";
    pub const SPANISH: &str = "spanish";
}

pub mod training {
    // The asymmetry across corpora (iteration counts, layer sizes) is
    // deliberate per-corpus tuning, kept configurable here rather than baked
    // into the trainer.
    pub const MIN_WORD_FREQUENCY: usize = 5;
    pub const SEED: u64 = 42;
    pub const WINDOW: usize = 5;

    pub const VOYNICH_ITERATIONS: usize = 5;
    pub const VOYNICH_DIMS: usize = 300;

    pub const ENGLISH_ITERATIONS: usize = 2;
    pub const ENGLISH_DIMS: usize = 300;

    pub const SPANISH_ITERATIONS: usize = 2;
    pub const SPANISH_DIMS: usize = 100;

    // Skip-gram negative-sampling internals.
    pub const NEGATIVE_SAMPLES: usize = 5;
    pub const UNIGRAM_POWER: f64 = 0.75;
    pub const LEARNING_RATE: f32 = 0.025;
    pub const MIN_LEARNING_RATE: f32 = 1e-4;
}

pub mod report {
    // Probe tokens logged after a successful run as a quick sanity signal.
    pub const VOYNICH_PROBE: &str = "octhey";
    pub const ENGLISH_PROBE: &str = "day";
    pub const NEAREST_COUNT: usize = 10;
}
