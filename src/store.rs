//! Artifact persistence: the text vector format we read and write, plus a
//! read-only reader for the pre-trained word2vec binary format.
//!
//! Path convention: one artifact per corpus at `<root>/<corpus>/vectors.w2v`,
//! overwritten wholesale on retrain. Presence of a readable artifact is the
//! sole cache-hit signal; no checksum or version metadata is consulted.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::PipelineError;
use crate::model::EmbeddingModel;

pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Root path is injected so tests can point the store anywhere.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn artifact_path(&self, corpus_name: &str) -> PathBuf {
        self.root.join(corpus_name).join(config::paths::ARTIFACT_FILE_NAME)
    }

    /// Load the cached text artifact for a corpus, if one exists.
    ///
    /// An absent file is the expected miss path and returns `Ok(None)`. A
    /// file that exists but cannot be opened or parsed is an error — not a
    /// miss — so a corrupt artifact is never silently retrained over.
    pub fn try_load(&self, corpus_name: &str) -> Result<Option<EmbeddingModel>, PipelineError> {
        let path = self.artifact_path(corpus_name);
        if !path.exists() {
            log::debug!("no artifact at {}, cache miss", path.display());
            return Ok(None);
        }
        load_text_vectors(&path).map(Some)
    }

    /// Persist a model as the corpus's text artifact, replacing any previous
    /// one. On failure the model is untouched in memory; only persistence
    /// failed.
    pub fn save(&self, corpus_name: &str, model: &EmbeddingModel) -> Result<(), PipelineError> {
        let path = self.artifact_path(corpus_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PipelineError::persist_failure(parent, e))?;
        }

        let file = File::create(&path).map_err(|e| PipelineError::persist_failure(&path, e))?;
        let mut writer = BufWriter::new(file);
        write_text_vectors(&mut writer, model)
            .and_then(|_| writer.flush())
            .map_err(|e| PipelineError::persist_failure(&path, e))?;

        log::info!(
            "wrote artifact {} ({} tokens, {} dims)",
            path.display(),
            model.len(),
            model.dims()
        );
        Ok(())
    }

    /// Read a pre-trained binary vector file. This format is consumed
    /// read-only; the store never writes it.
    pub fn load_pretrained(&self, path: &Path) -> Result<EmbeddingModel, PipelineError> {
        load_binary_vectors(path)
    }
}

/// One line per token: the token followed by its components, whitespace
/// separated. Rust's float formatting is shortest-round-trip, so values
/// survive load→save→load exactly.
fn write_text_vectors(writer: &mut impl Write, model: &EmbeddingModel) -> std::io::Result<()> {
    for (token, vector) in model.iter() {
        write!(writer, "{token}")?;
        for component in vector {
            write!(writer, " {component}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn load_text_vectors(path: &Path) -> Result<EmbeddingModel, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
    let reader = BufReader::new(file);

    let mut dims: Option<usize> = None;
    let mut entries: Vec<(String, Vec<f32>)> = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| PipelineError::source_unavailable(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let token = fields.next().unwrap_or_default().to_string();
        let vector: Vec<f32> = fields
            .map(|f| {
                f.parse::<f32>().map_err(|_| {
                    PipelineError::malformed_artifact(
                        path,
                        format!("line {}: bad float '{f}'", line_no + 1),
                    )
                })
            })
            .collect::<Result<_, _>>()?;

        if vector.is_empty() {
            return Err(PipelineError::malformed_artifact(
                path,
                format!("line {}: token without components", line_no + 1),
            ));
        }

        let expected = *dims.get_or_insert(vector.len());
        if vector.len() != expected {
            return Err(PipelineError::malformed_artifact(
                path,
                format!("line {}: expected {expected} components, got {}", line_no + 1, vector.len()),
            ));
        }
        entries.push((token, vector));
    }

    let dims = dims
        .ok_or_else(|| PipelineError::malformed_artifact(path, "artifact holds no vectors"))?;
    let model = EmbeddingModel::from_entries(dims, entries)
        .map_err(|e| PipelineError::malformed_artifact(path, e.to_string()))?;

    log::info!(
        "loaded artifact {} ({} tokens, {} dims)",
        path.display(),
        model.len(),
        model.dims()
    );
    Ok(model)
}

/// word2vec binary format: an ASCII header line "vocab_size dims", then per
/// entry a space-terminated token followed by dims little-endian f32s, each
/// entry optionally preceded by a newline.
fn load_binary_vectors(path: &Path) -> Result<EmbeddingModel, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
    let mut reader = BufReader::new(file);

    let mut header = String::new();
    reader
        .read_line(&mut header)
        .map_err(|e| PipelineError::source_unavailable(path, e))?;
    let mut fields = header.split_whitespace();
    let vocab_size: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| PipelineError::malformed_artifact(path, "bad header vocab size"))?;
    let dims: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| PipelineError::malformed_artifact(path, "bad header dimensionality"))?;

    let mut entries = Vec::with_capacity(vocab_size);
    let mut float_buf = vec![0u8; dims * 4];

    for i in 0..vocab_size {
        let token = read_binary_token(&mut reader)
            .map_err(|e| PipelineError::source_unavailable(path, e))?
            .ok_or_else(|| {
                PipelineError::malformed_artifact(
                    path,
                    format!("unexpected end of file at entry {i} of {vocab_size}"),
                )
            })?;

        reader.read_exact(&mut float_buf).map_err(|e| {
            PipelineError::malformed_artifact(path, format!("truncated vector for '{token}': {e}"))
        })?;
        let vector: Vec<f32> = float_buf
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        entries.push((token, vector));
    }

    let model = EmbeddingModel::from_entries(dims, entries)
        .map_err(|e| PipelineError::malformed_artifact(path, e.to_string()))?;

    log::info!(
        "loaded pre-trained vectors {} ({} tokens, {} dims)",
        path.display(),
        model.len(),
        model.dims()
    );
    Ok(model)
}

/// Read one space-terminated token, skipping leading newlines. `None` on a
/// clean end of file.
fn read_binary_token(reader: &mut impl Read) -> std::io::Result<Option<String>> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte)? {
            0 => {
                return if bytes.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
                };
            }
            _ => match byte[0] {
                b' ' => return Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
                b'\n' if bytes.is_empty() => continue,
                other => bytes.push(other),
            },
        }
    }
}
