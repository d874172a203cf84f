//! End-to-end runs of the binary over a temp corpus tree.
//!
//! The corpus root is supplied via VOYNICH_CORPA_ROOT; the working directory
//! is a temp dir so log output lands there too.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn write(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// A corpus tree the default policy table can run to completion: a Voynich
/// manuscript file, a tiny conformant pre-trained English binary, and a
/// Spanish directory. Every token appears at least five times to survive the
/// default minimum-frequency filter.
fn seed_corpa_root(root: &Path) {
    let manuscript: String = "daiin qokeedy shedy chol okaiin daiin qokeedy shedy chol okaiin\n".repeat(6);
    write(&root.join("voynich/manuscript.evt"), &manuscript);

    let bin_path = root.join("english/GoogleNews-vectors-negative300.bin");
    std::fs::create_dir_all(bin_path.parent().unwrap()).unwrap();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"2 3\n");
    for (token, vector) in [("day", [0.1f32, 0.2, 0.3]), ("night", [0.3, 0.2, 0.1])] {
        bytes.extend_from_slice(token.as_bytes());
        bytes.push(b' ');
        for v in vector {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.push(b'\n');
    }
    std::fs::write(&bin_path, bytes).unwrap();

    let spanish: String = "uno dos tres cuatro cinco uno dos tres cuatro cinco\n".repeat(6);
    write(&root.join("spanish/parte_a.txt"), &spanish);
    write(&root.join("spanish/parte_b.txt"), &spanish);
}

fn run_in(dir: &Path, root: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("voynich_vectors")
        .unwrap()
        .current_dir(dir)
        .env("VOYNICH_CORPA_ROOT", root)
        .assert()
}

#[test]
fn full_run_trains_voynich_and_reuses_it_on_the_second_pass() {
    let work = tempfile::tempdir().unwrap();
    let root = work.path().join("corpa");
    seed_corpa_root(&root);

    run_in(work.path(), &root)
        .success()
        .stderr(predicate::str::contains("corpus 'voynich': OK"))
        .stderr(predicate::str::contains("corpus 'english': OK"))
        .stderr(predicate::str::contains("corpus 'spanish': OK"));

    let artifact = root.join("voynich/vectors.w2v");
    assert!(artifact.is_file(), "voynich artifact must be persisted");
    // Spanish caching is disabled: nothing persisted.
    assert!(!root.join("spanish/vectors.w2v").exists());

    let first_bytes = std::fs::read(&artifact).unwrap();

    // Second pass: the artifact satisfies the pipeline byte-for-byte.
    run_in(work.path(), &root)
        .success()
        .stderr(predicate::str::contains("pipeline 'voynich': cache hit"));
    assert_eq!(std::fs::read(&artifact).unwrap(), first_bytes);
}

#[test]
fn missing_corpus_root_fails_with_report() {
    let work = tempfile::tempdir().unwrap();
    let root = work.path().join("nowhere");

    run_in(work.path(), &root)
        .failure()
        .stderr(predicate::str::contains("SourceUnavailable"))
        .stderr(predicate::str::contains("did not complete cleanly"));
}
