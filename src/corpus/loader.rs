//! Line iterators over corpus sources.
//!
//! A `LineIter` is lazy, finite, and cheap to recreate: callers that need a
//! restartable sequence construct a fresh iterator per pass. Directory
//! sources concatenate their files in sorted file-name order so ingestion is
//! stable across platforms (directory-listing order is not).

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

#[derive(Debug)]
pub struct LineIter {
    pending: VecDeque<PathBuf>,
    current: Option<Lines<BufReader<File>>>,
}

impl LineIter {
    /// One line per physical line of a single file.
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let file = File::open(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
        Ok(Self {
            pending: VecDeque::new(),
            current: Some(BufReader::new(file).lines()),
        })
    }

    /// Concatenation of every regular file in `dir`, file names sorted.
    pub fn from_dir(dir: &Path) -> Result<Self, PipelineError> {
        let entries =
            std::fs::read_dir(dir).map_err(|e| PipelineError::source_unavailable(dir, e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        log::debug!("corpus directory {} holds {} files", dir.display(), files.len());

        Ok(Self {
            pending: files.into(),
            current: None,
        })
    }
}

impl Iterator for LineIter {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(lines) = self.current.as_mut() {
                match lines.next() {
                    Some(line) => return Some(line),
                    None => self.current = None,
                }
            }
            let path = self.pending.pop_front()?;
            match File::open(&path) {
                Ok(f) => self.current = Some(BufReader::new(f).lines()),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_file_source_yields_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.txt", "uno\ndos\ntres\n");

        let lines: Vec<String> = LineIter::from_file(&path).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["uno", "dos", "tres"]);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = LineIter::from_file(Path::new("no/such/file.txt")).unwrap_err();
        assert_eq!(err.kind(), "SourceUnavailable");
    }

    #[test]
    fn test_dir_source_concatenates_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        // Created out of order on purpose; iteration must still be sorted.
        write_file(dir.path(), "b.txt", "three\nfour\n");
        write_file(dir.path(), "a.txt", "one\ntwo\n");

        let lines: Vec<String> =
            LineIter::from_dir(dir.path()).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_empty_dir_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LineIter::from_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_line_iter_is_debuggable() {
        // unwrap_err on Result<LineIter, _> in callers needs Debug here.
        let dir = tempfile::tempdir().unwrap();
        let iter = LineIter::from_dir(dir.path()).unwrap();
        assert!(!format!("{iter:?}").is_empty());
    }

    #[test]
    fn test_iterator_is_restartable() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "a.txt", "same\nlines\n");

        let first: Vec<String> = LineIter::from_file(&path).unwrap().map(|l| l.unwrap()).collect();
        let second: Vec<String> = LineIter::from_file(&path).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(first, second);
    }
}
