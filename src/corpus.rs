//! Corpus discovery and row-by-offset file access.
//!
//! [`DocIdMap`] assigns a sequential document id to every regular file
//! found by a recursive traversal of the corpus root, and resolves a
//! `(doc id, byte offset)` posting back to the raw text of that row.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{CinedexError, Result};
use crate::hashtable::HashTable;

/// Initial bucket count for the file table.
const MAP_BUCKETS: usize = 64;

/// Mapping from document id to corpus file path.
///
/// Ids are assigned sequentially from 1 in traversal order: directory
/// entries are processed in name order, directories recursed into,
/// regular files added. The map is built once before serving begins and
/// is read-only afterwards.
#[derive(Debug)]
pub struct DocIdMap {
    files: HashTable<PathBuf>,
    next_id: u64,
}

impl DocIdMap {
    /// Create an empty map.
    pub fn new() -> Result<Self> {
        Ok(DocIdMap {
            files: HashTable::with_buckets(MAP_BUCKETS)?,
            next_id: 1,
        })
    }

    /// Recursively add every regular file under `root`.
    ///
    /// `root` may itself be a regular file, in which case it is added
    /// directly.
    pub fn crawl(&mut self, root: &Path) -> Result<()> {
        if !root.is_dir() {
            self.add_file(root.to_path_buf());
            return Ok(());
        }
        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in root.read_dir()? {
            entries.push(entry?.path());
        }
        entries.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));
        for path in entries {
            if path.is_dir() {
                self.crawl(&path)?;
            } else {
                self.add_file(path);
            }
        }
        Ok(())
    }

    fn add_file(&mut self, path: PathBuf) {
        debug!("added {} to doc id map", path.display());
        self.files.put(self.next_id, path);
        self.next_id += 1;
    }

    /// Number of files in the map.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True if the map holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path of the file with the given document id.
    pub fn path_for(&self, doc_id: u64) -> Option<&PathBuf> {
        self.files.lookup(doc_id)
    }

    /// Iterate over all `(doc id, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &PathBuf)> {
        self.files.iter()
    }

    /// Read back the row starting at `offset` in the file with document id
    /// `doc_id`, without its line terminator.
    pub fn row_text(&self, doc_id: u64, offset: u64) -> Result<String> {
        let path = self
            .path_for(doc_id)
            .ok_or_else(|| CinedexError::corpus(format!("unknown document id {doc_id}")))?;
        let mut reader = BufReader::new(File::open(path)?);
        reader.seek(SeekFrom::Start(offset))?;
        let mut row = String::new();
        let read = reader.read_line(&mut row)?;
        if read == 0 {
            return Err(CinedexError::corpus(format!(
                "offset {offset} is past the end of {}",
                path.display()
            )));
        }
        while row.ends_with('\n') || row.ends_with('\r') {
            row.pop();
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use tempfile::TempDir;

    #[test]
    fn test_crawl_counts_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one\n").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), "two\n").unwrap();

        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_crawl_assigns_ids_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("c.txt"), "").unwrap();

        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();

        assert!(docs.path_for(1).unwrap().ends_with("a.txt"));
        assert!(docs.path_for(2).unwrap().ends_with("b.txt"));
        assert!(docs.path_for(3).unwrap().ends_with("c.txt"));
    }

    #[test]
    fn test_crawl_empty_directory() {
        let dir = TempDir::new().unwrap();
        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_row_text_by_offset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rows.txt"), "first row\nsecond row\n").unwrap();

        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();

        assert_eq!(docs.row_text(1, 0).unwrap(), "first row");
        assert_eq!(docs.row_text(1, 10).unwrap(), "second row");
    }

    #[test]
    fn test_row_text_unknown_doc_id() {
        let docs = DocIdMap::new().unwrap();
        assert!(matches!(
            docs.row_text(99, 0),
            Err(CinedexError::Corpus(_))
        ));
    }

    #[test]
    fn test_row_text_past_end_of_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("rows.txt"), "only row\n").unwrap();

        let mut docs = DocIdMap::new().unwrap();
        docs.crawl(dir.path()).unwrap();
        assert!(matches!(
            docs.row_text(1, 1000),
            Err(CinedexError::Corpus(_))
        ));
    }
}
